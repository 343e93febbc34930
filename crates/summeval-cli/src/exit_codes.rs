//! Process exit codes for the `summeval` binary.
//! Scores never affect the exit code; only whether every metric could be measured.

pub const SUCCESS: i32 = 0;
pub const EVALUATION_ERROR: i32 = 2; // bad flags/config, missing credentials, provider or judge failure
