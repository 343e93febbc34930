pub mod runner;

pub use runner::{RunReporter, Runner};
