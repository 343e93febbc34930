//! Outbound network switch for live judge providers.
//!
//! `SUMMEVAL_NETWORK_POLICY=deny` blocks every judge request for the whole
//! process. Tests scope a policy with [`NetworkPolicyGuard`].

use crate::errors::{ProviderError, ProviderResult};
use std::sync::{OnceLock, RwLock};

pub const NETWORK_POLICY_ENV: &str = "SUMMEVAL_NETWORK_POLICY";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NetworkPolicy {
    #[default]
    Allow,
    /// Carries the reason reported to the caller.
    Deny(String),
}

impl NetworkPolicy {
    /// Policy forced by the environment, if any. Values other than `deny` are ignored.
    pub fn from_env() -> Option<Self> {
        let raw = std::env::var(NETWORK_POLICY_ENV).ok()?;
        raw.trim()
            .eq_ignore_ascii_case("deny")
            .then(|| Self::Deny(format!("{NETWORK_POLICY_ENV}=deny")))
    }
}

fn scoped() -> &'static RwLock<NetworkPolicy> {
    static SCOPED: OnceLock<RwLock<NetworkPolicy>> = OnceLock::new();
    SCOPED.get_or_init(RwLock::default)
}

fn replace_scoped(policy: NetworkPolicy) -> NetworkPolicy {
    let mut current = scoped().write().unwrap_or_else(|e| e.into_inner());
    std::mem::replace(&mut *current, policy)
}

/// Installs a process-wide policy until dropped.
#[must_use = "the policy is reverted when the guard is dropped"]
pub struct NetworkPolicyGuard {
    restore: NetworkPolicy,
}

impl NetworkPolicyGuard {
    pub fn set(policy: NetworkPolicy) -> Self {
        Self {
            restore: replace_scoped(policy),
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self::set(NetworkPolicy::Deny(reason.into()))
    }
}

impl Drop for NetworkPolicyGuard {
    fn drop(&mut self) {
        replace_scoped(std::mem::take(&mut self.restore));
    }
}

/// Environment deny wins over any scoped policy.
pub fn effective_policy() -> NetworkPolicy {
    NetworkPolicy::from_env()
        .unwrap_or_else(|| scoped().read().unwrap_or_else(|e| e.into_inner()).clone())
}

pub fn check_outbound(target: &str) -> ProviderResult<()> {
    match effective_policy() {
        NetworkPolicy::Allow => Ok(()),
        NetworkPolicy::Deny(reason) => Err(ProviderError::Blocked {
            target: target.to_string(),
            reason,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn guard_denies_then_restores() {
        std::env::remove_var(NETWORK_POLICY_ENV);
        {
            let _guard = NetworkPolicyGuard::deny("judge disabled in test");
            let err = check_outbound("https://judge.invalid").unwrap_err().to_string();
            assert!(err.contains("outbound network blocked by policy"));
            assert!(err.contains("judge.invalid"));
            assert!(err.contains("judge disabled in test"));
        }
        assert_eq!(effective_policy(), NetworkPolicy::Allow);
        check_outbound("https://judge.invalid").unwrap();
    }

    #[test]
    #[serial]
    fn env_deny_beats_scoped_allow() {
        let saved = std::env::var(NETWORK_POLICY_ENV).ok();
        let _guard = NetworkPolicyGuard::set(NetworkPolicy::Allow);
        std::env::set_var(NETWORK_POLICY_ENV, " Deny ");
        let err = check_outbound("https://judge.invalid").unwrap_err().to_string();
        assert!(err.contains("SUMMEVAL_NETWORK_POLICY=deny"));

        std::env::set_var(NETWORK_POLICY_ENV, "allow-all");
        assert_eq!(NetworkPolicy::from_env(), None);

        match saved {
            Some(v) => std::env::set_var(NETWORK_POLICY_ENV, v),
            None => std::env::remove_var(NETWORK_POLICY_ENV),
        }
    }
}
