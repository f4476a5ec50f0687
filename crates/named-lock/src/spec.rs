use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds a holder keeps the lock when it never releases it.
pub const DEFAULT_EXPIRE_SECONDS: u64 = 60;

fn default_expire_seconds() -> u64 {
    DEFAULT_EXPIRE_SECONDS
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LockError {
    #[error("lock namespace must not be empty")]
    EmptyNamespace,

    #[error("lock expiry must be at least one second")]
    ZeroExpiry,
}

/// Declares a named lock.
///
/// Callers sharing a namespace share one lock. A holder that does not
/// release within `expire_seconds` loses the lock to the next contender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSpec {
    pub namespace: String,
    #[serde(default = "default_expire_seconds")]
    pub expire_seconds: u64,
}

impl LockSpec {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            expire_seconds: DEFAULT_EXPIRE_SECONDS,
        }
    }

    pub fn expire_seconds(mut self, seconds: u64) -> Self {
        self.expire_seconds = seconds;
        self
    }

    pub fn expire(&self) -> Duration {
        Duration::from_secs(self.expire_seconds)
    }

    pub fn validate(&self) -> Result<(), LockError> {
        if self.namespace.trim().is_empty() {
            return Err(LockError::EmptyNamespace);
        }
        if self.expire_seconds == 0 {
            return Err(LockError::ZeroExpiry);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_defaults_when_omitted() {
        let spec: LockSpec = serde_json::from_str(r#"{"namespace":"nightly-report"}"#).unwrap();
        assert_eq!(spec, LockSpec::new("nightly-report"));
        assert_eq!(spec.expire(), Duration::from_secs(60));
    }

    #[test]
    fn validation() {
        assert_eq!(LockSpec::new("  ").validate(), Err(LockError::EmptyNamespace));
        assert_eq!(
            LockSpec::new("jobs").expire_seconds(0).validate(),
            Err(LockError::ZeroExpiry)
        );
        assert!(LockSpec::new("jobs").validate().is_ok());
    }
}
