use std::thread;
use std::time::{Duration, Instant};

use crate::service::{LockService, LockToken};
use crate::spec::{LockError, LockSpec};

/// Delay between acquisition attempts while waiting.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Holds a lock until dropped.
pub struct LockGuard<'a> {
    service: &'a dyn LockService,
    token: LockToken,
}

impl LockGuard<'_> {
    pub fn token(&self) -> &LockToken {
        &self.token
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if !self.service.release(&self.token) {
            tracing::warn!(
                namespace = %self.token.namespace,
                "lock expired before release"
            );
        }
    }
}

impl std::fmt::Debug for LockGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard").field("token", &self.token).finish()
    }
}

/// Waits up to `wait` for the lock described by `spec`.
///
/// Returns `Ok(None)` when the wait elapses; a zero wait makes a single
/// attempt. A wait too long to represent as a deadline never elapses.
pub fn acquire<'a>(
    service: &'a dyn LockService,
    spec: &LockSpec,
    wait: Duration,
) -> Result<Option<LockGuard<'a>>, LockError> {
    spec.validate()?;
    let deadline = Instant::now().checked_add(wait);
    loop {
        if let Some(token) = service.try_acquire(&spec.namespace, spec.expire()) {
            return Ok(Some(LockGuard { service, token }));
        }
        let pause = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    tracing::debug!(namespace = %spec.namespace, ?wait, "lock wait timed out");
                    return Ok(None);
                }
                POLL_INTERVAL.min(deadline - now)
            }
            None => POLL_INTERVAL,
        };
        thread::sleep(pause);
    }
}

/// Runs `f` while holding the lock.
///
/// `Ok(None)` means the lock was not obtained within `wait` and `f` did not
/// run. The lock is released however `f` exits, unwinding included.
pub fn synchronized<T>(
    service: &dyn LockService,
    spec: &LockSpec,
    wait: Duration,
    f: impl FnOnce() -> T,
) -> Result<Option<T>, LockError> {
    match acquire(service, spec, wait)? {
        Some(_guard) => Ok(Some(f())),
        None => Ok(None),
    }
}
