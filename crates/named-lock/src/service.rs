use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Proof of holding a lock; only the matching token releases it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken {
    pub namespace: String,
    pub id: Uuid,
}

/// A mutual-exclusion backend keyed by namespace.
///
/// Implementations may live in another process (a shared store); the
/// contract only requires that at most one unexpired token exists per
/// namespace at a time.
pub trait LockService: Send + Sync {
    /// Takes the lock if it is free or its holder has expired.
    fn try_acquire(&self, namespace: &str, expire: Duration) -> Option<LockToken>;

    /// Releases the lock if `token` still holds it.
    fn release(&self, token: &LockToken) -> bool;
}

#[derive(Debug)]
struct Holder {
    id: Uuid,
    /// `None` when the expiry is too far out to represent.
    expires_at: Option<Instant>,
}

impl Holder {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Process-local [`LockService`].
#[derive(Debug, Default)]
pub struct InMemoryLockService {
    held: Mutex<HashMap<String, Holder>>,
}

impl InMemoryLockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `namespace` is held by an unexpired token.
    pub fn is_held(&self, namespace: &str) -> bool {
        let held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.get(namespace)
            .is_some_and(|h| !h.expired(Instant::now()))
    }

    /// Number of namespaces with a recorded holder, expired ones included
    /// until the next acquisition prunes them.
    pub fn len(&self) -> usize {
        self.held.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LockService for InMemoryLockService {
    fn try_acquire(&self, namespace: &str, expire: Duration) -> Option<LockToken> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        if let Some(holder) = held.get(namespace) {
            if !holder.expired(now) {
                return None;
            }
            tracing::warn!(namespace, holder = %holder.id, "lock expired, force-releasing stale holder");
        }
        held.retain(|_, holder| !holder.expired(now));
        let id = Uuid::new_v4();
        held.insert(
            namespace.to_string(),
            Holder {
                id,
                expires_at: now.checked_add(expire),
            },
        );
        tracing::debug!(namespace, %id, "lock acquired");
        Some(LockToken {
            namespace: namespace.to_string(),
            id,
        })
    }

    fn release(&self, token: &LockToken) -> bool {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        match held.get(&token.namespace) {
            Some(holder) if holder.id == token.id => {
                held.remove(&token.namespace);
                tracing::debug!(namespace = %token.namespace, id = %token.id, "lock released");
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn second_acquire_fails_while_held() {
        let svc = InMemoryLockService::new();
        let token = svc.try_acquire("a", Duration::from_secs(60)).unwrap();
        assert!(svc.try_acquire("a", Duration::from_secs(60)).is_none());
        assert!(svc.try_acquire("b", Duration::from_secs(60)).is_some());
        assert!(svc.is_held("a"));
        assert!(svc.release(&token));
        assert!(!svc.is_held("a"));
    }

    #[test]
    fn release_needs_matching_token() {
        let svc = InMemoryLockService::new();
        let token = svc.try_acquire("a", Duration::from_secs(60)).unwrap();
        let forged = LockToken {
            namespace: "a".to_string(),
            id: Uuid::new_v4(),
        };
        assert!(!svc.release(&forged));
        assert!(svc.release(&token));
        assert!(!svc.release(&token));
    }

    #[traced_test]
    #[test]
    fn expired_holder_is_force_released() {
        let svc = InMemoryLockService::new();
        let stale = svc.try_acquire("jobs", Duration::from_millis(20)).unwrap();
        std::thread::sleep(Duration::from_millis(40));
        assert!(!svc.is_held("jobs"));

        let fresh = svc.try_acquire("jobs", Duration::from_secs(60)).unwrap();
        assert_ne!(fresh.id, stale.id);
        assert!(!svc.release(&stale));
        assert!(svc.release(&fresh));
        assert!(logs_contain("force-releasing stale holder"));
    }

    #[test]
    fn expiry_past_the_clock_range_never_expires() {
        let svc = InMemoryLockService::new();
        let token = svc.try_acquire("a", Duration::MAX).unwrap();
        assert!(svc.is_held("a"));
        assert!(svc.try_acquire("a", Duration::from_secs(1)).is_none());
        assert!(svc.release(&token));
    }

    #[test]
    fn acquisition_prunes_expired_namespaces() {
        let svc = InMemoryLockService::new();
        for namespace in ["a", "b", "c"] {
            svc.try_acquire(namespace, Duration::from_millis(10)).unwrap();
        }
        assert_eq!(svc.len(), 3);
        std::thread::sleep(Duration::from_millis(30));

        let live = svc.try_acquire("d", Duration::from_secs(60)).unwrap();
        assert_eq!(svc.len(), 1);
        assert!(svc.is_held("d"));
        assert!(svc.release(&live));
        assert!(svc.is_empty());
    }
}
