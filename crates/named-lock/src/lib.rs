//! Named mutual-exclusion locks.
//!
//! A [`LockSpec`] names a lock and how long a holder may keep it. Any
//! [`LockService`] backend grants and releases tokens; [`acquire`] waits for
//! one and returns a [`LockGuard`] that releases on drop, and
//! [`synchronized`] runs a closure under the lock.

pub mod guard;
pub mod service;
pub mod spec;

pub use guard::{acquire, synchronized, LockGuard, POLL_INTERVAL};
pub use service::{InMemoryLockService, LockService, LockToken};
pub use spec::{LockError, LockSpec, DEFAULT_EXPIRE_SECONDS};
