//! Rotating credential pool
//!
//! Holds the credentials used against the generation backend and hands them
//! out in round-robin order over the currently-usable subset. Throttled
//! credentials self-recover after a fixed cooldown via a spawned task that
//! is aborted if the credential is removed first.

use roundtable_domain::{Credential, CredentialId, CredentialStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Default cooldown before a throttled credential becomes usable again
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

struct PoolInner {
    /// Insertion-ordered; relative order defines the rotation order
    entries: Vec<Credential>,
    /// Index of the next entry to consider in `next()`
    cursor: usize,
    /// Pending cooldown recovery tasks, keyed by credential
    cooldowns: HashMap<CredentialId, JoinHandle<()>>,
}

/// Round-robin pool of generation credentials
///
/// Cheap to clone; clones share the same underlying table. All locking is
/// internal and never held across an await point.
#[derive(Clone)]
pub struct CredentialPool {
    inner: Arc<Mutex<PoolInner>>,
    cooldown: Duration,
}

impl CredentialPool {
    pub fn new() -> Self {
        Self::with_cooldown(DEFAULT_COOLDOWN)
    }

    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PoolInner {
                entries: Vec::new(),
                cursor: 0,
                cooldowns: HashMap::new(),
            })),
            cooldown,
        }
    }

    pub fn add(&self, credential: Credential) {
        let mut inner = self.inner.lock().unwrap();
        debug!(id = %credential.id(), status = %credential.status(), "Adding credential");
        inner.entries.push(credential);
    }

    /// Remove a credential, aborting any pending cooldown recovery
    pub fn remove(&self, id: &CredentialId) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.retain(|c| c.id() != id);
        if let Some(handle) = inner.cooldowns.remove(id) {
            handle.abort();
        }
    }

    /// Number of credentials currently usable
    pub fn usable_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .entries
            .iter()
            .filter(|c| c.status().is_usable())
            .count()
    }

    /// Draw the next usable credential in round-robin order
    ///
    /// The rotation is defined over the usable subset as of this call: an
    /// entry that turned throttled since the last draw is skipped without
    /// disturbing the relative order of the rest. Returns `None` when no
    /// credential is usable.
    pub fn next(&self) -> Option<Credential> {
        let mut inner = self.inner.lock().unwrap();
        let len = inner.entries.len();
        for offset in 0..len {
            let idx = (inner.cursor + offset) % len;
            if inner.entries[idx].status().is_usable() {
                inner.cursor = (idx + 1) % len;
                return Some(inner.entries[idx].clone());
            }
        }
        None
    }

    /// Current status of a credential, if it is still in the pool
    pub fn status(&self, id: &CredentialId) -> Option<CredentialStatus> {
        let inner = self.inner.lock().unwrap();
        inner
            .entries
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.status())
    }

    /// Mark a credential throttled and schedule its recovery
    ///
    /// The cooldown task is fire-and-forget relative to the caller; it is
    /// aborted if the credential is removed before it fires.
    pub fn mark_throttled(&self, id: &CredentialId) {
        let mut inner = self.inner.lock().unwrap();
        let Some(entry) = inner.entries.iter_mut().find(|c| c.id() == id) else {
            warn!(id = %id, "Cannot throttle unknown credential");
            return;
        };
        entry.set_status(CredentialStatus::Throttled);
        info!(id = %id, cooldown_secs = self.cooldown.as_secs(), "Credential throttled");

        let pool = Arc::clone(&self.inner);
        let id = id.clone();
        let cooldown = self.cooldown;
        let handle = tokio::spawn({
            let id = id.clone();
            async move {
                tokio::time::sleep(cooldown).await;
                let mut inner = pool.lock().unwrap();
                if let Some(entry) = inner.entries.iter_mut().find(|c| c.id() == &id)
                    && entry.status() == CredentialStatus::Throttled
                {
                    entry.set_status(CredentialStatus::Usable);
                    info!(id = %id, "Credential recovered from cooldown");
                }
                inner.cooldowns.remove(&id);
            }
        });
        // A newer cooldown supersedes any still-pending one
        if let Some(previous) = inner.cooldowns.insert(id, handle) {
            previous.abort();
        }
    }

    /// Mark a credential rejected; terminal until externally re-verified
    pub fn mark_rejected(&self, id: &CredentialId) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.entries.iter_mut().find(|c| c.id() == id) {
            entry.set_status(CredentialStatus::Rejected);
            warn!(id = %id, "Credential rejected");
        }
        if let Some(handle) = inner.cooldowns.remove(id) {
            handle.abort();
        }
    }
}

impl Default for CredentialPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with(ids: &[&str]) -> CredentialPool {
        let pool = CredentialPool::new();
        for id in ids {
            pool.add(Credential::usable(*id, format!("secret-{id}")));
        }
        pool
    }

    fn draw_ids(pool: &CredentialPool, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| pool.next().unwrap().id().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_round_robin_is_fair() {
        let pool = pool_with(&["c1", "c2", "c3"]);
        let drawn = draw_ids(&pool, 6);
        assert_eq!(drawn, vec!["c1", "c2", "c3", "c1", "c2", "c3"]);
    }

    #[tokio::test]
    async fn test_empty_pool_returns_none() {
        let pool = CredentialPool::new();
        assert_eq!(pool.usable_count(), 0);
        assert!(pool.next().is_none());
    }

    #[tokio::test]
    async fn test_throttled_is_skipped_without_disturbing_order() {
        let pool = pool_with(&["c1", "c2", "c3"]);
        pool.mark_throttled(&CredentialId::new("c2"));
        assert_eq!(pool.usable_count(), 2);
        assert_eq!(draw_ids(&pool, 4), vec!["c1", "c3", "c1", "c3"]);
    }

    #[tokio::test]
    async fn test_non_usable_statuses_are_not_drawn() {
        let pool = CredentialPool::new();
        pool.add(Credential::new("c1", "s1", CredentialStatus::Unverified));
        pool.add(Credential::new("c2", "s2", CredentialStatus::Verifying));
        pool.add(Credential::usable("c3", "s3"));
        assert_eq!(pool.usable_count(), 1);
        assert_eq!(draw_ids(&pool, 2), vec!["c3", "c3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_recovers_credential() {
        let pool = pool_with(&["c1"]);
        let id = CredentialId::new("c1");
        pool.mark_throttled(&id);
        assert_eq!(pool.status(&id), Some(CredentialStatus::Throttled));
        assert!(pool.next().is_none());

        // Just before the window closes the credential is still throttled
        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(pool.status(&id), Some(CredentialStatus::Throttled));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(pool.status(&id), Some(CredentialStatus::Usable));
        assert_eq!(pool.usable_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_does_not_recover() {
        let pool = pool_with(&["c1"]);
        let id = CredentialId::new("c1");
        pool.mark_rejected(&id);
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(pool.status(&id), Some(CredentialStatus::Rejected));
        assert!(pool.next().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reject_during_cooldown_wins() {
        let pool = pool_with(&["c1"]);
        let id = CredentialId::new("c1");
        pool.mark_throttled(&id);
        pool.mark_rejected(&id);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(pool.status(&id), Some(CredentialStatus::Rejected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_aborts_cooldown() {
        let pool = pool_with(&["c1", "c2"]);
        let id = CredentialId::new("c1");
        pool.mark_throttled(&id);
        pool.remove(&id);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(pool.status(&id), None);
        assert_eq!(pool.usable_count(), 1);
    }
}
