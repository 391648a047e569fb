//! In-Flight Compute Module
//!
//! Collapses concurrent misses on one composite key into a single compute.
//! The first miss becomes the leader; later misses wait for its result.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::codec::Value;

type Pending = HashMap<String, watch::Receiver<Option<Value>>>;

// == In-Flight Table ==
/// Composite key to the pending result of the compute running for it.
#[derive(Debug, Default)]
pub struct InFlight {
    pending: Mutex<Pending>,
}

/// Outcome of claiming a key.
pub enum Claim {
    /// No compute is running: the caller must compute and publish.
    Leader(LeaderGuard),
    /// A compute is running: wait on it with [`wait_for_leader`].
    Follower(watch::Receiver<Option<Value>>),
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers interest in `key`.
    pub fn claim(self: &Arc<Self>, key: &str) -> Claim {
        let mut pending = self.lock();
        if let Some(rx) = pending.get(key) {
            return Claim::Follower(rx.clone());
        }

        let (tx, rx) = watch::channel(None);
        pending.insert(key.to_string(), rx);
        Claim::Leader(LeaderGuard {
            table: Arc::clone(self),
            key: key.to_string(),
            tx,
        })
    }

    /// Number of keys with a compute in progress.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Leader Guard ==
/// Held by the leader until its result is stored.
///
/// Dropping the guard releases the key; followers still waiting on a guard
/// dropped without a published value get `None`.
pub struct LeaderGuard {
    table: Arc<InFlight>,
    key: String,
    tx: watch::Sender<Option<Value>>,
}

impl LeaderGuard {
    /// Hands the computed value to every waiting follower.
    pub fn publish(&self, value: &Value) {
        self.tx.send_replace(Some(value.clone()));
    }
}

impl Drop for LeaderGuard {
    fn drop(&mut self) {
        self.table.lock().remove(&self.key);
    }
}

/// Waits for the leader's value; `None` when the leader gave up.
pub async fn wait_for_leader(mut rx: watch::Receiver<Option<Value>>) -> Option<Value> {
    let published = rx.wait_for(Option::is_some).await.ok()?;
    published.clone()
}
