//! Per-key debounce timers.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Channel capacity between timer tasks and the debouncer.
const FIRED_CHANNEL_CAPACITY: usize = 256;

struct Fired<K> {
    key: K,
    generation: u64,
}

struct Pending {
    generation: u64,
    timer: JoinHandle<()>,
}

/// Collapses bursts of triggers per key into one firing after a quiet period.
///
/// Each key has at most one pending timer. Rescheduling replaces it, and a
/// timer that already fired but was superseded before being received is
/// dropped by generation check, so only the latest schedule for a key ever
/// comes out of [`next_fired`](Self::next_fired).
///
/// Timers are tokio tasks: `schedule` must be called inside a runtime.
pub struct Debouncer<K> {
    pending: HashMap<K, Pending>,
    next_generation: u64,
    fired_tx: mpsc::Sender<Fired<K>>,
    fired_rx: mpsc::Receiver<Fired<K>>,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        let (fired_tx, fired_rx) = mpsc::channel(FIRED_CHANNEL_CAPACITY);
        Self {
            pending: HashMap::new(),
            next_generation: 0,
            fired_tx,
            fired_rx,
        }
    }

    /// Fire `key` after `delay`, cancelling any timer already pending for it.
    pub fn schedule(&mut self, key: K, delay: Duration) {
        self.next_generation += 1;
        let generation = self.next_generation;

        let tx = self.fired_tx.clone();
        let fired_key = key.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx
                .send(Fired {
                    key: fired_key,
                    generation,
                })
                .await;
        });

        if let Some(previous) = self.pending.insert(key, Pending { generation, timer }) {
            previous.timer.abort();
        }
    }

    /// Drop the pending timer for `key`. Returns whether one existed.
    pub fn cancel(&mut self, key: &K) -> bool {
        match self.pending.remove(key) {
            Some(pending) => {
                pending.timer.abort();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Wait for the next key whose quiet period has elapsed.
    ///
    /// Pends forever when nothing is scheduled. Cancel-safe: dropping the
    /// future never loses a firing.
    pub async fn next_fired(&mut self) -> K {
        loop {
            // The debouncer holds a sender, so the channel never closes.
            let Some(fired) = self.fired_rx.recv().await else {
                return std::future::pending().await;
            };
            if self.acknowledge(&fired) {
                return fired.key;
            }
        }
    }

    /// Consume the pending entry if `fired` is its latest schedule.
    fn acknowledge(&mut self, fired: &Fired<K>) -> bool {
        match self.pending.get(&fired.key) {
            Some(pending) if pending.generation == fired.generation => {
                self.pending.remove(&fired.key);
                true
            }
            _ => false,
        }
    }
}

impl<K> Default for Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        for pending in self.pending.values() {
            pending.timer.abort();
        }
    }
}
