//! SessionReaper - Background eviction of inactive conversations.
//!
//! Runs `reap_expired` on a fixed interval until told to stop. The store
//! skips conversations with a turn in flight, so a sweep never races a
//! turn for the same user.
//!
//! ## Graceful Shutdown
//!
//! [`ReaperHandle::stop`] signals the loop through a `watch` channel and
//! waits for the task to finish.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::foundation::Timestamp;
use crate::ports::ConversationStore;

/// Periodic sweeper for a conversation store.
pub struct SessionReaper {
    store: Arc<dyn ConversationStore>,
    interval: Duration,
}

impl SessionReaper {
    pub fn new(store: Arc<dyn ConversationStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Runs the sweep loop until `shutdown` turns true or its sender is
    /// dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing can be stale yet.
        interval.tick().await;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Session reaper stopping");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// Runs exactly one sweep. Returns the number of evicted conversations.
    pub async fn sweep_once(&self) -> usize {
        let evicted = self.store.reap_expired(Timestamp::now()).await;
        if evicted > 0 {
            info!(evicted, "Evicted inactive conversations");
        } else {
            debug!("Reaper sweep found nothing to evict");
        }
        evicted
    }

    /// Spawns the loop onto the runtime.
    pub fn spawn(self) -> ReaperHandle {
        let (shutdown, receiver) = watch::channel(false);
        let task = tokio::spawn(async move { self.run(receiver).await });
        ReaperHandle { shutdown, task }
    }
}

/// Stop handle for a spawned reaper.
pub struct ReaperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Signals the reaper and waits for it to exit.
    pub async fn stop(self) {
        // A send error means the loop already exited.
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "Session reaper task ended abnormally");
        }
    }
}
