use std::future::Future;
use tokio::runtime::Handle;
use tracing::{error, warn};

use crate::log::{Event, EventBus, LogEntry, LogStorage, TracingBus};
use crate::state::redis::RedisClient;

/// Event bus that traces every event and persists it to Redis.
pub struct RedisEventBus {
    storage: LogStorage,
    console: TracingBus,
}

impl RedisEventBus {
    pub fn new(redis_client: RedisClient, tenant: impl Into<String>) -> Self {
        Self {
            storage: LogStorage::new(redis_client, tenant),
            console: TracingBus,
        }
    }

    pub fn storage(&self) -> &LogStorage {
        &self.storage
    }
}

impl EventBus for RedisEventBus {
    fn publish(&self, event: Event) {
        self.console.publish(event.clone());

        // Fire and forget.
        let storage = self.storage.clone();
        let spawned = spawn_detached(async move {
            let entry = LogEntry::new(event);
            if let Err(e) = storage.store_log(&entry).await {
                error!(error = %e, "failed to store hook event");
            }
        });
        if !spawned {
            warn!("no tokio runtime, hook event not persisted");
        }
    }
}

/// Spawns `task` on the current runtime. Returns false when called outside one.
fn spawn_detached<F>(task: F) -> bool
where
    F: Future<Output = ()> + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(task);
            true
        }
        Err(_) => false,
    }
}
