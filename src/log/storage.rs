use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::log::Event;
use crate::state::redis::{get_json, set_json, RedisClient};

const LOGS_KEY_PREFIX: &str = "logs:";
const LOGS_INDEX_KEY: &str = "logs:index";
const MAX_INDEXED_LOGS: isize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub event: Event,
    pub plan: String,
    pub phase: String,
}

impl LogEntry {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            plan: event.plan().to_string(),
            phase: event.phase().to_string(),
            event,
        }
    }
}

/// Hook event history kept in Redis, newest first.
#[derive(Clone)]
pub struct LogStorage {
    client: RedisClient,
    tenant: String,
}

impl LogStorage {
    pub fn new(client: RedisClient, tenant: impl Into<String>) -> Self {
        Self {
            client,
            tenant: tenant.into(),
        }
    }

    fn entry_key(&self, id: &str) -> String {
        format!("{}:{}{}", self.tenant, LOGS_KEY_PREFIX, id)
    }

    fn index_key(&self) -> String {
        format!("{}:{}", self.tenant, LOGS_INDEX_KEY)
    }

    pub async fn store_log(&self, entry: &LogEntry) -> Result<(), StoreError> {
        set_json(&self.client, &self.entry_key(&entry.id), entry).await?;

        let index = self.index_key();
        let mut conn = self.client.lock().await;
        conn.lpush::<_, _, ()>(&index, &entry.id).await?;
        conn.ltrim::<_, ()>(&index, 0, MAX_INDEXED_LOGS - 1).await?;
        Ok(())
    }

    /// Most recent entries, optionally narrowed to a plan and phase.
    pub async fn get_logs(
        &self,
        plan: Option<&str>,
        phase: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LogEntry>, StoreError> {
        let ids: Vec<String> = self
            .client
            .lock()
            .await
            .lrange(self.index_key(), 0, MAX_INDEXED_LOGS - 1)
            .await?;

        let mut logs = Vec::new();
        for id in ids {
            if logs.len() >= limit {
                break;
            }
            if let Some(entry) = get_json::<LogEntry>(&self.client, &self.entry_key(&id)).await? {
                let matches_plan = plan.map_or(true, |p| entry.plan == p);
                let matches_phase = phase.map_or(true, |p| entry.phase == p);
                if matches_plan && matches_phase {
                    logs.push(entry);
                }
            }
        }
        Ok(logs)
    }

    pub async fn get_phase_logs(&self, plan: &str, phase: &str) -> Result<Vec<LogEntry>, StoreError> {
        self.get_logs(Some(plan), Some(phase), 50).await
    }

    pub async fn get_plan_logs(&self, plan: &str) -> Result<Vec<LogEntry>, StoreError> {
        self.get_logs(Some(plan), None, 200).await
    }
}
