use async_trait::async_trait;
use redis::AsyncCommands;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::model::Hook;
use crate::resources::{ConfigMap, Job, Labels, Resource};

use super::{assign_name, ObjectStore};

pub type RedisClient = Arc<Mutex<redis::aio::MultiplexedConnection>>;

pub async fn connect(redis_url: &str) -> Result<RedisClient, redis::RedisError> {
    let client = redis::Client::open(redis_url)?;
    let conn = client.get_multiplexed_async_connection().await?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub async fn set_json<T: serde::Serialize + ?Sized>(
    client: &RedisClient,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    client.lock().await.set::<_, _, ()>(key, json).await?;
    Ok(())
}

/// Stores `value` only if `key` is unused. Returns whether it was written.
pub async fn set_json_nx<T: serde::Serialize + ?Sized>(
    client: &RedisClient,
    key: &str,
    value: &T,
) -> Result<bool, StoreError> {
    let json = serde_json::to_string(value)?;
    let written: bool = client.lock().await.set_nx(key, json).await?;
    Ok(written)
}

pub async fn get_json<T: for<'de> serde::Deserialize<'de>>(
    client: &RedisClient,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let data: Option<String> = client.lock().await.get(key).await?;
    match data {
        Some(s) => Ok(Some(serde_json::from_str(&s)?)),
        None => Ok(None),
    }
}

/// Object store persisting JSON documents in Redis.
///
/// Objects live under `<tenant>:<kind>:<namespace>:<name>`; each kind keeps a
/// set of its keys so listing does not need `KEYS`.
#[derive(Clone)]
pub struct RedisStore {
    client: RedisClient,
    tenant: String,
}

impl RedisStore {
    pub fn new(client: RedisClient, tenant: impl Into<String>) -> Self {
        Self {
            client,
            tenant: tenant.into(),
        }
    }

    fn object_key(&self, kind: &str, namespace: &str, name: &str) -> String {
        format!("{}:{}:{}:{}", self.tenant, kind, namespace, name)
    }

    fn index_key(&self, kind: &str) -> String {
        format!("{}:{}:index", self.tenant, kind)
    }

    /// Writes `object` unconditionally, replacing any stored version.
    pub async fn put<T: Resource>(&self, object: &T) -> Result<(), StoreError> {
        let meta = object.metadata();
        let key = self.object_key(T::KIND, &meta.namespace, &meta.name);
        self.client
            .lock()
            .await
            .sadd::<_, _, ()>(self.index_key(T::KIND), &key)
            .await?;
        set_json(&self.client, &key, object).await?;
        Ok(())
    }

    async fn get<T: Resource>(&self, namespace: &str, name: &str) -> Result<T, StoreError> {
        let key = self.object_key(T::KIND, namespace, name);
        get_json(&self.client, &key)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                kind: T::KIND,
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn create<T: Resource>(&self, mut object: T) -> Result<T, StoreError> {
        assign_name(&mut object)?;
        let meta = object.metadata();
        let key = self.object_key(T::KIND, &meta.namespace, &meta.name);
        // Index first: a stored object must always be listable, while a
        // dangling index entry is skipped by `list`.
        self.client
            .lock()
            .await
            .sadd::<_, _, ()>(self.index_key(T::KIND), &key)
            .await?;
        if !set_json_nx(&self.client, &key, &object).await? {
            return Err(StoreError::AlreadyExists {
                kind: T::KIND,
                namespace: meta.namespace.clone(),
                name: meta.name.clone(),
            });
        }
        debug!(kind = T::KIND, key = %key, "created object");
        Ok(object)
    }

    async fn list<T: Resource>(&self, selector: &Labels) -> Result<Vec<T>, StoreError> {
        let mut keys: Vec<String> = self
            .client
            .lock()
            .await
            .smembers(self.index_key(T::KIND))
            .await?;
        keys.sort();

        let mut found = Vec::new();
        for key in keys {
            // Index entries can outlive objects deleted out of band.
            if let Some(object) = get_json::<T>(&self.client, &key).await? {
                if object.metadata().matches(selector) {
                    found.push(object);
                }
            }
        }
        Ok(found)
    }
}

#[async_trait]
impl ObjectStore for RedisStore {
    async fn get_hook(&self, namespace: &str, name: &str) -> Result<Hook, StoreError> {
        self.get(namespace, name).await
    }

    async fn create_config_map(&self, config_map: ConfigMap) -> Result<ConfigMap, StoreError> {
        self.create(config_map).await
    }

    async fn list_config_maps(&self, selector: &Labels) -> Result<Vec<ConfigMap>, StoreError> {
        self.list(selector).await
    }

    async fn create_job(&self, job: Job) -> Result<Job, StoreError> {
        self.create(job).await
    }

    async fn list_jobs(&self, selector: &Labels) -> Result<Vec<Job>, StoreError> {
        self.list(selector).await
    }
}
