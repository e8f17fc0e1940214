use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::error::StoreError;
use crate::model::Hook;
use crate::resources::{ConfigMap, Job, JobStatus, Labels, ObjectMeta, Resource};

use super::{assign_name, ObjectStore};

/// In-process object store.
///
/// Clones share the same data, so a test can keep a handle while the runner
/// owns another. Reads and creates are counted, and either can be made to
/// fail to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    hooks: Vec<Hook>,
    config_maps: Vec<ConfigMap>,
    jobs: Vec<Job>,
    reads: usize,
    creates: usize,
    read_failure: Option<String>,
    create_failure: Option<String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a hook without counting it as a create.
    pub fn insert_hook(&self, hook: Hook) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        inner
            .hooks
            .retain(|h| !same_key(h.metadata(), hook.metadata()));
        inner.hooks.push(hook);
        Ok(())
    }

    /// Overwrites the observed status of a job, as the platform would.
    pub fn set_job_status(
        &self,
        namespace: &str,
        name: &str,
        status: JobStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let job = inner
            .jobs
            .iter_mut()
            .find(|j| j.metadata.namespace == namespace && j.metadata.name == name)
            .ok_or_else(|| StoreError::NotFound {
                kind: Job::KIND,
                namespace: namespace.to_string(),
                name: name.to_string(),
            })?;
        job.status = status;
        Ok(())
    }

    /// Makes every subsequent read fail with `message`, or clears it with `None`.
    pub fn fail_reads(&self, message: Option<&str>) -> Result<(), StoreError> {
        self.write()?.read_failure = message.map(str::to_string);
        Ok(())
    }

    /// Makes every subsequent create fail with `message`, or clears it with `None`.
    pub fn fail_creates(&self, message: Option<&str>) -> Result<(), StoreError> {
        self.write()?.create_failure = message.map(str::to_string);
        Ok(())
    }

    pub fn jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(self.read()?.jobs.clone())
    }

    pub fn config_maps(&self) -> Result<Vec<ConfigMap>, StoreError> {
        Ok(self.read()?.config_maps.clone())
    }

    pub fn reads(&self) -> usize {
        self.read().map(|inner| inner.reads).unwrap_or_default()
    }

    pub fn creates(&self) -> usize {
        self.read().map(|inner| inner.creates).unwrap_or_default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire write lock: {}", e)))
    }

    fn begin_read(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        let mut inner = self.write()?;
        inner.reads += 1;
        if let Some(message) = &inner.read_failure {
            return Err(StoreError::Backend(message.clone()));
        }
        Ok(inner)
    }

    fn begin_create(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        let mut inner = self.write()?;
        inner.creates += 1;
        if let Some(message) = &inner.create_failure {
            return Err(StoreError::Backend(message.clone()));
        }
        Ok(inner)
    }
}

fn same_key(a: &ObjectMeta, b: &ObjectMeta) -> bool {
    a.namespace == b.namespace && a.name == b.name
}

fn insert<T: Resource>(items: &mut Vec<T>, mut object: T) -> Result<T, StoreError> {
    assign_name(&mut object)?;
    let meta = object.metadata();
    if items.iter().any(|existing| same_key(existing.metadata(), meta)) {
        return Err(StoreError::AlreadyExists {
            kind: T::KIND,
            namespace: meta.namespace.clone(),
            name: meta.name.clone(),
        });
    }
    debug!(kind = T::KIND, namespace = %meta.namespace, name = %meta.name, "created object");
    items.push(object.clone());
    Ok(object)
}

fn select<T: Resource>(items: &[T], selector: &Labels) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.metadata().matches(selector))
        .cloned()
        .collect()
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn get_hook(&self, namespace: &str, name: &str) -> Result<Hook, StoreError> {
        let inner = self.begin_read()?;
        inner
            .hooks
            .iter()
            .find(|h| h.metadata.namespace == namespace && h.metadata.name == name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: Hook::KIND,
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn create_config_map(&self, config_map: ConfigMap) -> Result<ConfigMap, StoreError> {
        let mut inner = self.begin_create()?;
        insert(&mut inner.config_maps, config_map)
    }

    async fn list_config_maps(&self, selector: &Labels) -> Result<Vec<ConfigMap>, StoreError> {
        let inner = self.begin_read()?;
        Ok(select(&inner.config_maps, selector))
    }

    async fn create_job(&self, job: Job) -> Result<Job, StoreError> {
        let mut inner = self.begin_create()?;
        insert(&mut inner.jobs, job)
    }

    async fn list_jobs(&self, selector: &Labels) -> Result<Vec<Job>, StoreError> {
        let inner = self.begin_read()?;
        Ok(select(&inner.jobs, selector))
    }
}
