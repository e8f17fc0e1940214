use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::Hook;
use crate::resources::{ConfigMap, Job, Labels};

/// The declarative object store of one cluster.
///
/// Listing takes a label selector and spans all namespaces; an empty
/// selector matches everything.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_hook(&self, namespace: &str, name: &str) -> Result<Hook, StoreError>;

    async fn create_config_map(&self, config_map: ConfigMap) -> Result<ConfigMap, StoreError>;

    async fn list_config_maps(&self, selector: &Labels) -> Result<Vec<ConfigMap>, StoreError>;

    async fn create_job(&self, job: Job) -> Result<Job, StoreError>;

    async fn list_jobs(&self, selector: &Labels) -> Result<Vec<Job>, StoreError>;
}
