use async_trait::async_trait;
use tracing::warn;

use crate::error::StoreError;
use crate::model::CorrelationLabels;
use crate::resources::{ConfigMap, Job, Resource};

use super::ObjectStore;

/// Finds the objects already created for a phase.
#[async_trait]
pub trait PhaseLookup: Send + Sync {
    async fn phase_config_map(
        &self,
        store: &dyn ObjectStore,
        phase: &str,
    ) -> Result<Option<ConfigMap>, StoreError>;

    async fn phase_job(&self, store: &dyn ObjectStore, phase: &str) -> Result<Option<Job>, StoreError>;
}

#[async_trait]
impl PhaseLookup for CorrelationLabels {
    async fn phase_config_map(
        &self,
        store: &dyn ObjectStore,
        phase: &str,
    ) -> Result<Option<ConfigMap>, StoreError> {
        let found = store.list_config_maps(&self.for_phase(phase)).await?;
        Ok(first_of(found, phase))
    }

    async fn phase_job(&self, store: &dyn ObjectStore, phase: &str) -> Result<Option<Job>, StoreError> {
        let found = store.list_jobs(&self.for_phase(phase)).await?;
        Ok(first_of(found, phase))
    }
}

fn first_of<T: Resource>(found: Vec<T>, phase: &str) -> Option<T> {
    if found.len() > 1 {
        warn!(
            kind = T::KIND,
            phase,
            count = found.len(),
            "multiple objects carry the same phase labels, using the first"
        );
    }
    found.into_iter().next()
}
