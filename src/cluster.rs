use async_trait::async_trait;
use std::sync::Arc;

use crate::error::HookError;
use crate::model::TargetCluster;
use crate::state::ObjectStore;

/// Hands out the object store client of a migration cluster.
#[async_trait]
pub trait ClusterResolver: Send + Sync {
    async fn resolve(&self, target: TargetCluster) -> Result<Arc<dyn ObjectStore>, HookError>;
}

/// Resolver over clients acquired up front.
#[derive(Clone, Default)]
pub struct StaticResolver {
    source: Option<Arc<dyn ObjectStore>>,
    destination: Option<Arc<dyn ObjectStore>>,
}

impl StaticResolver {
    pub fn new(source: Arc<dyn ObjectStore>, destination: Arc<dyn ObjectStore>) -> Self {
        Self {
            source: Some(source),
            destination: Some(destination),
        }
    }

    pub fn with_source(mut self, source: Arc<dyn ObjectStore>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_destination(mut self, destination: Arc<dyn ObjectStore>) -> Self {
        self.destination = Some(destination);
        self
    }
}

#[async_trait]
impl ClusterResolver for StaticResolver {
    async fn resolve(&self, target: TargetCluster) -> Result<Arc<dyn ObjectStore>, HookError> {
        let client = match target {
            TargetCluster::Source => self.source.clone(),
            TargetCluster::Destination => self.destination.clone(),
        };
        client.ok_or_else(|| HookError::ClusterUnavailable {
            target: target.to_string(),
            reason: "no client configured".to_string(),
        })
    }
}
