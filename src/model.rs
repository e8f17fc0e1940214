use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::HookError;
use crate::resources::{Labels, ObjectMeta, Resource};

pub const HOOK_LABEL: &str = "migration.hooks/hook";
pub const PLAN_LABEL: &str = "migration.hooks/plan";
pub const PHASE_LABEL: &str = "phase";

/// Suffix that turns a binding's phase into the pipeline phase it runs at.
pub const HOOK_PHASE_SUFFIX: &str = "Hooks";

/// Default `activeDeadlineSeconds` when a hook leaves it unset.
pub const DEFAULT_ACTIVE_DEADLINE_SECONDS: i64 = 1800;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PlanSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSpec {
    #[serde(default)]
    pub hooks: Vec<PlanHook>,
}

impl Plan {
    /// The binding that runs at `phase`, if any.
    ///
    /// A binding for `PreBackup` runs at `PreBackupHooks`. When a plan binds
    /// the same phase twice the last binding wins.
    pub fn hook_for_phase(&self, phase: &str) -> Option<&PlanHook> {
        self.spec
            .hooks
            .iter()
            .rev()
            .find(|h| format!("{}{}", h.phase, HOOK_PHASE_SUFFIX) == phase)
    }
}

/// Binds a hook to a plan phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanHook {
    pub phase: String,
    pub execution_namespace: String,
    pub service_account: String,
    #[serde(default)]
    pub reference: Option<ObjectReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReference {
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    pub metadata: ObjectMeta,
    pub spec: HookSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpec {
    pub target_cluster: String,
    #[serde(default)]
    pub custom: bool,
    pub image: String,
    /// Base64 encoded playbook, required unless `custom` is set.
    #[serde(default)]
    pub playbook: Option<String>,
    #[serde(default)]
    pub active_deadline_seconds: Option<i64>,
}

impl Resource for Hook {
    const KIND: &'static str = "Hook";

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

/// How a hook's work is carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookMode {
    /// Run the image with its own entrypoint.
    Custom,
    /// Run the base64 encoded playbook through the playbook runner.
    Playbook(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetCluster {
    Source,
    Destination,
}

impl FromStr for TargetCluster {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(TargetCluster::Source),
            "destination" => Ok(TargetCluster::Destination),
            other => Err(HookError::InvalidTargetCluster(other.to_string())),
        }
    }
}

impl fmt::Display for TargetCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetCluster::Source => write!(f, "source"),
            TargetCluster::Destination => write!(f, "destination"),
        }
    }
}

impl Hook {
    pub fn target(&self) -> Result<TargetCluster, HookError> {
        self.spec.target_cluster.parse()
    }

    pub fn mode(&self) -> Result<HookMode, HookError> {
        if self.spec.custom {
            return Ok(HookMode::Custom);
        }
        match &self.spec.playbook {
            Some(playbook) => Ok(HookMode::Playbook(playbook.clone())),
            None => Err(HookError::MissingPlaybook(self.metadata.name.clone())),
        }
    }

    pub fn active_deadline_seconds(&self) -> i64 {
        match self.spec.active_deadline_seconds {
            Some(secs) if secs != 0 => secs,
            _ => DEFAULT_ACTIVE_DEADLINE_SECONDS,
        }
    }

    /// Labels tying objects created for this hook to `plan`.
    pub fn correlation_labels(&self, plan: &Plan) -> CorrelationLabels {
        CorrelationLabels::new(&self.metadata, &plan.metadata)
    }
}

/// Deterministic labels identifying the objects a (hook, plan) pair owns.
///
/// Built once per invocation and never mutated; [`for_phase`](Self::for_phase)
/// hands out a fresh map each time it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationLabels {
    labels: Labels,
}

impl CorrelationLabels {
    pub fn new(hook: &ObjectMeta, plan: &ObjectMeta) -> Self {
        let mut labels = Labels::new();
        labels.insert(HOOK_LABEL.to_string(), identity_digest(hook));
        labels.insert(PLAN_LABEL.to_string(), identity_digest(plan));
        Self { labels }
    }

    pub fn for_phase(&self, phase: &str) -> Labels {
        let mut labels = self.labels.clone();
        labels.insert(PHASE_LABEL.to_string(), phase.to_string());
        labels
    }

    pub fn as_labels(&self) -> &Labels {
        &self.labels
    }
}

// Label values are capped at 63 characters.
fn identity_digest(meta: &ObjectMeta) -> String {
    let identity = if meta.uid.is_empty() {
        format!("{}/{}", meta.namespace, meta.name)
    } else {
        meta.uid.clone()
    };
    let digest = Sha256::digest(identity.as_bytes());
    hex::encode(digest)[..32].to_string()
}
