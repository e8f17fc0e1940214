use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Observable steps of a phase hook run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    NoHookBound { plan: String, phase: String },
    ArtifactCreated { plan: String, phase: String, name: String },
    JobSubmitted { plan: String, phase: String, job: String },
    JobRunning { plan: String, phase: String, job: String, failed: i32 },
    JobSucceeded { plan: String, phase: String, job: String },
    JobFailed { plan: String, phase: String, job: String, failed: i32 },
}

impl Event {
    pub fn plan(&self) -> &str {
        match self {
            Event::NoHookBound { plan, .. }
            | Event::ArtifactCreated { plan, .. }
            | Event::JobSubmitted { plan, .. }
            | Event::JobRunning { plan, .. }
            | Event::JobSucceeded { plan, .. }
            | Event::JobFailed { plan, .. } => plan,
        }
    }

    pub fn phase(&self) -> &str {
        match self {
            Event::NoHookBound { phase, .. }
            | Event::ArtifactCreated { phase, .. }
            | Event::JobSubmitted { phase, .. }
            | Event::JobRunning { phase, .. }
            | Event::JobSucceeded { phase, .. }
            | Event::JobFailed { phase, .. } => phase,
        }
    }
}

pub trait EventBus: Send + Sync {
    fn publish(&self, event: Event);
}

/// Writes events to the `tracing` subscriber.
#[derive(Debug, Clone, Default)]
pub struct TracingBus;

impl EventBus for TracingBus {
    fn publish(&self, event: Event) {
        let (plan, phase) = (event.plan(), event.phase());
        match &event {
            Event::NoHookBound { .. } => debug!(plan, phase, "no hook bound to phase"),
            Event::ArtifactCreated { name, .. } => {
                info!(plan, phase, config_map = %name, "created playbook config map")
            }
            Event::JobSubmitted { job, .. } => info!(plan, phase, job = %job, "submitted hook job"),
            Event::JobRunning { job, failed, .. } => {
                debug!(plan, phase, job = %job, failed, "hook job still running")
            }
            Event::JobSucceeded { job, .. } => info!(plan, phase, job = %job, "hook job succeeded"),
            Event::JobFailed { job, failed, .. } => {
                warn!(plan, phase, job = %job, failed, "hook job failed")
            }
        }
    }
}
