use std::sync::Arc;
use tracing::{debug, warn};

use crate::cluster::ClusterResolver;
use crate::error::{HookError, Result, StoreError};
use crate::executor::template::{self, TemplateContext};
use crate::log::{Event, EventBus, TracingBus};
use crate::model::{CorrelationLabels, HookMode, Plan};
use crate::resources::{ConfigMap, Job};
use crate::state::{ObjectStore, PhaseLookup};

/// A hook job that has failed this many times will not be waited on any longer.
pub const FAILED_JOB_THRESHOLD: i32 = 5;

/// Where a phase hook stands after one reconcile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookProgress {
    /// No hook is bound to the phase.
    NotConfigured,
    /// The job was created during this call.
    Submitted { job: String },
    /// The job exists and has neither succeeded nor exhausted its attempts.
    Running { job: String, failed: i32 },
    Succeeded { job: String },
}

impl HookProgress {
    pub fn is_done(&self) -> bool {
        matches!(self, HookProgress::NotConfigured | HookProgress::Succeeded { .. })
    }
}

/// Runs the hook bound to a plan phase against the cluster it targets.
///
/// Every call is level-triggered: it looks at what exists for the
/// (plan, phase) pair, creates whatever is missing and reports, without
/// ever waiting on the job itself.
pub struct HookRunner {
    host: Arc<dyn ObjectStore>,
    clusters: Arc<dyn ClusterResolver>,
    bus: Arc<dyn EventBus>,
}

impl HookRunner {
    /// `host` is where hook definitions live; `clusters` supplies the clients
    /// hook objects are created with.
    pub fn new(host: Arc<dyn ObjectStore>, clusters: Arc<dyn ClusterResolver>) -> Self {
        Self {
            host,
            clusters,
            bus: Arc::new(TracingBus),
        }
    }

    pub fn with_event_bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.bus = bus;
        self
    }

    pub async fn run_phase_hooks(&self, plan: &Plan, phase: &str) -> Result<HookProgress> {
        let plan_name = plan.metadata.name.as_str();
        let Some((binding, reference)) = plan
            .hook_for_phase(phase)
            .and_then(|b| b.reference.as_ref().map(|r| (b, r)))
        else {
            self.publish(Event::NoHookBound {
                plan: plan_name.to_string(),
                phase: phase.to_string(),
            });
            return Ok(HookProgress::NotConfigured);
        };

        let hook = self
            .host
            .get_hook(&reference.namespace, &reference.name)
            .await
            .map_err(|source| HookError::Lookup {
                phase: phase.to_string(),
                what: format!("hook {}/{}", reference.namespace, reference.name),
                source,
            })?;

        let target = hook.target()?;
        let client = self.clusters.resolve(target).await?;
        debug!(plan = plan_name, phase, hook = %hook.metadata.name, %target, "running phase hook");

        let correlation = hook.correlation_labels(plan);
        let labels = correlation.for_phase(phase);
        let ctx = TemplateContext {
            plan_name,
            phase,
            binding,
            hook: &hook,
            labels: &labels,
        };

        let job = match hook.mode()? {
            HookMode::Custom => template::base_job(&ctx),
            HookMode::Playbook(playbook) => {
                let config_map = template::playbook_config_map(&ctx, &playbook)?;
                let name = self
                    .ensure_config_map(client.as_ref(), &correlation, &ctx, config_map)
                    .await?;
                template::playbook_job(&ctx, &name)
            }
        };

        match correlation.phase_job(client.as_ref(), phase).await {
            Ok(Some(existing)) => self.classify(&ctx, existing),
            Ok(None) => self.submit_job(client.as_ref(), &correlation, &ctx, job).await,
            Err(source) => Err(HookError::Lookup {
                phase: phase.to_string(),
                what: "hook job".to_string(),
                source,
            }),
        }
    }

    /// Returns the name of the phase's config map, creating it if needed.
    async fn ensure_config_map(
        &self,
        client: &dyn ObjectStore,
        correlation: &CorrelationLabels,
        ctx: &TemplateContext<'_>,
        config_map: ConfigMap,
    ) -> Result<String> {
        let lookup_err = |source: StoreError| HookError::Lookup {
            phase: ctx.phase.to_string(),
            what: "playbook config map".to_string(),
            source,
        };

        if let Some(existing) = correlation
            .phase_config_map(client, ctx.phase)
            .await
            .map_err(lookup_err)?
        {
            return Ok(existing.metadata.name);
        }

        match client.create_config_map(config_map).await {
            Ok(created) => {
                self.publish(Event::ArtifactCreated {
                    plan: ctx.plan_name.to_string(),
                    phase: ctx.phase.to_string(),
                    name: created.metadata.name.clone(),
                });
                Ok(created.metadata.name)
            }
            Err(err) if err.is_already_exists() => {
                warn!(phase = ctx.phase, error = %err, "config map created concurrently, refetching");
                correlation
                    .phase_config_map(client, ctx.phase)
                    .await
                    .map_err(lookup_err)?
                    .map(|cm| cm.metadata.name)
                    .ok_or_else(|| create_error(ctx, "playbook config map", err))
            }
            Err(err) => Err(create_error(ctx, "playbook config map", err)),
        }
    }

    async fn submit_job(
        &self,
        client: &dyn ObjectStore,
        correlation: &CorrelationLabels,
        ctx: &TemplateContext<'_>,
        job: Job,
    ) -> Result<HookProgress> {
        match client.create_job(job).await {
            Ok(created) => {
                let name = created.metadata.name;
                self.publish(Event::JobSubmitted {
                    plan: ctx.plan_name.to_string(),
                    phase: ctx.phase.to_string(),
                    job: name.clone(),
                });
                Ok(HookProgress::Submitted { job: name })
            }
            Err(err) if err.is_already_exists() => {
                warn!(phase = ctx.phase, error = %err, "hook job created concurrently, refetching");
                let existing = correlation
                    .phase_job(client, ctx.phase)
                    .await
                    .map_err(|source| HookError::Lookup {
                        phase: ctx.phase.to_string(),
                        what: "hook job".to_string(),
                        source,
                    })?;
                match existing {
                    Some(job) => self.classify(ctx, job),
                    None => Err(create_error(ctx, "hook job", err)),
                }
            }
            Err(err) => Err(create_error(ctx, "hook job", err)),
        }
    }

    fn classify(&self, ctx: &TemplateContext<'_>, job: Job) -> Result<HookProgress> {
        let name = job.metadata.name;
        let status = job.status;
        let (plan, phase) = (ctx.plan_name.to_string(), ctx.phase.to_string());

        if status.failed >= FAILED_JOB_THRESHOLD {
            self.publish(Event::JobFailed {
                plan,
                phase,
                job: name.clone(),
                failed: status.failed,
            });
            return Err(HookError::JobFailed {
                job: name,
                failed: status.failed,
            });
        }

        if status.succeeded == 1 {
            self.publish(Event::JobSucceeded {
                plan,
                phase,
                job: name.clone(),
            });
            return Ok(HookProgress::Succeeded { job: name });
        }

        self.publish(Event::JobRunning {
            plan,
            phase,
            job: name.clone(),
            failed: status.failed,
        });
        Ok(HookProgress::Running {
            job: name,
            failed: status.failed,
        })
    }

    fn publish(&self, event: Event) {
        self.bus.publish(event);
    }
}

fn create_error(ctx: &TemplateContext<'_>, what: &str, source: StoreError) -> HookError {
    HookError::Create {
        phase: ctx.phase.to_string(),
        what: what.to_string(),
        source,
    }
}
