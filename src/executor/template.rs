//! Job and config map templates for phase hooks.
//!
//! Everything here is pure; the runner decides what gets stored.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::BTreeMap;

use crate::error::HookError;
use crate::model::{Hook, PlanHook};
use crate::resources::{
    ConfigMap, ConfigMapVolumeSource, Container, Job, JobSpec, Labels, ObjectMeta, PodSpec,
    PodTemplateSpec, RestartPolicy, Volume, VolumeMount,
};

pub const PLAYBOOK_KEY: &str = "playbook.yml";
pub const PLAYBOOK_VOLUME: &str = "playbook";
pub const PLAYBOOK_MOUNT_PATH: &str = "/tmp/playbook";
pub const PLAYBOOK_COMMAND: [&str; 6] = [
    "/bin/entrypoint",
    "ansible-runner",
    "-p",
    "/tmp/playbook/playbook.yml",
    "run",
    "/tmp/runner",
];

/// Inputs shared by every template of one phase hook run.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub plan_name: &'a str,
    pub phase: &'a str,
    pub binding: &'a PlanHook,
    pub hook: &'a Hook,
    /// Correlation labels including the phase label.
    pub labels: &'a Labels,
}

impl TemplateContext<'_> {
    fn generate_name(&self) -> String {
        format!("{}-{}-", self.plan_name, self.phase).to_lowercase()
    }

    fn container_name(&self) -> String {
        format!("{}-{}", self.plan_name, self.phase).to_lowercase()
    }

    fn metadata(&self) -> ObjectMeta {
        ObjectMeta {
            generate_name: Some(self.generate_name()),
            namespace: self.binding.execution_namespace.clone(),
            labels: self.labels.clone(),
            ..Default::default()
        }
    }
}

/// The job every hook starts from: one container running the hook image.
pub fn base_job(ctx: &TemplateContext<'_>) -> Job {
    Job {
        metadata: ctx.metadata(),
        spec: JobSpec {
            template: PodTemplateSpec {
                spec: PodSpec {
                    containers: vec![Container {
                        name: ctx.container_name(),
                        image: ctx.hook.spec.image.clone(),
                        command: None,
                        volume_mounts: Vec::new(),
                    }],
                    volumes: Vec::new(),
                    restart_policy: RestartPolicy::OnFailure,
                    service_account_name: ctx.binding.service_account.clone(),
                    active_deadline_seconds: Some(ctx.hook.active_deadline_seconds()),
                },
            },
        },
        status: Default::default(),
    }
}

/// The base job wired to run the playbook stored in `config_map`.
pub fn playbook_job(ctx: &TemplateContext<'_>, config_map: &str) -> Job {
    let mut job = base_job(ctx);
    let pod = &mut job.spec.template.spec;

    if let Some(container) = pod.containers.first_mut() {
        container.command = Some(PLAYBOOK_COMMAND.iter().map(|s| s.to_string()).collect());
        container.volume_mounts = vec![VolumeMount {
            name: PLAYBOOK_VOLUME.to_string(),
            mount_path: PLAYBOOK_MOUNT_PATH.to_string(),
        }];
    }
    pod.volumes = vec![Volume {
        name: PLAYBOOK_VOLUME.to_string(),
        config_map: Some(ConfigMapVolumeSource {
            name: config_map.to_string(),
        }),
    }];

    job
}

/// The config map carrying the decoded playbook.
pub fn playbook_config_map(ctx: &TemplateContext<'_>, playbook: &str) -> Result<ConfigMap, HookError> {
    let data = decode_playbook(playbook).map_err(|source| HookError::InvalidPlaybook {
        hook: ctx.hook.metadata.name.clone(),
        source,
    })?;

    let mut binary_data = BTreeMap::new();
    binary_data.insert(PLAYBOOK_KEY.to_string(), data);

    Ok(ConfigMap {
        metadata: ctx.metadata(),
        binary_data,
    })
}

// Line breaks from wrapped encoders are not part of the payload.
fn decode_playbook(playbook: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = playbook.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    STANDARD.decode(compact)
}
