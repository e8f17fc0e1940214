#[cfg(test)]
mod tests {
    use crate::cluster::StaticResolver;
    use crate::condition::Conditions;
    use crate::error::ErrorKind;
    use crate::executor::driver::drive_phase;
    use crate::executor::runner::{HookProgress, HookRunner};
    use crate::executor::status::{HOOK_FAILED, HOOK_RUNNING, HOOK_SUCCEEDED};
    use crate::model::*;
    use crate::resources::{JobStatus, ObjectMeta};
    use crate::state::InMemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn plan() -> Plan {
        Plan {
            metadata: ObjectMeta {
                name: "plan".to_string(),
                namespace: "openshift-migration".to_string(),
                ..Default::default()
            },
            spec: PlanSpec {
                hooks: vec![PlanHook {
                    phase: "PostRestore".to_string(),
                    execution_namespace: "hooks".to_string(),
                    service_account: "hook-sa".to_string(),
                    reference: Some(ObjectReference {
                        name: "notify".to_string(),
                        namespace: "openshift-migration".to_string(),
                    }),
                }],
            },
        }
    }

    fn setup() -> (HookRunner, InMemoryStore) {
        let host = InMemoryStore::new();
        host.insert_hook(Hook {
            metadata: ObjectMeta {
                name: "notify".to_string(),
                namespace: "openshift-migration".to_string(),
                ..Default::default()
            },
            spec: HookSpec {
                target_cluster: "destination".to_string(),
                custom: true,
                image: "busybox".to_string(),
                playbook: None,
                active_deadline_seconds: None,
            },
        })
        .unwrap();
        let destination = InMemoryStore::new();
        let resolver = StaticResolver::default().with_destination(Arc::new(destination.clone()));
        (HookRunner::new(Arc::new(host), Arc::new(resolver)), destination)
    }

    // Stands in for the execution platform: once the hook job shows up,
    // report `status` for it.
    fn complete_job_when_created(store: InMemoryStore, status: JobStatus) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                if let Some(job) = store.jobs().unwrap().first() {
                    store
                        .set_job_status(&job.metadata.namespace, &job.metadata.name, status)
                        .unwrap();
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
    }

    #[tokio::test]
    async fn test_drive_phase_until_success() {
        let (runner, destination) = setup();
        let platform = complete_job_when_created(
            destination.clone(),
            JobStatus { failed: 0, succeeded: 1 },
        );
        let mut conditions = Conditions::new();

        let progress = drive_phase(
            &runner,
            &plan(),
            "PostRestoreHooks",
            Duration::from_millis(10),
            &mut conditions,
        )
        .await
        .unwrap();

        platform.await.unwrap();
        assert!(matches!(progress, HookProgress::Succeeded { .. }));
        assert_eq!(destination.jobs().unwrap().len(), 1);
        assert!(conditions.has_condition(HOOK_SUCCEEDED));
        assert!(!conditions.has_condition(HOOK_RUNNING));
    }

    #[tokio::test]
    async fn test_drive_phase_stops_on_terminal_failure() {
        let (runner, destination) = setup();
        let platform = complete_job_when_created(
            destination.clone(),
            JobStatus { failed: 5, succeeded: 0 },
        );
        let mut conditions = Conditions::new();

        let err = drive_phase(
            &runner,
            &plan(),
            "PostRestoreHooks",
            Duration::from_millis(10),
            &mut conditions,
        )
        .await
        .unwrap_err();

        platform.await.unwrap();
        assert_eq!(err.kind(), ErrorKind::TerminalJobFailure);
        assert!(conditions.has_condition(HOOK_FAILED));
    }

    #[tokio::test]
    async fn test_drive_unbound_phase_returns_immediately() {
        let (runner, destination) = setup();
        let mut conditions = Conditions::new();

        let progress = drive_phase(
            &runner,
            &plan(),
            "PreBackupHooks",
            Duration::from_secs(3600),
            &mut conditions,
        )
        .await
        .unwrap();

        assert_eq!(progress, HookProgress::NotConfigured);
        assert_eq!(destination.creates(), 0);
        assert!(conditions.is_empty());
    }

    #[tokio::test]
    async fn test_dropping_driver_cancels_polling() {
        let (runner, destination) = setup();
        let mut conditions = Conditions::new();

        let result = tokio::time::timeout(
            Duration::from_millis(50),
            drive_phase(
                &runner,
                &plan(),
                "PostRestoreHooks",
                Duration::from_millis(10),
                &mut conditions,
            ),
        )
        .await;

        assert!(result.is_err());
        // Polling never submits twice.
        assert_eq!(destination.jobs().unwrap().len(), 1);
        assert!(conditions.has_condition(HOOK_RUNNING));
    }
}
