use crate::condition::{Condition, Conditions, STATUS_TRUE};
use crate::error::{ErrorKind, HookError};
use crate::executor::runner::HookProgress;

pub const HOOK_RUNNING: &str = "HookRunning";
pub const HOOK_SUCCEEDED: &str = "HookSucceeded";
pub const HOOK_FAILED: &str = "HookFailed";

/// Reflects one phase hook outcome in `conditions`.
///
/// Repeating the same outcome leaves the set untouched, so this can run on
/// every poll. An unbound phase clears hook conditions left by an earlier
/// binding.
pub fn record_outcome(
    conditions: &mut Conditions,
    phase: &str,
    outcome: &Result<HookProgress, HookError>,
) {
    match outcome {
        Ok(HookProgress::NotConfigured) => {
            conditions.delete_condition(&[HOOK_RUNNING, HOOK_SUCCEEDED, HOOK_FAILED]);
        }
        Ok(HookProgress::Submitted { job }) | Ok(HookProgress::Running { job, .. }) => {
            conditions.delete_condition(&[HOOK_FAILED, HOOK_SUCCEEDED]);
            conditions.set_condition(
                Condition::new(HOOK_RUNNING, STATUS_TRUE)
                    .with_reason("JobRunning")
                    .with_message(format!("Hook job {} for phase {} is running.", job, phase)),
            );
        }
        Ok(HookProgress::Succeeded { job }) => {
            conditions.delete_condition(&[HOOK_RUNNING, HOOK_FAILED]);
            conditions.set_condition(
                Condition::new(HOOK_SUCCEEDED, STATUS_TRUE)
                    .with_reason("Completed")
                    .with_message(format!("Hook job {} for phase {} succeeded.", job, phase)),
            );
        }
        Err(err) => {
            conditions.delete_condition(&[HOOK_RUNNING, HOOK_SUCCEEDED]);
            conditions.set_condition(
                Condition::new(HOOK_FAILED, STATUS_TRUE)
                    .with_reason(failure_reason(err.kind()))
                    .with_message(format!("Phase {}: {}", phase, err)),
            );
        }
    }
}

fn failure_reason(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Configuration => "InvalidConfiguration",
        ErrorKind::Lookup => "LookupFailed",
        ErrorKind::Create => "CreateFailed",
        ErrorKind::TerminalJobFailure => "JobFailed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_then_succeeded() {
        let mut conditions = Conditions::new();
        let running = Ok(HookProgress::Running {
            job: "job-1".to_string(),
            failed: 1,
        });

        record_outcome(&mut conditions, "PreBackupHooks", &running);
        let first = conditions.find_condition(HOOK_RUNNING).unwrap().1.clone();
        record_outcome(&mut conditions, "PreBackupHooks", &running);
        assert_eq!(conditions.find_condition(HOOK_RUNNING).unwrap().1, &first);

        let done = Ok(HookProgress::Succeeded {
            job: "job-1".to_string(),
        });
        record_outcome(&mut conditions, "PreBackupHooks", &done);

        assert!(!conditions.has_condition(HOOK_RUNNING));
        let (_, succeeded) = conditions.find_condition(HOOK_SUCCEEDED).unwrap();
        assert_eq!(succeeded.reason, "Completed");
        assert!(succeeded.message.contains("job-1"));
    }

    #[test]
    fn test_failure_reason_follows_error_kind() {
        let mut conditions = Conditions::new();
        let failed = Err(HookError::JobFailed {
            job: "job-1".to_string(),
            failed: 5,
        });

        record_outcome(&mut conditions, "PostRestoreHooks", &failed);

        let (_, condition) = conditions.find_condition(HOOK_FAILED).unwrap();
        assert_eq!(condition.reason, "JobFailed");
        assert!(condition.message.contains("PostRestoreHooks"));
        assert!(condition.message.contains("Hook job job-1 failed."));
    }

    #[test]
    fn test_not_configured_records_nothing() {
        let mut conditions = Conditions::new();
        record_outcome(&mut conditions, "PreBackupHooks", &Ok(HookProgress::NotConfigured));
        assert!(conditions.is_empty());
    }

    #[test]
    fn test_unbinding_clears_hook_conditions() {
        let mut conditions = Conditions::new();
        conditions.set_condition(Condition::new("Ready", STATUS_TRUE));
        let running = Ok(HookProgress::Running {
            job: "job-1".to_string(),
            failed: 2,
        });
        record_outcome(&mut conditions, "PreBackupHooks", &running);
        assert!(conditions.has_condition(HOOK_RUNNING));

        record_outcome(&mut conditions, "PreBackupHooks", &Ok(HookProgress::NotConfigured));

        assert!(!conditions.has_condition(HOOK_RUNNING));
        assert!(!conditions.has_condition(HOOK_FAILED));
        assert!(!conditions.has_condition(HOOK_SUCCEEDED));
        // Conditions owned by others stay.
        assert!(conditions.has_condition("Ready"));
    }
}
