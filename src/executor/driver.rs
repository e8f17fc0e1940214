use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::condition::Conditions;
use crate::error::Result;
use crate::executor::runner::{HookProgress, HookRunner};
use crate::executor::status::record_outcome;
use crate::model::Plan;

/// Polls the hook of `phase` every `requeue_after` until it is done or fails,
/// recording each outcome in `conditions`.
///
/// Dropping the returned future stops polling; nothing is left running.
pub async fn drive_phase(
    runner: &HookRunner,
    plan: &Plan,
    phase: &str,
    requeue_after: Duration,
    conditions: &mut Conditions,
) -> Result<HookProgress> {
    let mut polls = 0u32;
    loop {
        polls += 1;
        let outcome = runner.run_phase_hooks(plan, phase).await;
        record_outcome(conditions, phase, &outcome);

        let progress = outcome?;
        if progress.is_done() {
            debug!(plan = %plan.metadata.name, phase, polls, "phase hook done");
            return Ok(progress);
        }

        debug!(plan = %plan.metadata.name, phase, polls, ?progress, "phase hook pending, requeueing");
        sleep(requeue_after).await;
    }
}

#[cfg(test)]
mod tests;
