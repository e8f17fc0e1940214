pub mod driver;
pub mod runner;
pub mod status;
pub mod template;

pub use driver::drive_phase;
pub use runner::{HookProgress, HookRunner, FAILED_JOB_THRESHOLD};
pub use status::record_outcome;
