pub mod admin;
pub mod member;
pub mod register;

use panitia_core::activity::ActivityLog;

/// Best-effort activity recording: a failed append is diagnosed, never
/// fatal to the operation that already completed.
pub fn record(log: &ActivityLog, actor: &str, event: &str) {
    if let Err(e) = log.append(actor, event) {
        tracing::warn!(error = %e, "cannot record activity");
    }
}
