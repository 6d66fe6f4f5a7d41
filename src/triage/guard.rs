use super::domain::AttemptStatus;
use super::ports::{WorkQueueError, WorkQueueService};

/// What the attempt history says about (re)processing a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    /// No prior attempts; start fresh.
    StartFresh,
    /// Exactly one prior attempt that never finished; resume it.
    Resume,
    /// Exactly one prior attempt, already marked done.
    AlreadyCompleted,
    /// More than one prior attempt. The automatic retry was already spent, so
    /// the case is left for a caseworker.
    Abandoned,
}

impl GuardVerdict {
    pub const fn proceeds(self) -> bool {
        matches!(self, GuardVerdict::StartFresh | GuardVerdict::Resume)
    }

    /// Operator-facing reason when the verdict declines processing.
    pub const fn decline_reason(self) -> Option<&'static str> {
        match self {
            GuardVerdict::AlreadyCompleted => Some("case already marked as done"),
            GuardVerdict::Abandoned => Some("case has failed in the past"),
            GuardVerdict::StartFresh | GuardVerdict::Resume => None,
        }
    }
}

/// Decide from the durable attempt history whether a case should be handled.
///
/// Retry policy: a case is retried at most once automatically. Two or more
/// recorded attempts mean earlier runs already burned the retry, regardless of
/// how those attempts ended.
pub fn should_process<Q>(queue: &Q, case_number: &str) -> Result<GuardVerdict, WorkQueueError>
where
    Q: WorkQueueService + ?Sized,
{
    let attempts = queue.attempts_for(case_number)?;

    let verdict = match attempts.as_slice() {
        [] => GuardVerdict::StartFresh,
        [only] if only.status == AttemptStatus::Done => GuardVerdict::AlreadyCompleted,
        [_] => GuardVerdict::Resume,
        _ => GuardVerdict::Abandoned,
    };

    Ok(verdict)
}
