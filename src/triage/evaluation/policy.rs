use serde::{Deserialize, Serialize};

use crate::triage::ports::EventCategory;

/// Final disposition of one case evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseOutcome {
    Approve,
    SkipDuplicateAddress,
    SkipOccupied,
    SkipAllMinors,
    SkipTooManyApplicants,
}

impl CaseOutcome {
    pub const fn is_approval(self) -> bool {
        matches!(self, CaseOutcome::Approve)
    }

    /// Message written to the attempt record when the case is finalized.
    /// Caseworkers read these in the queue UI, hence Danish.
    pub const fn queue_message(self) -> &'static str {
        match self {
            CaseOutcome::Approve => "Sag godkendt.",
            CaseOutcome::SkipDuplicateAddress => "Sprunget over: Duplikeret adresse",
            CaseOutcome::SkipOccupied => "Sprunget over: Beboere på adressen",
            CaseOutcome::SkipAllMinors => "Sprunget over: Alle ansøgere er mindreårige.",
            CaseOutcome::SkipTooManyApplicants => "Sprunget over: Flere ansøgere end rum.",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CaseOutcome::Approve => "approved",
            CaseOutcome::SkipDuplicateAddress => "skip_duplicate_address",
            CaseOutcome::SkipOccupied => "skip_occupied",
            CaseOutcome::SkipAllMinors => "skip_all_minors",
            CaseOutcome::SkipTooManyApplicants => "skip_too_many_applicants",
        }
    }

    pub const fn event_category(self) -> EventCategory {
        match self {
            CaseOutcome::Approve => EventCategory::Approved,
            _ => EventCategory::NotApproved,
        }
    }
}
