mod config;
mod policy;
mod rules;

pub use config::EvaluationConfig;
pub use policy::CaseOutcome;

use chrono::NaiveDate;

use super::domain::{CaseFacts, RunState};
use super::identity::InvalidIdentityCode;

/// Stateless evaluator applying the occupancy rules to one case's facts.
pub struct EvaluationEngine {
    config: EvaluationConfig,
}

impl EvaluationEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    /// Decide a case. First matching rule wins.
    ///
    /// The duplicate-address and occupancy checks run before any age or room
    /// arithmetic; the headroom exceptions further down must never override
    /// them. The only mutation is recording the destination address in
    /// `run_state` when it is seen for the first time.
    pub fn decide(
        &self,
        facts: &CaseFacts,
        run_state: &mut RunState,
        as_of: NaiveDate,
    ) -> Result<CaseOutcome, InvalidIdentityCode> {
        let ages = rules::applicant_ages(facts, as_of)?;

        if run_state.is_duplicate_and_record(&facts.destination_address) {
            return Ok(CaseOutcome::SkipDuplicateAddress);
        }

        if facts.resident_count != 0 {
            return Ok(CaseOutcome::SkipOccupied);
        }

        // No adult present to take legal responsibility. An empty applicant
        // list is not "all minors"; it falls through to the headroom rule.
        if !ages.is_empty()
            && ages.iter().all(|age| *age < self.config.minimum_adult_age)
        {
            return Ok(CaseOutcome::SkipAllMinors);
        }

        if facts.room_count as usize >= facts.applicants.len() {
            return Ok(CaseOutcome::Approve);
        }

        // Parent-plus-young-child exception to the one-room rule.
        if facts.room_count == 1
            && ages.len() == 2
            && ages.iter().any(|age| *age < self.config.young_child_age)
        {
            return Ok(CaseOutcome::Approve);
        }

        Ok(CaseOutcome::SkipTooManyApplicants)
    }
}
