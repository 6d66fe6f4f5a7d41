use chrono::NaiveDate;

use crate::triage::domain::CaseFacts;
use crate::triage::identity::{age_on, InvalidIdentityCode};

/// Ages of every applicant as of `as_of`, in applicant order.
///
/// Computed before any rule runs so that a malformed identity code aborts the
/// evaluation without recording the address in the run state.
pub(crate) fn applicant_ages(
    facts: &CaseFacts,
    as_of: NaiveDate,
) -> Result<Vec<i32>, InvalidIdentityCode> {
    facts
        .applicants
        .iter()
        .map(|applicant| age_on(&applicant.identity_code, as_of))
        .collect()
}
