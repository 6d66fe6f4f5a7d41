use std::collections::BTreeSet;

use super::domain::Case;

/// Keep the cases whose declared types are all on the allow-list.
///
/// Order-preserving. A case with no declared types passes vacuously; that is
/// how the portal presents cases that were never categorized, and those are
/// eligible for automatic handling.
pub fn filter_cases(cases: Vec<Case>, allowed_types: &BTreeSet<String>) -> Vec<Case> {
    cases
        .into_iter()
        .filter(|case| {
            case.case_types
                .iter()
                .all(|case_type| allowed_types.contains(case_type))
        })
        .collect()
}
