use serde::{Deserialize, Serialize};

/// Age thresholds backing the approval rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Age at which an applicant counts as an adult able to take legal
    /// responsibility for the registration.
    pub minimum_adult_age: i32,
    /// Ages strictly below this qualify for the parent-plus-young-child
    /// exception to the one-room rule.
    pub young_child_age: i32,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            minimum_adult_age: 19,
            young_child_age: 15,
        }
    }
}
