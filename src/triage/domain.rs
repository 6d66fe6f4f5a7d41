use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// A unit of work as it appears on the portal worklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub case_number: String,
    pub case_types: BTreeSet<String>,
}

/// Occupancy snapshot extracted from an opened case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFacts {
    pub destination_address: String,
    pub resident_count: u32,
    pub room_count: u32,
    pub applicants: Vec<Applicant>,
}

/// A person requesting to move into the destination address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub identity_code: String,
}

/// Identifier wrapper for work-queue attempt records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub String);

/// One durable work-queue entry per historical processing attempt of a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub id: AttemptId,
    pub case_number: String,
    pub status: AttemptStatus,
    pub message: Option<String>,
}

/// Lifecycle of a processing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptStatus {
    New,
    InProgress,
    Done,
    Failed,
}

/// Mutable state owned by the dispatch loop for the duration of one run.
///
/// Each run starts from an empty set; nothing here survives across runs.
#[derive(Debug, Default)]
pub struct RunState {
    seen_addresses: HashSet<String>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the address was already handled earlier in the run.
    ///
    /// A first sighting is recorded; a repeat leaves the set untouched.
    /// Matching is exact, no normalization of case or whitespace.
    pub fn is_duplicate_and_record(&mut self, address: &str) -> bool {
        if self.seen_addresses.contains(address) {
            return true;
        }
        self.seen_addresses.insert(address.to_string());
        false
    }
}
