//! In-memory collaborators for fixture-driven runs.
//!
//! Production deployments wire the portal traits to the live case portal.
//! Demo runs, the HTTP endpoint, and tests drive the dispatch loop from a
//! worklist CSV export instead, with attempt history kept in process memory.

use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::NaiveDate;

use super::domain::{Applicant, AttemptId, AttemptRecord, AttemptStatus, Case, CaseFacts};
use super::ports::{
    CaseEffector, CaseFactsProvider, EventCategory, EventLog, PortalError, WorkQueueError,
    WorkQueueService, WorklistSource,
};

/// Failure loading a worklist fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read worklist fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse worklist fixture: {0}")]
    Csv(#[from] csv::Error),
}

/// Portal stand-in hydrated from a worklist CSV export.
///
/// Implements the worklist, fact-extraction, and effector contracts at once;
/// notes and approvals are captured so callers can inspect what a real run
/// would have pushed to the portal.
pub struct FixturePortal {
    cases: Vec<Case>,
    facts: HashMap<String, CaseFacts>,
    notes: Mutex<Vec<(String, String)>>,
    approvals: Mutex<Vec<String>>,
}

#[derive(Debug, serde::Deserialize)]
struct WorklistRow {
    #[serde(rename = "Sagsnummer")]
    case_number: String,
    #[serde(rename = "Sagstyper", default)]
    case_types: String,
    #[serde(rename = "Tiladresse")]
    destination_address: String,
    #[serde(rename = "Beboere")]
    resident_count: u32,
    #[serde(rename = "Rum")]
    room_count: u32,
    #[serde(rename = "Ansøgere", default)]
    applicants: String,
}

impl FixturePortal {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FixtureError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut cases = Vec::new();
        let mut facts = HashMap::new();

        for record in csv_reader.deserialize::<WorklistRow>() {
            let row = record?;

            let case_types: BTreeSet<String> = row
                .case_types
                .split(',')
                .map(str::trim)
                .filter(|case_type| !case_type.is_empty())
                .map(str::to_string)
                .collect();
            let applicants: Vec<Applicant> = row
                .applicants
                .split_whitespace()
                .map(|identity_code| Applicant {
                    identity_code: identity_code.to_string(),
                })
                .collect();

            cases.push(Case {
                case_number: row.case_number.clone(),
                case_types,
            });
            facts.insert(
                row.case_number,
                CaseFacts {
                    destination_address: row.destination_address,
                    resident_count: row.resident_count,
                    room_count: row.room_count,
                    applicants,
                },
            );
        }

        Ok(Self {
            cases,
            facts,
            notes: Mutex::new(Vec::new()),
            approvals: Mutex::new(Vec::new()),
        })
    }

    /// Notes a run would have written to the portal, as (case number, text).
    pub fn notes(&self) -> Vec<(String, String)> {
        self.notes.lock().expect("notes mutex poisoned").clone()
    }

    /// Case numbers a run would have approved in the portal.
    pub fn approvals(&self) -> Vec<String> {
        self.approvals
            .lock()
            .expect("approvals mutex poisoned")
            .clone()
    }
}

impl WorklistSource for FixturePortal {
    fn search(&self, _as_of: NaiveDate, _state_filter: &str) -> Result<Vec<Case>, PortalError> {
        // A fixture export is already the result of a portal search; the date
        // and state filter were applied when it was taken.
        Ok(self.cases.clone())
    }
}

impl CaseFactsProvider for FixturePortal {
    fn open_and_extract(&self, case_number: &str) -> Result<CaseFacts, PortalError> {
        self.facts
            .get(case_number)
            .cloned()
            .ok_or_else(|| PortalError::CaseNotFound(case_number.to_string()))
    }
}

impl CaseEffector for FixturePortal {
    fn note(&self, case_number: &str, text: &str) -> Result<(), PortalError> {
        self.notes
            .lock()
            .expect("notes mutex poisoned")
            .push((case_number.to_string(), text.to_string()));
        Ok(())
    }

    fn approve(&self, case_number: &str) -> Result<(), PortalError> {
        self.approvals
            .lock()
            .expect("approvals mutex poisoned")
            .push(case_number.to_string());
        Ok(())
    }
}

/// Work-queue service keeping attempt records in process memory.
#[derive(Default)]
pub struct MemoryWorkQueue {
    attempts: Mutex<Vec<AttemptRecord>>,
    sequence: AtomicU64,
}

impl WorkQueueService for MemoryWorkQueue {
    fn attempts_for(&self, case_number: &str) -> Result<Vec<AttemptRecord>, WorkQueueError> {
        let attempts = self.attempts.lock().expect("attempts mutex poisoned");
        Ok(attempts
            .iter()
            .filter(|attempt| attempt.case_number == case_number)
            .cloned()
            .collect())
    }

    fn create(&self, case_number: &str) -> Result<AttemptRecord, WorkQueueError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let record = AttemptRecord {
            id: AttemptId(format!("attempt-{id:06}")),
            case_number: case_number.to_string(),
            status: AttemptStatus::New,
            message: None,
        };
        self.attempts
            .lock()
            .expect("attempts mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn set_status(
        &self,
        id: &AttemptId,
        status: AttemptStatus,
        message: Option<&str>,
    ) -> Result<(), WorkQueueError> {
        let mut attempts = self.attempts.lock().expect("attempts mutex poisoned");
        let attempt = attempts
            .iter_mut()
            .find(|attempt| &attempt.id == id)
            .ok_or_else(|| WorkQueueError::UnknownAttempt(id.0.clone()))?;

        attempt.status = status;
        if let Some(message) = message {
            attempt.message = Some(message.to_string());
        }
        Ok(())
    }
}

/// Event sink forwarding audit entries to the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventLog;

impl EventLog for TracingEventLog {
    fn emit(&self, category: EventCategory, message: &str) {
        tracing::info!(category = category.label(), "{message}");
    }
}
