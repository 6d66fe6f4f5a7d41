//! Collaborator contracts the dispatch loop depends on.
//!
//! The portal traits stand in for whatever mechanism turns a rendered case
//! into structured data and pushes decisions back; the work-queue trait fronts
//! the durable attempt-history service. Implementations live with the process
//! entry point (or in [`super::fixture`] for fixture-driven runs).

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{AttemptId, AttemptRecord, AttemptStatus, Case, CaseFacts};

/// Failure surfaced by a portal collaborator.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("case {0} not found in the portal")]
    CaseNotFound(String),
    #[error("portal unavailable: {0}")]
    Unavailable(String),
}

/// Failure surfaced by the work-queue service.
#[derive(Debug, thiserror::Error)]
pub enum WorkQueueError {
    #[error("work queue unavailable: {0}")]
    Unavailable(String),
    #[error("attempt record {0} not found")]
    UnknownAttempt(String),
}

/// Produces the raw worklist for a run.
pub trait WorklistSource: Send + Sync {
    fn search(&self, as_of: NaiveDate, state_filter: &str) -> Result<Vec<Case>, PortalError>;
}

/// Opens a case and extracts its occupancy facts.
pub trait CaseFactsProvider: Send + Sync {
    fn open_and_extract(&self, case_number: &str) -> Result<CaseFacts, PortalError>;
}

/// Mutates external portal state for a case.
pub trait CaseEffector: Send + Sync {
    fn note(&self, case_number: &str, text: &str) -> Result<(), PortalError>;
    fn approve(&self, case_number: &str) -> Result<(), PortalError>;
}

/// Durable attempt history keyed by case number.
pub trait WorkQueueService: Send + Sync {
    fn attempts_for(&self, case_number: &str) -> Result<Vec<AttemptRecord>, WorkQueueError>;
    fn create(&self, case_number: &str) -> Result<AttemptRecord, WorkQueueError>;
    fn set_status(
        &self,
        id: &AttemptId,
        status: AttemptStatus,
        message: Option<&str>,
    ) -> Result<(), WorkQueueError>;
}

/// Fire-and-forget audit sink for run outcomes.
pub trait EventLog: Send + Sync {
    fn emit(&self, category: EventCategory, message: &str);
}

/// Audit classification of a finalized case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Approved,
    NotApproved,
}

impl EventCategory {
    pub const fn label(self) -> &'static str {
        match self {
            EventCategory::Approved => "approved",
            EventCategory::NotApproved => "not_approved",
        }
    }
}
