//! Case evaluation and idempotent dispatch for relocation registrations.
//!
//! The decision logic lives in [`evaluation`]; everything the engine needs
//! from the outside world comes in through the trait seams in [`ports`], so
//! the whole module can be exercised without a live portal.

pub mod domain;
pub mod evaluation;
pub mod filter;
pub mod fixture;
pub mod guard;
pub mod identity;
pub mod ports;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Applicant, AttemptId, AttemptRecord, AttemptStatus, Case, CaseFacts, RunState};
pub use evaluation::{CaseOutcome, EvaluationConfig, EvaluationEngine};
pub use filter::filter_cases;
pub use fixture::{FixtureError, FixturePortal, MemoryWorkQueue, TracingEventLog};
pub use guard::{should_process, GuardVerdict};
pub use identity::{age_on, InvalidIdentityCode};
pub use ports::{
    CaseEffector, CaseFactsProvider, EventCategory, EventLog, PortalError, WorkQueueError,
    WorkQueueService, WorklistSource,
};
pub use service::{
    CaseReportEntry, CaseResolution, CaseTriageService, RunReport, TriageRunError, TriageSettings,
};
