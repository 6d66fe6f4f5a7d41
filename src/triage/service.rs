use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{AttemptStatus, Case, RunState};
use super::evaluation::{CaseOutcome, EvaluationConfig, EvaluationEngine};
use super::filter::filter_cases;
use super::guard::{self, GuardVerdict};
use super::identity::InvalidIdentityCode;
use super::ports::{
    CaseEffector, CaseFactsProvider, EventLog, PortalError, WorkQueueError, WorkQueueService,
    WorklistSource,
};

/// Worklist search and allow-list settings for one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageSettings {
    pub allowed_case_types: BTreeSet<String>,
    pub state_filter: String,
}

impl Default for TriageSettings {
    fn default() -> Self {
        Self {
            allowed_case_types: ["Logivært", "Boligselskab", "For sent anmeldt"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            state_filter: "Ubehandlet".to_string(),
        }
    }
}

/// Service composing the attempt-history guard, the decision engine, and the
/// external collaborators into one sequential dispatch loop.
pub struct CaseTriageService<S, P, E, Q, L> {
    worklist: Arc<S>,
    facts: Arc<P>,
    effector: Arc<E>,
    queue: Arc<Q>,
    events: Arc<L>,
    engine: EvaluationEngine,
    settings: TriageSettings,
}

impl<S, P, E, Q, L> CaseTriageService<S, P, E, Q, L>
where
    S: WorklistSource + 'static,
    P: CaseFactsProvider + 'static,
    E: CaseEffector + 'static,
    Q: WorkQueueService + 'static,
    L: EventLog + 'static,
{
    pub fn new(
        worklist: Arc<S>,
        facts: Arc<P>,
        effector: Arc<E>,
        queue: Arc<Q>,
        events: Arc<L>,
        config: EvaluationConfig,
        settings: TriageSettings,
    ) -> Self {
        Self {
            worklist,
            facts,
            effector,
            queue,
            events,
            engine: EvaluationEngine::new(config),
            settings,
        }
    }

    /// Execute one triage run over a freshly fetched worklist.
    ///
    /// Cases are handled strictly in worklist order; the address dedup in
    /// `RunState` depends on that ordering. Per-case portal or identity
    /// failures defer the case (its attempt record stays non-done, so the next
    /// run resumes it); a work-queue failure aborts the whole run rather than
    /// risk double-processing.
    pub fn run(&self, as_of: NaiveDate) -> Result<RunReport, TriageRunError> {
        let raw = self
            .worklist
            .search(as_of, &self.settings.state_filter)
            .map_err(TriageRunError::Worklist)?;
        let searched = raw.len();
        let eligible = filter_cases(raw, &self.settings.allowed_case_types);
        info!(searched, eligible = eligible.len(), "worklist fetched");

        let mut run_state = RunState::new();
        let mut report = RunReport::new(searched, eligible.len());

        for case in &eligible {
            match self.process_case(case, &mut run_state, as_of) {
                Ok(resolution) => report.record(case, &resolution),
                Err(CaseFailure::WorkQueue(err)) => return Err(TriageRunError::WorkQueue(err)),
                Err(CaseFailure::Portal(err)) => {
                    warn!(case_number = %case.case_number, error = %err, "case deferred");
                    report.record_deferred(case, &err.to_string());
                }
                Err(CaseFailure::Identity(err)) => {
                    warn!(case_number = %case.case_number, error = %err, "case deferred");
                    report.record_deferred(case, &err.to_string());
                }
            }
        }

        Ok(report)
    }

    fn process_case(
        &self,
        case: &Case,
        run_state: &mut RunState,
        as_of: NaiveDate,
    ) -> Result<CaseResolution, CaseFailure> {
        let verdict = guard::should_process(self.queue.as_ref(), &case.case_number)?;
        if let Some(reason) = verdict.decline_reason() {
            info!(case_number = %case.case_number, "skipping: {reason}");
            return Ok(CaseResolution::Declined(verdict));
        }

        // The attempt record is the audit trail for this invocation. It is
        // created before any portal work so an interruption leaves it
        // non-done and the next run resumes the case.
        let attempt = self.queue.create(&case.case_number)?;
        self.queue
            .set_status(&attempt.id, AttemptStatus::InProgress, None)?;
        info!(case_number = %case.case_number, "beginning case");

        let facts = self
            .facts
            .open_and_extract(&case.case_number)
            .map_err(CaseFailure::Portal)?;
        let outcome = self
            .engine
            .decide(&facts, run_state, as_of)
            .map_err(CaseFailure::Identity)?;

        if outcome.is_approval() {
            let note = format!("{as_of} Besked fra Robot: Automatisk godkendt.");
            self.effector
                .note(&case.case_number, &note)
                .map_err(CaseFailure::Portal)?;
            self.effector
                .approve(&case.case_number)
                .map_err(CaseFailure::Portal)?;
        }

        self.queue.set_status(
            &attempt.id,
            AttemptStatus::Done,
            Some(outcome.queue_message()),
        )?;
        self.events.emit(
            outcome.event_category(),
            &format!("{}: {}", case.case_number, outcome.queue_message()),
        );

        Ok(CaseResolution::Decided(outcome))
    }
}

/// How a single case ended within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseResolution {
    /// The attempt-history guard declined to (re)process the case.
    Declined(GuardVerdict),
    /// The decision engine produced an outcome and the case was finalized.
    Decided(CaseOutcome),
}

/// Failure that aborts an entire triage run.
#[derive(Debug, thiserror::Error)]
pub enum TriageRunError {
    #[error("worklist search failed: {0}")]
    Worklist(#[source] PortalError),
    #[error(transparent)]
    WorkQueue(#[from] WorkQueueError),
}

#[derive(Debug, thiserror::Error)]
enum CaseFailure {
    #[error(transparent)]
    WorkQueue(#[from] WorkQueueError),
    #[error(transparent)]
    Portal(PortalError),
    #[error(transparent)]
    Identity(InvalidIdentityCode),
}

/// Summary of one dispatch run for operators and the HTTP surface.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub searched: usize,
    pub eligible: usize,
    pub approved: usize,
    pub skipped: usize,
    pub declined: usize,
    pub deferred: usize,
    pub cases: Vec<CaseReportEntry>,
}

/// Per-case line in the run report.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReportEntry {
    pub case_number: String,
    pub disposition: String,
    pub detail: String,
}

impl RunReport {
    fn new(searched: usize, eligible: usize) -> Self {
        Self {
            searched,
            eligible,
            approved: 0,
            skipped: 0,
            declined: 0,
            deferred: 0,
            cases: Vec::new(),
        }
    }

    fn record(&mut self, case: &Case, resolution: &CaseResolution) {
        match resolution {
            CaseResolution::Decided(outcome) => {
                if outcome.is_approval() {
                    self.approved += 1;
                } else {
                    self.skipped += 1;
                }
                self.push_entry(case, outcome.label(), outcome.queue_message());
            }
            CaseResolution::Declined(verdict) => {
                self.declined += 1;
                let reason = verdict.decline_reason().unwrap_or("declined");
                self.push_entry(case, "declined", reason);
            }
        }
    }

    fn record_deferred(&mut self, case: &Case, detail: &str) {
        self.deferred += 1;
        self.push_entry(case, "deferred", detail);
    }

    fn push_entry(&mut self, case: &Case, disposition: &str, detail: &str) {
        self.cases.push(CaseReportEntry {
            case_number: case.case_number.clone(),
            disposition: disposition.to_string(),
            detail: detail.to_string(),
        });
    }
}
