use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::triage::domain::{
    Applicant, AttemptId, AttemptRecord, AttemptStatus, Case, CaseFacts,
};
use crate::triage::evaluation::{EvaluationConfig, EvaluationEngine};
use crate::triage::fixture::MemoryWorkQueue;
use crate::triage::ports::{
    CaseEffector, CaseFactsProvider, EventCategory, EventLog, PortalError, WorkQueueError,
    WorkQueueService, WorklistSource,
};
use crate::triage::service::{CaseTriageService, TriageSettings};

/// Fixed evaluation date so identity codes map to stable ages.
pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

// Identity codes with known ages as of 2024-06-01.
pub(super) const AGE_30: &str = "010194";
pub(super) const AGE_20: &str = "010104";
pub(super) const AGE_17: &str = "010107";
pub(super) const AGE_16: &str = "010108";
pub(super) const AGE_10: &str = "010114";

pub(super) fn case(case_number: &str, case_types: &[&str]) -> Case {
    Case {
        case_number: case_number.to_string(),
        case_types: case_types.iter().map(|tag| tag.to_string()).collect(),
    }
}

pub(super) fn facts(
    address: &str,
    resident_count: u32,
    room_count: u32,
    identity_codes: &[&str],
) -> CaseFacts {
    CaseFacts {
        destination_address: address.to_string(),
        resident_count,
        room_count,
        applicants: identity_codes
            .iter()
            .map(|code| Applicant {
                identity_code: code.to_string(),
            })
            .collect(),
    }
}

pub(super) fn engine() -> EvaluationEngine {
    EvaluationEngine::new(EvaluationConfig::default())
}

pub(super) fn allowed_types() -> BTreeSet<String> {
    TriageSettings::default().allowed_case_types
}

/// Portal fake with scripted worklist and facts; records effector calls.
#[derive(Default)]
pub(super) struct ScriptedPortal {
    pub(super) worklist: Vec<Case>,
    pub(super) facts: HashMap<String, CaseFacts>,
    pub(super) failing_cases: HashSet<String>,
    notes: Mutex<Vec<(String, String)>>,
    approvals: Mutex<Vec<String>>,
}

impl ScriptedPortal {
    pub(super) fn with_case(mut self, case: Case, facts: CaseFacts) -> Self {
        self.facts.insert(case.case_number.clone(), facts);
        self.worklist.push(case);
        self
    }

    pub(super) fn with_failing_case(mut self, case: Case) -> Self {
        self.failing_cases.insert(case.case_number.clone());
        self.worklist.push(case);
        self
    }

    pub(super) fn notes(&self) -> Vec<(String, String)> {
        self.notes.lock().expect("notes mutex poisoned").clone()
    }

    pub(super) fn approvals(&self) -> Vec<String> {
        self.approvals
            .lock()
            .expect("approvals mutex poisoned")
            .clone()
    }
}

impl WorklistSource for ScriptedPortal {
    fn search(&self, _as_of: NaiveDate, _state_filter: &str) -> Result<Vec<Case>, PortalError> {
        Ok(self.worklist.clone())
    }
}

impl CaseFactsProvider for ScriptedPortal {
    fn open_and_extract(&self, case_number: &str) -> Result<CaseFacts, PortalError> {
        if self.failing_cases.contains(case_number) {
            return Err(PortalError::Unavailable("portal timed out".to_string()));
        }
        self.facts
            .get(case_number)
            .cloned()
            .ok_or_else(|| PortalError::CaseNotFound(case_number.to_string()))
    }
}

impl CaseEffector for ScriptedPortal {
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

/// Event sink capturing emitted audit entries.
#[derive(Default)]
pub(super) struct MemoryEventLog {
    events: Mutex<Vec<(EventCategory, String)>>,
}

impl MemoryEventLog {
    pub(super) fn events(&self) -> Vec<(EventCategory, String)> {
        self.events.lock().expect("events mutex poisoned").clone()
    }
}

impl EventLog for MemoryEventLog {
    fn emit(&self, category: EventCategory, message: &str) {
        self.events
            .lock()
            .expect("events mutex poisoned")
            .push((category, message.to_string()));
    }
}

/// Work queue that fails every operation.
pub(super) struct UnavailableWorkQueue;

impl WorkQueueService for UnavailableWorkQueue {
    fn attempts_for(&self, _case_number: &str) -> Result<Vec<AttemptRecord>, WorkQueueError> {
        Err(WorkQueueError::Unavailable("database offline".to_string()))
    }

    fn create(&self, _case_number: &str) -> Result<AttemptRecord, WorkQueueError> {
        Err(WorkQueueError::Unavailable("database offline".to_string()))
    }

    fn set_status(
        &self,
        _id: &AttemptId,
        _status: AttemptStatus,
        _message: Option<&str>,
    ) -> Result<(), WorkQueueError> {
        Err(WorkQueueError::Unavailable("database offline".to_string()))
    }
}

pub(super) type ScriptedService =
    CaseTriageService<ScriptedPortal, ScriptedPortal, ScriptedPortal, MemoryWorkQueue, MemoryEventLog>;

pub(super) fn build_service(
    portal: ScriptedPortal,
) -> (
    ScriptedService,
    Arc<ScriptedPortal>,
    Arc<MemoryWorkQueue>,
    Arc<MemoryEventLog>,
) {
    build_service_with_queue(portal, MemoryWorkQueue::default())
}

pub(super) fn build_service_with_queue(
    portal: ScriptedPortal,
    queue: MemoryWorkQueue,
) -> (
    ScriptedService,
    Arc<ScriptedPortal>,
    Arc<MemoryWorkQueue>,
    Arc<MemoryEventLog>,
) {
    let portal = Arc::new(portal);
    let queue = Arc::new(queue);
    let events = Arc::new(MemoryEventLog::default());
    let service = CaseTriageService::new(
        portal.clone(),
        portal.clone(),
        portal.clone(),
        queue.clone(),
        events.clone(),
        EvaluationConfig::default(),
        TriageSettings::default(),
    );
    (service, portal, queue, events)
}
