use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::assessment::domain::{
    EntitySize, GovernanceMaturity, InfrastructureFlags, ServiceSensitivity, SingleAnswer,
};
use crate::assessment::repository::{
    PublishError, RepositoryError, SessionId, SessionRecord, SessionRepository,
    TransitionNotice, TransitionPublisher,
};
use crate::assessment::scoring::CompletedAnswers;
use crate::assessment::session::{AssessmentEvent, SessionState, StepView, TransitionError};
use crate::assessment::{assessment_router, AssessmentService};
use crate::config::SessionConfig;

pub(super) fn flags(cloud: bool, mfa: bool, incident_process: bool, supply_chain: bool) -> InfrastructureFlags {
    InfrastructureFlags {
        cloud,
        mfa,
        incident_process,
        supply_chain,
    }
}

/// Large, high sensitivity, hardened infrastructure, ISO governance: 3 + 3 + 0 - 2 = 4.
pub(super) fn scenario_a() -> CompletedAnswers {
    CompletedAnswers {
        entity_size: EntitySize::Large,
        service_sensitivity: ServiceSensitivity::High,
        digital_infrastructure: flags(false, true, true, false),
        governance_maturity: GovernanceMaturity::Iso,
    }
}

/// Small, low sensitivity, every infrastructure risk, no governance: 1 + 1 + 3 + 2 = 7.
pub(super) fn scenario_b() -> CompletedAnswers {
    CompletedAnswers {
        entity_size: EntitySize::Small,
        service_sensitivity: ServiceSensitivity::Low,
        digital_infrastructure: flags(true, false, false, true),
        governance_maturity: GovernanceMaturity::None,
    }
}

pub(super) fn answer_events(answers: &CompletedAnswers) -> [AssessmentEvent; 4] {
    [
        AssessmentEvent::SingleAnswerChosen {
            answer: SingleAnswer::EntitySize(answers.entity_size),
        },
        AssessmentEvent::SingleAnswerChosen {
            answer: SingleAnswer::ServiceSensitivity(answers.service_sensitivity),
        },
        AssessmentEvent::InfrastructureFlagsSubmitted {
            flags: answers.digital_infrastructure,
        },
        AssessmentEvent::SingleAnswerChosen {
            answer: SingleAnswer::GovernanceMaturity(answers.governance_maturity),
        },
    ]
}

pub(super) fn complete_session(
    state: &mut SessionState,
    answers: &CompletedAnswers,
) -> Result<StepView, TransitionError> {
    let mut last = state.view();
    for event in answer_events(answers) {
        last = state.apply(event)?;
    }
    Ok(last)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl MemoryRepository {
    pub(super) fn backdate(&self, id: &SessionId, last_active: DateTime<Utc>) {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if let Some(record) = guard.get_mut(id) {
            record.last_active = last_active;
        }
    }

    pub(super) fn stored(&self, id: &SessionId) -> Option<SessionRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn live_count(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl SessionRepository for MemoryRepository {
    fn insert(
        &self,
        record: SessionRecord,
        capacity: usize,
    ) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        if guard.len() >= capacity {
            return Err(RepositoryError::CapacityExceeded(capacity));
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn modify<T, E, F>(&self, id: &SessionId, change: F) -> Result<T, E>
    where
        F: FnOnce(&mut SessionRecord) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let mut draft = record.clone();
        let outcome = change(&mut draft)?;
        *record = draft;
        Ok(outcome)
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn purge_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|_, record| !record.is_idle_since(cutoff));
        Ok(before - guard.len())
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(
        &self,
        _record: SessionRecord,
        _capacity: usize,
    ) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn modify<T, E, F>(&self, _id: &SessionId, _change: F) -> Result<T, E>
    where
        F: FnOnce(&mut SessionRecord) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        Err(RepositoryError::Unavailable("store offline".to_string()).into())
    }

    fn remove(&self, _id: &SessionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn purge_idle(&self, _cutoff: DateTime<Utc>) -> Result<usize, RepositoryError> {
        Ok(0)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDisplay {
    notices: Arc<Mutex<Vec<TransitionNotice>>>,
}

impl MemoryDisplay {
    pub(super) fn notices(&self) -> Vec<TransitionNotice> {
        self.notices.lock().expect("display mutex poisoned").clone()
    }
}

impl TransitionPublisher for MemoryDisplay {
    fn publish(&self, notice: TransitionNotice) -> Result<(), PublishError> {
        self.notices
            .lock()
            .expect("display mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) type TestService = AssessmentService<MemoryRepository, MemoryDisplay>;

pub(super) fn build_service_with(
    settings: SessionConfig,
) -> (TestService, Arc<MemoryRepository>, Arc<MemoryDisplay>) {
    let repository = Arc::new(MemoryRepository::default());
    let display = Arc::new(MemoryDisplay::default());
    let service = AssessmentService::new(repository.clone(), display.clone(), settings);
    (service, repository, display)
}

pub(super) fn build_service() -> (TestService, Arc<MemoryRepository>, Arc<MemoryDisplay>) {
    build_service_with(SessionConfig::default())
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
