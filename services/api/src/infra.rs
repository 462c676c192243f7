use chrono::{DateTime, Utc};
use exposure_check::assessment::{
    PublishError, RepositoryError, SessionId, SessionRecord, SessionRepository, TransitionNotice,
    TransitionPublisher,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for InMemorySessionRepository {
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
        match guard.remove(id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn purge_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|_, record| !record.is_idle_since(cutoff));
        Ok(before - guard.len())
    }
}

/// Display hook for the HTTP service: clients poll the API, so transitions are only logged.
#[derive(Default, Clone, Copy)]
pub(crate) struct TracingPublisher;

impl TransitionPublisher for TracingPublisher {
    fn publish(&self, notice: TransitionNotice) -> Result<(), PublishError> {
        match &notice.view.result {
            Some(result) => info!(
                session_id = %notice.session_id,
                event = notice.event,
                tier = result.label(),
                "assessment reached results"
            ),
            None => info!(
                session_id = %notice.session_id,
                event = notice.event,
                step = notice.view.step_number,
                "assessment step shown"
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use exposure_check::assessment::SessionState;

    fn record(id: &str, last_active: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            session_id: SessionId(id.to_string()),
            state: SessionState::new(),
            opened_at: last_active,
            last_active,
        }
    }

    fn last_active(repository: &InMemorySessionRepository, id: &str) -> Option<DateTime<Utc>> {
        repository
            .modify(&SessionId(id.to_string()), |record| {
                Ok::<_, RepositoryError>(record.last_active)
            })
            .ok()
    }

    #[test]
    fn insert_rejects_duplicates_and_enforces_capacity() {
        let repository = InMemorySessionRepository::default();
        let now = Utc::now();

        repository.insert(record("asm-1", now), 2).expect("first insert");
        assert!(matches!(
            repository.insert(record("asm-1", now), 2),
            Err(RepositoryError::Conflict)
        ));
        repository.insert(record("asm-2", now), 2).expect("second insert");
        assert!(matches!(
            repository.insert(record("asm-3", now), 2),
            Err(RepositoryError::CapacityExceeded(2))
        ));
    }

    #[test]
    fn modify_writes_back_only_on_success() {
        let repository = InMemorySessionRepository::default();
        let now = Utc::now();
        let later = now + Duration::seconds(30);
        repository.insert(record("asm-1", now), 1).expect("insert");
        let id = SessionId("asm-1".to_string());

        let failed: Result<(), RepositoryError> = repository.modify(&id, |record| {
            record.last_active = later;
            Err(RepositoryError::Unavailable("aborted".to_string()))
        });
        assert!(failed.is_err());
        assert_eq!(last_active(&repository, "asm-1"), Some(now));

        repository
            .modify(&id, |record| {
                record.last_active = later;
                Ok::<_, RepositoryError>(())
            })
            .expect("modify succeeds");
        assert_eq!(last_active(&repository, "asm-1"), Some(later));

        assert!(matches!(
            repository.modify(&SessionId("asm-9".to_string()), |_| Ok::<_, RepositoryError>(())),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn purge_drops_only_idle_sessions() {
        let repository = InMemorySessionRepository::default();
        let now = Utc::now();
        repository
            .insert(record("asm-old", now - Duration::hours(2)), 10)
            .expect("insert old");
        repository.insert(record("asm-new", now), 10).expect("insert new");

        let purged = repository
            .purge_idle(now - Duration::hours(1))
            .expect("purge succeeds");

        assert_eq!(purged, 1);
        assert!(last_active(&repository, "asm-old").is_none());
        assert_eq!(last_active(&repository, "asm-new"), Some(now));
    }
}
