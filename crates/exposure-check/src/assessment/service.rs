use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::content::TierResult;
use super::repository::{
    PublishError, RepositoryError, SessionId, SessionRecord, SessionRepository,
    TransitionNotice, TransitionPublisher,
};
use super::session::{AssessmentEvent, SessionState, StepView, TransitionError};
use crate::config::SessionConfig;

/// Handle returned when a session is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionHandle {
    pub session_id: SessionId,
    pub view: StepView,
}

/// Service owning one [`SessionState`] per session id.
pub struct AssessmentService<R, P> {
    repository: Arc<R>,
    publisher: Arc<P>,
    settings: SessionConfig,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("asm-{id:06}"))
}

impl<R, P> AssessmentService<R, P>
where
    R: SessionRepository + 'static,
    P: TransitionPublisher + 'static,
{
    pub fn new(repository: Arc<R>, publisher: Arc<P>, settings: SessionConfig) -> Self {
        Self {
            repository,
            publisher,
            settings,
        }
    }

    /// Open a fresh session on the first screen.
    pub fn new_session(&self) -> Result<SessionHandle, AssessmentServiceError> {
        let now = Utc::now();
        let purged = self.repository.purge_idle(now - self.settings.idle_ttl())?;
        if purged > 0 {
            debug!(purged, "purged idle assessment sessions");
        }

        let record = SessionRecord {
            session_id: next_session_id(),
            state: SessionState::new(),
            opened_at: now,
            last_active: now,
        };
        let stored = match self.repository.insert(record, self.settings.max_sessions) {
            Ok(stored) => stored,
            Err(RepositoryError::CapacityExceeded(limit)) => {
                warn!(max_sessions = limit, "assessment session limit reached");
                return Err(RepositoryError::CapacityExceeded(limit).into());
            }
            Err(err) => return Err(err.into()),
        };
        info!(session_id = %stored.session_id, "assessment session opened");

        Ok(SessionHandle {
            session_id: stored.session_id,
            view: stored.state.view(),
        })
    }

    /// Apply one input event and return the screen to show next.
    ///
    /// The transition runs while the repository holds the session, so concurrent
    /// events on one session are applied one after another. Rejected events leave
    /// the stored session untouched. The display is notified once the change is stored.
    pub fn apply(
        &self,
        session_id: &SessionId,
        event: AssessmentEvent,
    ) -> Result<StepView, AssessmentServiceError> {
        let now = Utc::now();
        let view = self.touch_live(session_id, now, |record| {
            let view = record.state.apply(event)?;
            record.last_active = now;
            Ok(view)
        });

        let view = match view {
            Ok(view) => view,
            Err(AssessmentServiceError::Transition(err)) => {
                warn!(%session_id, event = event.name(), error = %err, "assessment event rejected");
                return Err(err.into());
            }
            Err(err) => return Err(err),
        };

        if let Some(result) = &view.result {
            if matches!(event, AssessmentEvent::SingleAnswerChosen { .. }) {
                info!(
                    %session_id,
                    tier = ?result.tier,
                    score = result.score,
                    "assessment result computed"
                );
            }
        } else {
            debug!(%session_id, event = event.name(), step = view.step_number, "assessment transition");
        }

        self.publisher.publish(TransitionNotice {
            session_id: session_id.clone(),
            event: event.name(),
            view: view.clone(),
        })?;

        Ok(view)
    }

    /// Fetch the screen a session currently sits on.
    pub fn view(&self, session_id: &SessionId) -> Result<StepView, AssessmentServiceError> {
        self.touch_live(session_id, Utc::now(), |record| Ok(record.state.view()))
    }

    /// Tier computed for the session, if it has reached the results screen.
    pub fn current_result(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<TierResult>, AssessmentServiceError> {
        self.touch_live(session_id, Utc::now(), |record| {
            Ok(record.state.result().cloned())
        })
    }

    /// Discard a session explicitly.
    pub fn close(&self, session_id: &SessionId) -> Result<(), AssessmentServiceError> {
        self.repository.remove(session_id)?;
        info!(%session_id, "assessment session closed");
        Ok(())
    }

    /// Runs `work` on a session that has not been idle past the TTL.
    ///
    /// Expired sessions are removed and reported as not found.
    fn touch_live<T, F>(
        &self,
        session_id: &SessionId,
        now: DateTime<Utc>,
        work: F,
    ) -> Result<T, AssessmentServiceError>
    where
        F: FnOnce(&mut SessionRecord) -> Result<T, AssessmentServiceError>,
    {
        let cutoff = now - self.settings.idle_ttl();
        let touched = self.repository.modify(session_id, |record| {
            if record.is_idle_since(cutoff) {
                return Ok(Touched::Expired {
                    opened_at: record.opened_at,
                });
            }
            work(record).map(Touched::Live)
        })?;

        match touched {
            Touched::Live(value) => Ok(value),
            Touched::Expired { opened_at } => {
                match self.repository.remove(session_id) {
                    Ok(()) | Err(RepositoryError::NotFound) => {}
                    Err(err) => return Err(err.into()),
                }
                debug!(
                    %session_id,
                    age_secs = (now - opened_at).num_seconds(),
                    "assessment session expired"
                );
                Err(RepositoryError::NotFound.into())
            }
        }
    }
}

enum Touched<T> {
    Live(T),
    Expired { opened_at: DateTime<Utc> },
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}
