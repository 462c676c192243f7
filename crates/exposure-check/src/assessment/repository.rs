use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::{SessionState, StepView};

/// Identifier wrapper for assessment sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository record holding one session and its activity timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub state: SessionState,
    pub opened_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_active < cutoff
    }
}

/// Storage abstraction keeping sessions isolated from one another.
///
/// Work on one session is serialized: `modify` holds the session exclusively while
/// `change` runs, and `insert` checks the capacity in the same critical section
/// as the write.
pub trait SessionRepository: Send + Sync {
    /// Stores a new record unless `capacity` live records already exist.
    fn insert(&self, record: SessionRecord, capacity: usize)
        -> Result<SessionRecord, RepositoryError>;
    /// Runs `change` on the stored record; the record is written back only when it succeeds.
    fn modify<T, E, F>(&self, id: &SessionId, change: F) -> Result<T, E>
    where
        F: FnOnce(&mut SessionRecord) -> Result<T, E>,
        E: From<RepositoryError>;
    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError>;
    /// Drops sessions whose last activity precedes `cutoff`, returning how many were removed.
    fn purge_idle(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session limit of {0} reached")]
    CapacityExceeded(usize),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook notified of every accepted transition (the display side).
pub trait TransitionPublisher: Send + Sync {
    fn publish(&self, notice: TransitionNotice) -> Result<(), PublishError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionNotice {
    pub session_id: SessionId,
    pub event: &'static str,
    pub view: StepView,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("display transport unavailable: {0}")]
    Transport(String),
}
