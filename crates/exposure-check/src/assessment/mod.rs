//! Four-question exposure assessment: answer collection, tier scoring and the
//! session service that exposes both to HTTP and terminal front ends.

pub mod content;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use content::{all_tier_content, content_for, TierContent, TierResult};
pub use domain::{
    AnswerField, AnswerRecord, EntitySize, GovernanceMaturity, InfrastructureFlags,
    ParseAnswerError, ServiceSensitivity, SingleAnswer, Step, Tier,
};
pub use repository::{
    PublishError, RepositoryError, SessionId, SessionRecord, SessionRepository, TransitionNotice,
    TransitionPublisher,
};
pub use router::{assessment_router, ScoreResponse};
pub use scoring::{
    breakdown, calculate_tier, evaluate, CompletedAnswers, IncompleteAnswers, ScoreBreakdown,
    ScoreComponent, ScoreFactor,
};
pub use service::{AssessmentService, AssessmentServiceError, SessionHandle};
pub use session::{AssessmentEvent, SessionState, StepView, TransitionError};
