use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::content::{all_tier_content, TierContent, TierResult};
use super::domain::AnswerRecord;
use super::repository::{RepositoryError, SessionId, SessionRepository, TransitionPublisher};
use super::scoring::{evaluate, ScoreBreakdown};
use super::service::{AssessmentService, AssessmentServiceError};
use super::session::AssessmentEvent;

/// Router builder exposing the questionnaire over HTTP.
pub fn assessment_router<R, P>(service: Arc<AssessmentService<R, P>>) -> Router
where
    R: SessionRepository + 'static,
    P: TransitionPublisher + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(open_handler::<R, P>))
        .route("/api/v1/assessments/score", post(score_handler))
        .route(
            "/api/v1/assessments/:session_id",
            get(view_handler::<R, P>).delete(close_handler::<R, P>),
        )
        .route(
            "/api/v1/assessments/:session_id/events",
            post(event_handler::<R, P>),
        )
        .route(
            "/api/v1/assessments/:session_id/result",
            get(result_handler::<R, P>),
        )
        .route("/api/v1/tiers", get(tiers_handler))
        .with_state(service)
}

/// Stateless scoring response for callers that already hold every answer.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub breakdown: ScoreBreakdown,
    pub result: TierResult,
}

pub(crate) async fn open_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
) -> Response
where
    R: SessionRepository + 'static,
    P: TransitionPublisher + 'static,
{
    match service.new_session() {
        Ok(handle) => (StatusCode::CREATED, Json(handle)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn view_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    P: TransitionPublisher + 'static,
{
    match service.view(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn event_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
    event: Result<Json<AssessmentEvent>, JsonRejection>,
) -> Response
where
    R: SessionRepository + 'static,
    P: TransitionPublisher + 'static,
{
    let Json(event) = match event {
        Ok(event) => event,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.apply(&SessionId(session_id), event) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn result_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    P: TransitionPublisher + 'static,
{
    let id = SessionId(session_id);
    match service.current_result(&id) {
        Ok(Some(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(None) => {
            let payload = json!({
                "session_id": id.0,
                "error": "assessment has not reached the results step",
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn close_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    P: TransitionPublisher + 'static,
{
    match service.close(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler(
    answers: Result<Json<AnswerRecord>, JsonRejection>,
) -> Response {
    let Json(answers) = match answers {
        Ok(answers) => answers,
        Err(rejection) => return rejection_response(rejection),
    };
    match evaluate(&answers) {
        Ok(breakdown) => {
            let result = TierResult::new(breakdown.tier, breakdown.total_score);
            (StatusCode::OK, Json(ScoreResponse { breakdown, result })).into_response()
        }
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
                "missing": err.missing,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn tiers_handler() -> Json<&'static [TierContent]> {
    Json(all_tier_content())
}

fn error_response(err: AssessmentServiceError) -> Response {
    let status = match &err {
        AssessmentServiceError::Transition(_) => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::CapacityExceeded(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_))
        | AssessmentServiceError::Publish(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({ "error": rejection.body_text() });
    (rejection.status(), Json(payload)).into_response()
}
