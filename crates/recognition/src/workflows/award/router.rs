use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Period, PeriodId, RatingUpdate, UserId};
use super::error::WorkflowError;
use super::repository::{AwardRepository, RepositoryError, RoleDirectory};
use super::service::AwardService;

/// Router builder exposing the award pipeline over HTTP. Everything but
/// the active-period lookup takes an explicit period id so the host can
/// also query historical periods it still holds.
pub fn award_router<R, D>(service: Arc<AwardService<R, D>>) -> Router
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    Router::new()
        .route("/api/v1/award/period", get(active_period_handler::<R, D>))
        .route("/api/v1/award/periods", post(open_period_handler::<R, D>))
        .route("/api/v1/award/:period/pool", get(pool_handler::<R, D>))
        .route(
            "/api/v1/award/:period/votes/status",
            get(voting_status_handler::<R, D>),
        )
        .route(
            "/api/v1/award/:period/votes/:voter",
            put(submit_votes_handler::<R, D>).get(user_votes_handler::<R, D>),
        )
        .route(
            "/api/v1/award/:period/votes/:voter/complete",
            post(mark_completed_handler::<R, D>),
        )
        .route(
            "/api/v1/award/:period/shortlist",
            get(shortlist_handler::<R, D>),
        )
        .route("/api/v1/award/:period/top", get(top_candidates_handler::<R, D>))
        .route(
            "/api/v1/award/:period/ratings/:rater",
            get(ratings_map_handler::<R, D>),
        )
        .route(
            "/api/v1/award/:period/ratings/:rater/:candidate",
            put(submit_rating_handler::<R, D>).get(user_rating_handler::<R, D>),
        )
        .route("/api/v1/award/:period/scores", get(scores_handler::<R, D>))
        .route(
            "/api/v1/award/:period/winner",
            get(winner_handler::<R, D>).post(record_winner_handler::<R, D>),
        )
        .route(
            "/api/v1/award/:period/phase/:user",
            get(phase_handler::<R, D>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct VoteSubmission {
    candidates: Vec<UserId>,
}

#[derive(Debug, Deserialize)]
struct TopQuery {
    #[serde(default = "default_top_n")]
    n: usize,
}

fn default_top_n() -> usize {
    super::domain::SHORTLIST_SIZE
}

#[derive(Debug, Deserialize)]
struct PhaseQuery {
    active: Option<String>,
}

async fn active_period_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    respond(service.active_period().map(Json))
}

async fn open_period_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Json(period): Json<Period>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    match service.open_period(period) {
        Ok(pool) => (StatusCode::CREATED, Json(pool)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn pool_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path(period): Path<String>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    respond(service.eligible_pool(&PeriodId(period)).map(Json))
}

async fn submit_votes_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path((period, voter)): Path<(String, String)>,
    Json(submission): Json<VoteSubmission>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    match service.submit_votes(&PeriodId(period), &UserId(voter), &submission.candidates) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn user_votes_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path((period, voter)): Path<(String, String)>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    respond(
        service
            .user_votes(&PeriodId(period), &UserId(voter))
            .map(|candidates| Json(json!({ "candidates": candidates }))),
    )
}

async fn mark_completed_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path((period, voter)): Path<(String, String)>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    match service.mark_completed(&PeriodId(period), &UserId(voter)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn voting_status_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path(period): Path<String>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    respond(service.voting_status(&PeriodId(period)).map(Json))
}

async fn shortlist_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path(period): Path<String>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    respond(
        service
            .compute_shortlist(&PeriodId(period))
            .map(|candidates| Json(json!({ "candidates": candidates }))),
    )
}

async fn top_candidates_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path(period): Path<String>,
    Query(query): Query<TopQuery>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    respond(service.top_candidates(&PeriodId(period), query.n).map(|ranked| {
        let rows: Vec<_> = ranked
            .into_iter()
            .map(|(candidate, votes)| json!({ "candidate": candidate, "votes": votes }))
            .collect();
        Json(json!(rows))
    }))
}

async fn submit_rating_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path((period, rater, candidate)): Path<(String, String, String)>,
    Json(update): Json<RatingUpdate>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    respond(
        service
            .submit_rating(&PeriodId(period), &UserId(rater), &UserId(candidate), &update)
            .map(|state| Json(json!({ "state": state.label() }))),
    )
}

async fn user_rating_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path((period, rater, candidate)): Path<(String, String, String)>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    respond(
        service
            .user_rating(&PeriodId(period), &UserId(rater), &UserId(candidate))
            .map(|scores| Json(json!({ "scores": scores }))),
    )
}

async fn ratings_map_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path((period, rater)): Path<(String, String)>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    respond(
        service
            .user_ratings_map(&PeriodId(period), &UserId(rater))
            .map(Json),
    )
}

async fn scores_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path(period): Path<String>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    respond(service.compute_scores(&PeriodId(period)).map(Json))
}

async fn winner_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path(period): Path<String>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    respond(
        service
            .compute_winner(&PeriodId(period))
            .map(|winner| Json(json!({ "winner": winner }))),
    )
}

async fn record_winner_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path(period): Path<String>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    respond(
        service
            .record_winner(&PeriodId(period))
            .map(|winner| Json(json!({ "winner": winner }))),
    )
}

async fn phase_handler<R, D>(
    State(service): State<Arc<AwardService<R, D>>>,
    Path((period, user)): Path<(String, String)>,
    Query(query): Query<PhaseQuery>,
) -> Response
where
    R: AwardRepository + 'static,
    D: RoleDirectory + 'static,
{
    let active = query.active.map(UserId);
    respond(
        service
            .resolve_phase(&PeriodId(period), &UserId(user), active.as_ref())
            .map(|phase| Json(json!({ "phase": phase.label() }))),
    )
}

fn respond<T: IntoResponse>(result: Result<T, WorkflowError>) -> Response {
    match result {
        Ok(body) => body.into_response(),
        Err(err) => error_response(err),
    }
}

/// Precondition failures map to 4xx so the host can surface them to the
/// requesting user; only repository outages look like server faults.
fn error_response(err: WorkflowError) -> Response {
    let status = match &err {
        WorkflowError::InvalidSelection { .. }
        | WorkflowError::IncompleteVoteSet { .. }
        | WorkflowError::InvalidRatingValue { .. }
        | WorkflowError::NotInShortlist { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        WorkflowError::QuorumNotMet { .. } => StatusCode::CONFLICT,
        WorkflowError::NoActivePeriod => StatusCode::NOT_FOUND,
        WorkflowError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        WorkflowError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
