//! REST API routes for the approval workflow.
//!
//! Thin handlers: each validates its parameters, calls one workflow service
//! and shapes the JSON answer.

use crate::db::{ballots, events};
use crate::error::AppError;
use crate::models::{LeaderboardEntry, PendingReview};
use crate::services::nomination::{self, NominationInput};
use crate::services::quorum::QuorumOutcome;
use crate::services::reconciliation::{self, RepairedEvent};
use crate::services::server::AppState;
use crate::services::{directory, leaderboard, ledger};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

// ── Error handling ───────────────────────────────────────────────────────────

/// JSON error body.
#[derive(Serialize)]
struct ApiError {
    code: String,
    message: String,
    /// Only set for the membership-mismatch failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

/// Wrapper to make AppError usable as an axum error response.
pub struct ApiErr(AppError);

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            AppError::NotAGroupMember { .. } => (StatusCode::FORBIDDEN, "NOT_A_GROUP_MEMBER"),
            AppError::Ambiguous { .. } => (StatusCode::CONFLICT, "AMBIGUOUS_NAME"),
            AppError::AlreadyReviewed { .. } => (StatusCode::CONFLICT, "ALREADY_REVIEWED"),
            AppError::Database { .. } | AppError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        if status.is_server_error() {
            log::error!("[api] {}", self.0);
        }

        let details = match &self.0 {
            AppError::NotAGroupMember { .. } => serde_json::to_value(&self.0)
                .ok()
                .and_then(|v| v.get("details").cloned()),
            _ => None,
        };

        (
            status,
            Json(ApiError {
                code: code.to_string(),
                message: self.0.to_string(),
                details,
            }),
        )
            .into_response()
    }
}

impl From<AppError> for ApiErr {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<sqlx::Error> for ApiErr {
    fn from(err: sqlx::Error) -> Self {
        Self(AppError::from(err))
    }
}

impl From<JsonRejection> for ApiErr {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::invalid_input(rejection.body_text()))
    }
}

/// Return the trimmed value of a required parameter.
fn required(value: Option<String>, field: &str) -> Result<String, ApiErr> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::missing_field(field).into()),
    }
}

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NominationRequest {
    nominee_name: Option<String>,
    group_id: Option<String>,
    #[serde(default)]
    points: serde_json::Value,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NominationResponse {
    pub status: String,
    pub event_id: String,
    pub ballots_created: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardQuery {
    group_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefaultGroupQuery {
    member_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultGroupResponse {
    pub group_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PendingReviewsQuery {
    group_id: Option<String>,
    reviewer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecisionRequest {
    ballot_id: Option<String>,
    event_id: Option<String>,
    group_id: Option<String>,
    approved: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RepairResponse {
    pub repaired: Vec<RepairedEvent>,
}

// ── Route builder ────────────────────────────────────────────────────────────

/// Build the workflow API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/nominations", post(submit_nomination))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/default-group", get(get_default_group))
        .route("/api/reviews/pending", get(get_pending_reviews))
        .route("/api/reviews/decision", post(record_decision))
        .route("/api/maintenance/repair-orphans", post(repair_orphans))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// Fallback for unmatched paths. Always JSON, never an empty body.
pub async fn route_not_found(uri: Uri) -> ApiErr {
    AppError::not_found_with_id("Route", uri.path()).into()
}

/// GET /api/health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/nominations: submit a nomination and fan out its ballots.
async fn submit_nomination(
    State(state): State<AppState>,
    body: Result<Json<NominationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NominationResponse>), ApiErr> {
    let Json(body) = body?;

    let input = NominationInput {
        nominee_name: required(body.nominee_name, "nomineeName")?,
        group_id: required(body.group_id, "groupId")?,
        points: body.points,
        description: body.description.unwrap_or_default(),
    };

    let receipt = nomination::submit_nomination(&state.db, &state.settings, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(NominationResponse {
            status: "created".to_string(),
            event_id: receipt.event_id,
            ballots_created: receipt.ballots_created,
        }),
    ))
}

/// GET /api/leaderboard?groupId=X: top members by approved points.
async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiErr> {
    let group_id = required(params.group_id, "groupId")?;

    let entries =
        leaderboard::top_members(&state.db, &group_id, state.settings.leaderboard_limit).await?;
    Ok(Json(entries))
}

/// GET /api/default-group?memberId=X: the member's default group, if any.
async fn get_default_group(
    State(state): State<AppState>,
    Query(params): Query<DefaultGroupQuery>,
) -> Result<Json<DefaultGroupResponse>, ApiErr> {
    let member_id = required(params.member_id, "memberId")?;

    let group_id = directory::default_group(&state.db, &member_id).await?;
    Ok(Json(DefaultGroupResponse { group_id }))
}

/// GET /api/reviews/pending?groupId=X&reviewerId=Y: ballots awaiting the reviewer.
async fn get_pending_reviews(
    State(state): State<AppState>,
    Query(params): Query<PendingReviewsQuery>,
) -> Result<Json<Vec<PendingReview>>, ApiErr> {
    let group_id = required(params.group_id, "groupId")?;
    let reviewer_id = required(params.reviewer_id, "reviewerId")?;

    let pending =
        ledger::list_pending_ballots_for_reviewer(&state.db, &group_id, &reviewer_id).await?;
    Ok(Json(pending))
}

/// POST /api/reviews/decision: record a decision and re-evaluate quorum.
///
/// The submitted event and group must match the ballot's own event.
async fn record_decision(
    State(state): State<AppState>,
    body: Result<Json<DecisionRequest>, JsonRejection>,
) -> Result<Json<QuorumOutcome>, ApiErr> {
    let Json(body) = body?;

    let ballot_id = required(body.ballot_id, "ballotId")?;
    let event_id = required(body.event_id, "eventId")?;
    let group_id = required(body.group_id, "groupId")?;
    let approved = body
        .approved
        .ok_or_else(|| ApiErr::from(AppError::missing_field("approved")))?;

    let ballot = ballots::get_ballot(&state.db, &ballot_id)
        .await?
        .ok_or_else(|| ApiErr::from(AppError::ballot_not_found(&ballot_id)))?;
    if ballot.event_id != event_id {
        return Err(AppError::invalid_input_field(
            format!("ballot {} does not belong to event {}", ballot_id, event_id),
            "eventId",
        )
        .into());
    }

    let event = events::get_event(&state.db, &event_id)
        .await?
        .ok_or_else(|| ApiErr::from(AppError::not_found_with_id("Event", &event_id)))?;
    if event.group_id != group_id {
        return Err(AppError::invalid_input_field(
            format!("event {} belongs to group {}", event_id, event.group_id),
            "groupId",
        )
        .into());
    }

    let outcome = ledger::record_decision(&state.db, &state.settings, &ballot_id, approved).await?;
    Ok(Json(outcome))
}

/// POST /api/maintenance/repair-orphans: fan out ballots for events that have none.
async fn repair_orphans(State(state): State<AppState>) -> Result<Json<RepairResponse>, ApiErr> {
    let repaired = reconciliation::repair_orphaned_events(&state.db, &state.settings).await?;
    Ok(Json(RepairResponse { repaired }))
}
