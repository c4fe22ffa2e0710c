use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::access::SubscriberDirectory;
use super::repository::{PortfolioRepository, UserId};
use super::service::{AdvisorService, AdvisorServiceError, PlanRequest};
use crate::advisor::planning::Scenario;
use crate::advisor::regime::RegimeSource;

/// Router builder exposing the portfolio document, the weekly review, and
/// plan scoring.
pub fn advisor_router<R, S, D>(service: Arc<AdvisorService<R, S, D>>) -> Router
where
    R: PortfolioRepository + 'static,
    S: RegimeSource + 'static,
    D: SubscriberDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/portfolio/:user_id",
            get(get_portfolio_handler::<R, S, D>).put(put_portfolio_handler::<R, S, D>),
        )
        .route(
            "/api/v1/portfolio/:user_id/review",
            get(portfolio_review_handler::<R, S, D>),
        )
        .route("/api/v1/plan/score", post(plan_score_handler::<R, S, D>))
        .with_state(service)
}

/// Planning form payload. Horizon arrives in years, as entered.
#[derive(Debug, Deserialize)]
pub struct PlanScoreRequest {
    pub goal: f64,
    pub horizon_years: f64,
    #[serde(default)]
    pub contribution: Option<f64>,
    #[serde(default)]
    pub scenario: Option<Scenario>,
    #[serde(default)]
    pub edit_count: u32,
}

pub(crate) async fn get_portfolio_handler<R, S, D>(
    State(service): State<Arc<AdvisorService<R, S, D>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: PortfolioRepository + 'static,
    S: RegimeSource + 'static,
    D: SubscriberDirectory + 'static,
{
    match service.load_portfolio(&UserId(user_id)) {
        Ok(Some(document)) => (
            StatusCode::OK,
            axum::Json(json!({
                "data": document.data,
                "updated_at": document.updated_at,
            })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::OK,
            axum::Json(json!({ "data": Value::Null, "updated_at": Value::Null })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn put_portfolio_handler<R, S, D>(
    State(service): State<Arc<AdvisorService<R, S, D>>>,
    Path(user_id): Path<String>,
    axum::Json(body): axum::Json<Value>,
) -> Response
where
    R: PortfolioRepository + 'static,
    S: RegimeSource + 'static,
    D: SubscriberDirectory + 'static,
{
    match service.save_portfolio(&UserId(user_id), body) {
        Ok(document) => (
            StatusCode::OK,
            axum::Json(json!({ "ok": true, "updated_at": document.updated_at })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn portfolio_review_handler<R, S, D>(
    State(service): State<Arc<AdvisorService<R, S, D>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: PortfolioRepository + 'static,
    S: RegimeSource + 'static,
    D: SubscriberDirectory + 'static,
{
    match service.portfolio_review(&UserId(user_id)) {
        Ok(review) => (StatusCode::OK, axum::Json(review)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn plan_score_handler<R, S, D>(
    State(service): State<Arc<AdvisorService<R, S, D>>>,
    axum::Json(payload): axum::Json<PlanScoreRequest>,
) -> Response
where
    R: PortfolioRepository + 'static,
    S: RegimeSource + 'static,
    D: SubscriberDirectory + 'static,
{
    let request = PlanRequest {
        goal: payload.goal,
        horizon_years: payload.horizon_years,
        contribution: payload.contribution,
        scenario: payload.scenario,
        edit_count: payload.edit_count,
    };

    match service.plan_review(request) {
        Ok(review) => (StatusCode::OK, axum::Json(review)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AdvisorServiceError) -> Response {
    let status = match &error {
        AdvisorServiceError::SubscriptionRequired => StatusCode::PAYMENT_REQUIRED,
        AdvisorServiceError::Document(_) => StatusCode::BAD_REQUEST,
        AdvisorServiceError::Regime(_) => StatusCode::BAD_GATEWAY,
        AdvisorServiceError::Repository(_) | AdvisorServiceError::Directory(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
