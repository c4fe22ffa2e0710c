use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use signal_core::advisor::portfolio::{
    advisor_router, AdvisorService, CheckoutError, CheckoutGateway, PortfolioRepository,
    SubscriberDirectory, UserId,
};
use signal_core::advisor::regime::{RegimeSnapshot, RegimeSource};
use signal_core::error::AppError;

/// Shared state for the membership routes that sit next to the advisor
/// router: the same service plus the payment seam.
pub(crate) struct MemberState<R, S, D, C> {
    pub(crate) service: Arc<AdvisorService<R, S, D>>,
    pub(crate) checkout: Arc<C>,
}

impl<R, S, D, C> Clone for MemberState<R, S, D, C> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            checkout: self.checkout.clone(),
        }
    }
}

pub(crate) fn with_advisor_routes<R, S, D, C>(
    service: Arc<AdvisorService<R, S, D>>,
    checkout: Arc<C>,
) -> axum::Router
where
    R: PortfolioRepository + 'static,
    S: RegimeSource + 'static,
    D: SubscriberDirectory + 'static,
    C: CheckoutGateway + 'static,
{
    let member_state = MemberState {
        service: service.clone(),
        checkout,
    };

    advisor_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .merge(
            axum::Router::new()
                .route("/api/v1/regime", get(regime_endpoint::<R, S, D, C>))
                .route(
                    "/api/v1/users/:user_id/entitlement",
                    get(entitlement_endpoint::<R, S, D, C>),
                )
                .route("/api/v1/checkout", post(checkout_endpoint::<R, S, D, C>))
                .with_state(member_state),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn regime_endpoint<R, S, D, C>(
    State(state): State<MemberState<R, S, D, C>>,
) -> Result<Json<RegimeSnapshot>, AppError>
where
    R: PortfolioRepository + 'static,
    S: RegimeSource + 'static,
    D: SubscriberDirectory + 'static,
    C: CheckoutGateway + 'static,
{
    Ok(Json(state.service.regime()?))
}

pub(crate) async fn entitlement_endpoint<R, S, D, C>(
    State(state): State<MemberState<R, S, D, C>>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError>
where
    R: PortfolioRepository + 'static,
    S: RegimeSource + 'static,
    D: SubscriberDirectory + 'static,
    C: CheckoutGateway + 'static,
{
    let subscriber = state.service.entitlement(&UserId(user_id.clone()))?;
    Ok(Json(json!({ "user_id": user_id, "subscriber": subscriber })))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckoutRequest {
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
}

pub(crate) async fn checkout_endpoint<R, S, D, C>(
    State(state): State<MemberState<R, S, D, C>>,
    Json(payload): Json<CheckoutRequest>,
) -> Response
where
    R: PortfolioRepository + 'static,
    S: RegimeSource + 'static,
    D: SubscriberDirectory + 'static,
    C: CheckoutGateway + 'static,
{
    let Some(user_id) = payload.user_id.filter(|value| !value.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing user_id" })),
        )
            .into_response();
    };
    let Some(email) = payload.email.filter(|value| !value.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing email" })),
        )
            .into_response();
    };

    match state.checkout.create_session(&UserId(user_id), &email) {
        Ok(session) => (StatusCode::OK, Json(json!({ "url": session.url }))).into_response(),
        Err(error @ CheckoutError::Rejected(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(error @ CheckoutError::Unavailable(_)) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryPortfolioRepository, StaticSubscriberDirectory, StubCheckoutGateway};
    use axum::body::Body;
    use axum::http::Request;
    use signal_core::advisor::regime::StaticRegimeSource;
    use tower::ServiceExt;

    fn test_router(directory: StaticSubscriberDirectory) -> axum::Router {
        let repository = Arc::new(InMemoryPortfolioRepository::default());
        let regimes = Arc::new(StaticRegimeSource::weekly());
        let service = Arc::new(AdvisorService::new(repository, regimes, Arc::new(directory)));
        with_advisor_routes(service, Arc::new(StubCheckoutGateway))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let app = test_router(StaticSubscriberDirectory::default());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn regime_endpoint_serves_the_weekly_snapshot() {
        let app = test_router(StaticSubscriberDirectory::default());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/regime")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["market_regime"], "Transitional");
        assert_eq!(body["confidence"], "Moderate");
        assert_eq!(body["week"], "Week 12");
    }

    #[tokio::test]
    async fn entitlement_reflects_the_directory() {
        let app = test_router(StaticSubscriberDirectory::with_members(["member-1"]));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users/member-1/entitlement")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(body_json(response).await["subscriber"], true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users/someone-else/entitlement")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(body_json(response).await["subscriber"], false);
    }

    #[tokio::test]
    async fn review_requires_an_active_subscription() {
        let app = test_router(StaticSubscriberDirectory::default());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/portfolio/member-1/review")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[tokio::test]
    async fn review_classifies_the_saved_portfolio() {
        let app = test_router(StaticSubscriberDirectory::with_members(["member-1"]));

        let saved = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/portfolio/member-1",
                json!({
                    "holdings": [
                        { "id": "h-1", "name": "Bitcoin", "type": "crypto", "horizon": "short", "size": "small" }
                    ]
                }),
            ))
            .await
            .expect("router responds");
        assert_eq!(saved.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/portfolio/member-1/review")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        // Crypto held short in a Transitional week reads as misaligned.
        assert_eq!(body["holdings"][0]["fit"], "misaligned");
        assert_eq!(body["overall_fit"], "misaligned");
    }

    #[tokio::test]
    async fn plan_score_blends_the_documented_sub_scores() {
        let app = test_router(StaticSubscriberDirectory::default());
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/plan/score",
                json!({ "goal": 5000.0, "horizon_years": 3.0 }),
            ))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["score"], 81);
        assert_eq!(body["label"], "good");
        assert_eq!(body["suggested_contribution"], 139.0);
        assert_eq!(body["effective_contribution"], 139.0);
    }

    #[tokio::test]
    async fn portfolio_round_trips_through_the_store() {
        let app = test_router(StaticSubscriberDirectory::default());

        let saved = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/v1/portfolio/member-1",
                json!({ "holdings": [], "note": "starter" }),
            ))
            .await
            .expect("router responds");
        assert_eq!(saved.status(), StatusCode::OK);
        assert_eq!(body_json(saved).await["ok"], true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/portfolio/member-1")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["note"], "starter");
    }

    #[tokio::test]
    async fn checkout_rejects_missing_fields() {
        let app = test_router(StaticSubscriberDirectory::default());

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/checkout", json!({})))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Missing user_id");

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/checkout",
                json!({ "user_id": "member-1" }),
            ))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Missing email");
    }

    #[tokio::test]
    async fn checkout_returns_a_redirect_url() {
        let app = test_router(StaticSubscriberDirectory::default());
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/checkout",
                json!({ "user_id": "member-1", "email": "member@example.com" }),
            ))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let url = body["url"].as_str().expect("url is a string");
        assert!(url.contains("member-1"));
    }
}
