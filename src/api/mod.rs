//! Overdose Dashboard REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Dataset
//! - `GET /api/v1/drugs` - Series names, colours and months
//! - `GET /api/v1/rows?drugs=a,b` - Filtered rows
//! - `GET /api/v1/summary?drugs=a,b` - Summary figures
//!
//! ## Chart
//! - `GET /api/v1/chart?drugs=a,b` - Chart geometry (JSON)
//! - `GET /api/v1/chart.svg?drugs=a,b` - Rendered SVG
//!
//! ## Auth
//! - `POST /api/v1/auth/signup` - Create an account
//! - `POST /api/v1/auth/signin` - Sign in
//! - `POST /api/v1/auth/signout` - Sign out
//! - `GET /api/v1/auth/session` - Session snapshot
//! - `GET /api/v1/auth/events` - Session changes (SSE)
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Full health status
//!
//! Anything else falls through to the built UI when `ui.dist_dir` is set.
//!
//! # Example
//!
//! ```rust,no_run
//! use overdose_dashboard::api::{serve, AppState};
//! use overdose_dashboard::auth::MemoryProvider;
//! use overdose_dashboard::config::Config;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(Config::default(), Arc::new(MemoryProvider::new()));
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, SessionRegistry};

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Dataset routes
        .route("/drugs", get(routes::dataset::list_drugs))
        .route("/rows", get(routes::dataset::list_rows))
        .route("/summary", get(routes::dataset::get_summary))
        // Chart routes
        .route("/chart", get(routes::chart::chart_geometry))
        .route("/chart.svg", get(routes::chart::chart_svg))
        // Auth routes
        .route("/auth/signup", post(routes::auth::sign_up))
        .route("/auth/signin", post(routes::auth::sign_in))
        .route("/auth/signout", post(routes::auth::sign_out))
        .route("/auth/session", get(routes::auth::session))
        .route("/auth/events", get(routes::auth::session_events));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.api.cors_origins);
    let dist_dir = state.config.ui.dist_dir.clone();

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes);

    if let Some(dir) = dist_dir {
        tracing::info!(dist_dir = %dir, "Serving UI bundle");
        let index = Path::new(&dir).join("index.html");
        router = router.fallback_service(ServeDir::new(&dir).fallback(ServeFile::new(index)));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// CORS for the configured UI origins; cookies travel with credentialed requests
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.api.addr();
    let provider = state.sessions.provider_name().to_string();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(auth_provider = %provider, "Overdose dashboard listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Overdose dashboard shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::{DrugsResponse, HealthResponse, RowsResponse, SummaryResponse};
    use crate::api::error::ErrorResponse;
    use crate::auth::{MemoryProvider, SessionState};
    use crate::chart::ChartGeometry;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, Response, StatusCode},
    };
    use futures_util::StreamExt;
    use serde::de::DeserializeOwned;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_app_with(Config::default())
    }

    fn create_app_with(config: Config) -> Router {
        build_router(AppState::new(config, Arc::new(MemoryProvider::new())))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header("Cookie", cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json<T: DeserializeOwned>(response: Response<Body>) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `name=value` part of the Set-Cookie header
    fn session_cookie(response: &Response<Body>) -> String {
        let header = response
            .headers()
            .get("set-cookie")
            .expect("session cookie")
            .to_str()
            .unwrap();
        assert!(header.contains("HttpOnly"));
        header.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_live() {
        let response = create_test_app().oneshot(get("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let response = create_test_app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let health: HealthResponse = json(response).await;
        assert_eq!(health.status, "healthy");
        assert_eq!(health.auth_provider, "memory");
        assert_eq!(health.rows, 60);
    }

    #[tokio::test]
    async fn test_list_drugs() {
        let response = create_test_app().oneshot(get("/api/v1/drugs")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let drugs: DrugsResponse = json(response).await;
        assert_eq!(drugs.drugs.len(), 5);
        assert_eq!(drugs.drugs[0].drug, "Fentanyl");
        assert_eq!(drugs.months.len(), 12);
        assert!(drugs.dataset_url.starts_with("https://data.cdc.gov/"));
    }

    #[tokio::test]
    async fn test_rows_selection() {
        let app = create_test_app();

        let all: RowsResponse = json(app.clone().oneshot(get("/api/v1/rows")).await.unwrap()).await;
        assert_eq!(all.count, 60);

        let heroin: RowsResponse =
            json(app.clone().oneshot(get("/api/v1/rows?drugs=Heroin")).await.unwrap()).await;
        assert_eq!(heroin.count, 12);
        assert!(heroin.rows.iter().all(|r| r.drug == "Heroin"));

        let none: RowsResponse =
            json(app.oneshot(get("/api/v1/rows?drugs=")).await.unwrap()).await;
        assert_eq!(none.count, 0);
        assert!(none.drugs.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_drug_is_rejected() {
        let response = create_test_app()
            .oneshot(get("/api/v1/rows?drugs=Fentanyl,Kratom"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = json(response).await;
        assert_eq!(body.error.code, "UNKNOWN_DRUG");
        assert_eq!(body.error.message, "Unknown drug: Kratom");
        assert!(!body.request_id.is_empty());
    }

    #[tokio::test]
    async fn test_summary() {
        let app = create_test_app();

        let all: SummaryResponse =
            json(app.clone().oneshot(get("/api/v1/summary")).await.unwrap()).await;
        assert_eq!(all.summary.grand_total, 160_899);
        assert_eq!(all.summary.average_per_month, 13_408);
        assert_eq!(all.summary.latest_month_total, 13_692);
        assert_eq!(all.drugs.len(), 5);

        let empty: SummaryResponse =
            json(app.oneshot(get("/api/v1/summary?drugs=")).await.unwrap()).await;
        assert_eq!(empty.summary.grand_total, 0);
        assert_eq!(empty.summary.latest_month_total, 0);
    }

    #[tokio::test]
    async fn test_chart_geometry() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(get("/api/v1/chart?drugs=Cocaine,Heroin"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let geometry: ChartGeometry = json(response).await;
        assert_eq!(geometry.polylines.len(), 2);
        assert_eq!(geometry.hit_targets.len(), 24);
        assert_eq!(geometry.gridlines.len(), 5);
        assert_eq!(geometry.max, 2389.0);

        let empty = app.oneshot(get("/api/v1/chart?drugs=")).await.unwrap();
        assert_eq!(empty.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_chart_svg() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(get("/api/v1/chart.svg?hover=Fentanyl@2023-08"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("image/svg+xml"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let document = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(document.matches("<polyline").count(), 5);
        assert!(document.contains("class=\"tooltip\""));
        assert!(document.contains("6,901"));

        let response = app
            .clone()
            .oneshot(get("/api/v1/chart.svg?drugs="))
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let document = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(document.contains(crate::chart::svg::EMPTY_SELECTION_MESSAGE));
        assert!(!document.contains("<polyline"));

        let response = app
            .oneshot(get("/api/v1/chart.svg?drugs=Heroin&hover=Fentanyl@2023-08"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_auth_flow() {
        let app = create_test_app();
        let creds = r#"{"email": "voter@example.org", "password": "correct-horse"}"#;

        // Sign up issues a session cookie
        let response = app
            .clone()
            .oneshot(post_json("/api/v1/auth/signup", creds, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);
        let session: SessionState = json(response).await;
        assert!(!session.loading);
        assert_eq!(session.user.unwrap().email, "voter@example.org");

        // The cookie carries the session
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/auth/session")
                    .header("Cookie", &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let session: SessionState = json(response).await;
        assert!(session.is_signed_in());

        // Sign out clears it
        let response = app
            .clone()
            .oneshot(post_json("/api/v1/auth/signout", "", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let session: SessionState = json(response).await;
        assert!(!session.is_signed_in());

        // And sign in restores it
        let response = app
            .oneshot(post_json("/api/v1/auth/signin", creds, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let session: SessionState = json(response).await;
        assert!(session.is_signed_in());
    }

    #[tokio::test]
    async fn test_auth_rejections_are_verbatim() {
        let app = create_test_app();
        let creds = r#"{"email": "voter@example.org", "password": "correct-horse"}"#;

        app.clone()
            .oneshot(post_json("/api/v1/auth/signup", creds, None))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/auth/signup", creds, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = json(response).await;
        assert_eq!(body.error.code, "AUTH_REJECTED");
        assert_eq!(body.error.message, "EMAIL_EXISTS");

        let response = app
            .oneshot(post_json(
                "/api/v1/auth/signin",
                r#"{"email": "voter@example.org", "password": "wrong-password"}"#,
                None,
            ))
            .await
            .unwrap();
        let body: ErrorResponse = json(response).await;
        assert_eq!(body.error.message, "INVALID_LOGIN_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_rejected_sign_ins_register_no_session() {
        let state = AppState::new(Config::default(), Arc::new(MemoryProvider::new()));
        let sessions = Arc::clone(&state.sessions);
        let app = build_router(state);
        let bad = r#"{"email": "nobody@example.org", "password": "wrong-password"}"#;

        for _ in 0..200 {
            let response = app
                .clone()
                .oneshot(post_json("/api/v1/auth/signin", bad, None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert!(response.headers().get("set-cookie").is_none());
        }
        assert_eq!(sessions.len().await, 0);

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/auth/signup", r#"{"email": "", "password": "x"}"#, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_sign_out_forgets_session() {
        let state = AppState::new(Config::default(), Arc::new(MemoryProvider::new()));
        let sessions = Arc::clone(&state.sessions);
        let app = build_router(state);
        let creds = r#"{"email": "voter@example.org", "password": "correct-horse"}"#;

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/auth/signup", creds, None))
            .await
            .unwrap();
        let cookie = session_cookie(&response);
        assert_eq!(sessions.len().await, 1);

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/auth/signout", "", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let removal = response
            .headers()
            .get("set-cookie")
            .expect("expired cookie")
            .to_str()
            .unwrap();
        assert!(removal.starts_with("dashboard_session="));
        assert!(removal.contains("Max-Age=0"));
        assert_eq!(sessions.len().await, 0);

        // Signing in again with the stale cookie opens a new session
        let response = app
            .oneshot(post_json("/api/v1/auth/signin", creds, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_ne!(session_cookie(&response), cookie);
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_session_without_cookie() {
        let response = create_test_app()
            .oneshot(get("/api/v1/auth/session"))
            .await
            .unwrap();
        let session: SessionState = json(response).await;
        assert_eq!(session, SessionState::resolved(None));
    }

    #[tokio::test]
    async fn test_session_events_emit_current_state() {
        let response = create_test_app()
            .oneshot(get("/api/v1/auth/events"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));
        session_cookie(&response);

        let mut body = response.into_body().into_data_stream();
        let frame = body.next().await.unwrap().unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.contains("event: session"));
        assert!(text.contains(r#""loading":false"#));
        assert!(text.contains(r#""user":null"#));
    }

    #[tokio::test]
    async fn test_serves_ui_bundle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>dashboard</h1>").unwrap();

        let mut config = Config::default();
        config.ui.dist_dir = Some(dir.path().to_string_lossy().to_string());
        let app = create_app_with(config);

        let response = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>dashboard</h1>");

        // API routes still win over the bundle
        let response = app.oneshot(get("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
