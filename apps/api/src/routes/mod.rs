pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::ats::handlers::handle_ats_score;
use crate::compile::handlers::handle_compile;
use crate::optimize::handlers::handle_optimize;
use crate::rate_limit::limit_requests;
use crate::state::AppState;

/// Whole-request cap; field-level limits are enforced by the handlers.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    // Compile and optimize shell out or call the LLM, so they get a second, tighter budget.
    let heavy = Router::new()
        .route("/api/compile", post(handle_compile))
        .route("/api/optimize", post(handle_optimize))
        .route_layer(middleware::from_fn_with_state(
            state.heavy_limiter.clone(),
            limit_requests,
        ));

    let api = Router::new()
        .route("/api/ats-score", post(handle_ats_score))
        .merge(heavy)
        .route_layer(middleware::from_fn_with_state(
            state.api_limiter.clone(),
            limit_requests,
        ));

    Router::new()
        .route("/api/health", get(health::health_handler))
        .merge(api)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}

/// CORS restricted to the configured frontend origin, or permissive when none is set.
pub fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = frontend_url.and_then(|url| match url.trim_end_matches('/').parse::<HeaderValue>() {
        Ok(origin) => Some(origin),
        Err(_) => {
            warn!("FRONTEND_URL '{url}' is not a valid origin");
            None
        }
    });

    match origin {
        Some(origin) => {
            info!("CORS restricted to {origin:?}");
            CorsLayer::new()
                .allow_origin(AllowOrigin::exact(origin))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => {
            warn!("CORS allows all origins. Set FRONTEND_URL to restrict it.");
            CorsLayer::permissive()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use httpmock::prelude::*;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::compile::{CompileError, LatexCompiler};
    use crate::config::Config;

    /// Compiler stub: returns a fixed PDF, or fails when the source contains `\fail`.
    struct StubCompiler;

    #[async_trait]
    impl LatexCompiler for StubCompiler {
        async fn compile(&self, source: &str) -> Result<Vec<u8>, CompileError> {
            if source.contains("\\fail") {
                return Err(CompileError::Failed {
                    log: "! Undefined control sequence.\nl.1 \\fail".to_string(),
                });
            }
            Ok(b"%PDF-1.4 stub".to_vec())
        }
    }

    fn test_state(config: &Config) -> AppState {
        AppState::new(config)
            .unwrap()
            .with_compiler(Arc::new(StubCompiler))
    }

    fn app() -> Router {
        build_router(test_state(&Config::for_tests()))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert!(body["message"].is_string());
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_ats_score_golden_scenario() {
        let response = app()
            .oneshot(post_json(
                "/api/ats-score",
                json!({
                    "resumeText": "Experienced Python developer with AWS and Docker skills",
                    "jobDescription": "Looking for a Python developer familiar with AWS, Docker, and Kubernetes"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["score"], 75);
        assert_eq!(body["keywords"], json!(["python", "aws", "docker"]));
        assert_eq!(body["missingKeywords"], json!(["kubernetes"]));
    }

    #[tokio::test]
    async fn test_ats_score_missing_field_is_400() {
        let response = app()
            .oneshot(post_json("/api/ats-score", json!({"resumeText": "Rust"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "jobDescription is required");
    }

    #[tokio::test]
    async fn test_ats_score_blank_field_is_400() {
        let response = app()
            .oneshot(post_json(
                "/api/ats-score",
                json!({"resumeText": "   ", "jobDescription": "Rust"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "resumeText must not be empty");
    }

    #[tokio::test]
    async fn test_ats_score_wrong_type_is_400() {
        let response = app()
            .oneshot(post_json(
                "/api/ats-score",
                json!({"resumeText": 42, "jobDescription": "Rust"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/ats-score")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_oversized_field_is_400() {
        let response = app()
            .oneshot(post_json(
                "/api/ats-score",
                json!({
                    "resumeText": "a".repeat(crate::validation::MAX_TEXT_CHARS + 1),
                    "jobDescription": "Rust"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let response = app()
            .oneshot(post_json(
                "/api/compile",
                json!({"code": "x".repeat(MAX_REQUEST_BODY_BYTES + 1)}),
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_compile_returns_pdf() {
        let response = app()
            .oneshot(post_json(
                "/api/compile",
                json!({"code": "\\documentclass{article}\\begin{document}Hi\\end{document}"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_compile_failure_returns_diagnostics() {
        let response = app()
            .oneshot(post_json("/api/compile", json!({"code": "\\fail"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "LaTeX compilation failed");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Undefined control sequence"));
    }

    #[tokio::test]
    async fn test_compile_missing_code_is_400() {
        let response = app()
            .oneshot(post_json("/api/compile", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "code is required");
    }

    #[tokio::test]
    async fn test_optimize_blank_input_is_400() {
        let response = app()
            .oneshot(post_json(
                "/api/optimize",
                json!({"jobDescription": "", "resumeLatex": "\\documentclass{article}"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "jobDescription must not be empty"
        );
    }

    #[tokio::test]
    async fn test_optimize_returns_latex() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/messages");
                then.status(200).json_body(json!({
                    "content": [{"type": "text", "text": "\\begin{document}Rust, Tokio\\end{document}"}],
                    "usage": {"input_tokens": 50, "output_tokens": 20}
                }));
            })
            .await;

        let mut config = Config::for_tests();
        config.anthropic_base_url = server.base_url();

        let response = build_router(test_state(&config))
            .oneshot(post_json(
                "/api/optimize",
                json!({
                    "jobDescription": "Rust and Tokio",
                    "resumeLatex": "\\begin{document}Rust\\end{document}"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(
            body["optimizedLatex"],
            "\\begin{document}Rust, Tokio\\end{document}"
        );
    }

    #[tokio::test]
    async fn test_optimize_provider_failure_is_500() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/messages");
                then.status(400)
                    .json_body(json!({"error": {"message": "prompt is too long"}}));
            })
            .await;

        let mut config = Config::for_tests();
        config.anthropic_base_url = server.base_url();

        let response = build_router(test_state(&config))
            .oneshot(post_json(
                "/api/optimize",
                json!({"jobDescription": "Rust", "resumeLatex": "\\item Rust"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "LLM_ERROR");
        assert!(!body.to_string().contains("too long"));
    }

    #[tokio::test]
    async fn test_heavy_routes_are_rate_limited() {
        let mut config = Config::for_tests();
        config.heavy_rate_limit_max_requests = 2;
        let app = build_router(test_state(&config));

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post_json("/api/compile", json!({"code": "\\relax"})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .clone()
            .oneshot(post_json("/api/optimize", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
        assert_eq!(body_json(response).await["success"], false);

        // Scoring only draws on the general budget.
        let response = app
            .oneshot(post_json(
                "/api/ats-score",
                json!({"resumeText": "Rust", "jobDescription": "Rust"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_is_not_rate_limited() {
        let mut config = Config::for_tests();
        config.rate_limit_max_requests = 1;
        let app = build_router(test_state(&config));

        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/api/health")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let first = app
            .clone()
            .oneshot(post_json(
                "/api/ats-score",
                json!({"resumeText": "Rust", "jobDescription": "Rust"}),
            ))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(post_json(
                "/api/ats-score",
                json!({"resumeText": "Rust", "jobDescription": "Rust"}),
            ))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_cors_layer_accepts_invalid_origin_without_panicking() {
        let _ = cors_layer(Some("https://example.com/"));
        let _ = cors_layer(Some("bad\norigin"));
        let _ = cors_layer(None);
    }
}
