pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Comparison API
        .route("/api/v1/compare", post(handlers::handle_compare_upload))
        .route("/api/v1/compare/text", post(handlers::handle_compare_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::test_config;
    use crate::embedding::HashEmbedder;
    use crate::extraction::pdf::test_pdf;
    use crate::matching::comparator::Comparator;
    use crate::matching::handlers::EXTRACTION_FAILED;
    use crate::matching::weights::WeightConfig;

    const BOUNDARY: &str = "----resume-compare-test-boundary";

    fn app_with(vars: &[(&str, &str)]) -> Router {
        let mut all = vec![("EMBEDDING_BACKEND", "hash")];
        all.extend_from_slice(vars);
        let config = test_config(&all);
        let comparator = Comparator::new(
            Arc::new(HashEmbedder::new(config.embedding_dimension)),
            WeightConfig::default(),
        );
        build_router(AppState {
            config,
            comparator: Arc::new(comparator),
        })
    }

    fn app() -> Router {
        app_with(&[])
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// (field name, is_file, content)
    fn multipart_request(parts: &[(&str, bool, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, is_file, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            if *is_file {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{name}.pdf\"\r\n\
                         Content-Type: application/pdf\r\n\r\n"
                    )
                    .as_bytes(),
                );
            } else {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/compare")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-compare-api");
    }

    #[tokio::test]
    async fn test_compare_text_returns_result() {
        let request = json_request(
            "/api/v1/compare/text",
            json!({
                "job_description": "Looking for a software engineer with Python experience",
                "resume_a": "Experience\nPython software engineer\nSkills\nPython\n",
                "resume_b": "Experience\nPastry chef\n",
            }),
        );

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["winner"], "Resume A");
        assert!(body["score_a"].as_f64().unwrap() > body["score_b"].as_f64().unwrap());
        assert_eq!(body["analysis"]["Resume B"]["skills"], "0.0000");
        assert!(body["explanation"][0]
            .as_str()
            .unwrap()
            .starts_with("- Resume A has a higher overall score"));
    }

    #[tokio::test]
    async fn test_compare_text_rejects_blank_resume() {
        let request = json_request(
            "/api/v1/compare/text",
            json!({
                "job_description": "Rust engineer",
                "resume_a": "Skills\nRust\n",
                "resume_b": "   ",
            }),
        );

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_compare_text_rejects_blank_job_description() {
        let request = json_request(
            "/api/v1/compare/text",
            json!({
                "job_description": "",
                "resume_a": "Skills\nRust\n",
                "resume_b": "Skills\nGo\n",
            }),
        );

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_body_limit_is_enforced() {
        let request = json_request(
            "/api/v1/compare/text",
            json!({
                "job_description": "Rust engineer ".repeat(20),
                "resume_a": "Skills\nRust\n",
                "resume_b": "Skills\nGo\n",
            }),
        );

        let response = app_with(&[("MAX_UPLOAD_BYTES", "64")])
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_upload_compares_text_pdfs() {
        let resume_a = test_pdf(&["Experience", "Python software engineer", "Skills", "Python"]);
        let resume_b = test_pdf(&["Experience", "Pastry chef"]);
        let request = multipart_request(&[
            ("resume_a", true, resume_a.as_slice()),
            ("resume_b", true, resume_b.as_slice()),
            (
                "job_description",
                false,
                b"Looking for a software engineer with Python experience".as_slice(),
            ),
        ]);

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert!(body["winner"].is_string());
        assert!(body["score_a"].as_f64().unwrap() > 0.0);
        for candidate in ["Resume A", "Resume B"] {
            let analysis = body["analysis"][candidate].as_object().unwrap();
            assert_eq!(analysis.len(), 3, "{candidate}: {analysis:?}");
        }
        assert_eq!(body["analysis"]["Resume B"]["skills"], "0.0000");
        assert!(!body["explanation"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_with_unreadable_pdfs_is_unprocessable() {
        let request = multipart_request(&[
            ("resume_a", true, b"not a pdf".as_slice()),
            ("resume_b", true, b"also not a pdf".as_slice()),
            ("job_description", false, b"Rust engineer".as_slice()),
        ]);

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["message"], EXTRACTION_FAILED);
    }

    #[tokio::test]
    async fn test_upload_missing_resume_is_bad_request() {
        let request = multipart_request(&[
            ("resume_a", true, b"not a pdf".as_slice()),
            ("job_description", false, b"Rust engineer".as_slice()),
        ]);

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["message"], "resume_b is required");
    }

    #[tokio::test]
    async fn test_upload_blank_job_description_is_bad_request() {
        let request = multipart_request(&[
            ("resume_a", true, b"not a pdf".as_slice()),
            ("resume_b", true, b"not a pdf".as_slice()),
            ("job_description", false, b"  ".as_slice()),
        ]);

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
