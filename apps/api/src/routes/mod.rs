pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::cover_letter::handlers as cover_letter;
use crate::documents::handlers as documents;
use crate::matching::handlers as matching;
use crate::state::AppState;
use crate::storage::handlers as storage;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching engine
        .route("/api/v1/analysis", post(matching::handle_analyze))
        .route("/api/v1/analysis/match", post(matching::handle_match))
        .route("/api/v1/analysis/skill-gap", post(matching::handle_skill_gap))
        .route("/api/v1/analysis/annotate", post(matching::handle_annotate))
        .route("/api/v1/analysis/optimize", post(matching::handle_optimize))
        // Cover letter
        .route("/api/v1/cover-letter", post(cover_letter::handle_cover_letter))
        // Saved resume + documents
        .route(
            "/api/v1/resume",
            get(storage::handle_get_resume).put(storage::handle_save_resume),
        )
        .route(
            "/api/v1/resume/upload",
            post(documents::handle_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/export", post(documents::handle_export))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::cover_letter::fetcher::CompanyProfile;
    use crate::errors::FETCH_FAILED_MESSAGE;

    fn ok_state() -> AppState {
        AppState::for_tests(Ok(CompanyProfile {
            url: String::new(),
            content_type: Some("text/html".to_string()),
            body: "<title>Acme</title>".to_string(),
        }))
    }

    async fn call(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> Response {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        build_router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = call(&ok_state(), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_match_endpoint_scores_keywords() {
        let response = call(
            &ok_state(),
            Method::POST,
            "/api/v1/analysis/match",
            Some(json!({
                "resume_text": "I have experience with python and sql",
                "jd_text": "Senior Python Developer requiring SQL and leadership"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["score_percent"], 20.0);
        assert_eq!(body["matched_keywords"], json!(["python"]));
        assert_eq!(
            body["missing_keywords"],
            json!(["senior", "developer", "requiring", "leadership"])
        );
    }

    #[tokio::test]
    async fn test_blank_documents_are_rejected() {
        for uri in [
            "/api/v1/analysis",
            "/api/v1/analysis/match",
            "/api/v1/analysis/skill-gap",
            "/api/v1/analysis/optimize",
        ] {
            let response = call(
                &ok_state(),
                Method::POST,
                uri,
                Some(json!({"resume_text": "  ", "jd_text": "Rust engineer"})),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body = json_body(response).await;
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_skill_gap_endpoint() {
        let response = call(
            &ok_state(),
            Method::POST,
            "/api/v1/analysis/skill-gap",
            Some(json!({
                "resume_text": "I know react",
                "jd_text": "We need react and sql experience"
            })),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["present_skills"], json!(["react"]));
        assert_eq!(body["missing_skills"], json!(["sql"]));
    }

    #[tokio::test]
    async fn test_annotate_accepts_empty_keywords() {
        let response = call(
            &ok_state(),
            Method::POST,
            "/api/v1/analysis/annotate",
            Some(json!({"text": "a < b"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["plain"], "a < b");
        assert_eq!(body["rendered"], "a &lt; b");
        assert_eq!(body["spans"], json!([]));
    }

    #[tokio::test]
    async fn test_optimize_modes() {
        let state = ok_state();
        let standard = json_body(
            call(
                &state,
                Method::POST,
                "/api/v1/analysis/optimize",
                Some(json!({
                    "resume_text": "Worked on backend systems. Worked as a lead.",
                    "jd_text": "backend"
                })),
            )
            .await,
        )
        .await;
        assert_eq!(standard["plain"], "developed backend systems. Worked as a lead.");

        let lead_in = json_body(
            call(
                &state,
                Method::POST,
                "/api/v1/analysis/optimize",
                Some(json!({
                    "resume_text": "Worked on backend systems. Worked as a lead.",
                    "jd_text": "backend",
                    "mode": "lead_in"
                })),
            )
            .await,
        )
        .await;
        assert_eq!(lead_in["plain"], "Worked on backend systems. Led lead.");
    }

    #[tokio::test]
    async fn test_analysis_returns_session() {
        let response = call(
            &ok_state(),
            Method::POST,
            "/api/v1/analysis",
            Some(json!({
                "resume_text": "Worked on Python services",
                "jd_text": "Python engineer"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["id"].is_string());
        assert_eq!(body["mode"], "standard");
        assert_eq!(body["skill_gap"]["present_skills"], json!(["python"]));
        assert_eq!(body["optimized_resume"]["plain"], "developed Python services");
    }

    #[tokio::test]
    async fn test_cover_letter_success() {
        let response = call(
            &ok_state(),
            Method::POST,
            "/api/v1/cover-letter",
            Some(json!({
                "resume_text": "Jane Doe",
                "jd_text": "Engineer",
                "company_url": "https://acme.com"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["cover_letter"]
            .as_str()
            .unwrap()
            .starts_with("Dear Hiring Manager,"));
        assert_eq!(body["extraction_strategy"], "placeholder");
    }

    #[tokio::test]
    async fn test_cover_letter_fetch_failure_is_generic() {
        let state = AppState::for_tests(Err(500));
        let response = call(
            &state,
            Method::POST,
            "/api/v1/cover-letter",
            Some(json!({
                "resume_text": "Jane Doe",
                "jd_text": "Engineer",
                "company_url": "https://acme.com"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["message"], FETCH_FAILED_MESSAGE);

        // Analysis keeps working regardless of the failed fetch.
        let analysis = call(
            &state,
            Method::POST,
            "/api/v1/analysis/match",
            Some(json!({"resume_text": "rust", "jd_text": "rust"})),
        )
        .await;
        assert_eq!(analysis.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_saved_resume_round_trip() {
        let state = ok_state();
        let missing = call(&state, Method::GET, "/api/v1/resume", None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let blank = call(
            &state,
            Method::PUT,
            "/api/v1/resume",
            Some(json!({"resume_text": " "})),
        )
        .await;
        assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

        let saved = call(
            &state,
            Method::PUT,
            "/api/v1/resume",
            Some(json!({"resume_text": "Jane Doe\nRust"})),
        )
        .await;
        assert_eq!(saved.status(), StatusCode::NO_CONTENT);

        let fetched = call(&state, Method::GET, "/api/v1/resume", None).await;
        assert_eq!(fetched.status(), StatusCode::OK);
        assert_eq!(json_body(fetched).await["resume_text"], "Jane Doe\nRust");
    }

    #[tokio::test]
    async fn test_export_txt_and_unsupported_formats() {
        let state = ok_state();
        let response = call(
            &state,
            Method::POST,
            "/api/v1/export",
            Some(json!({"text": "Jane Doe", "format": "txt"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.txt\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Jane Doe");

        let pdf = call(
            &state,
            Method::POST,
            "/api/v1/export",
            Some(json!({"text": "Jane Doe", "format": "pdf"})),
        )
        .await;
        assert_eq!(pdf.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_upload_plain_text_resume() {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"resume.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             Jane Doe\nWorked on Rust services\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/resume/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = build_router(ok_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["resume_text"], "Jane Doe\nWorked on Rust services");
        assert_eq!(body["file_name"], "resume.txt");
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_format() {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"resume.docx\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             PK\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/resume/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = build_router(ok_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
