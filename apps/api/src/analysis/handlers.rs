use axum::{
    extract::{FromRequest, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::analyzer::{
    AnalysisResult, AnalysisSummary, BatchEntry, BatchReport, ResumeInput,
};
use crate::analysis::models::JobRequirements;
use crate::errors::AppError;
use crate::pdf::extract_upload_text;
use crate::state::AppState;

/// `Json` whose rejections (malformed JSON, wrong content type) answer as `AppError`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, Deserialize)]
pub struct TextResume {
    #[serde(default)]
    pub label: Option<String>,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct TextBatchRequest {
    // Missing fields default to empty so the analyzer's validation reports them.
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub resumes: Vec<TextResume>,
}

#[derive(Debug, Deserialize)]
pub struct SingleAnalysisRequest {
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchResultItem {
    Ok {
        label: String,
        result: Box<AnalysisResult>,
    },
    Error {
        label: String,
        error: ErrorBody,
    },
}

impl From<BatchEntry> for BatchResultItem {
    fn from(entry: BatchEntry) -> Self {
        match entry.outcome {
            Ok(result) => BatchResultItem::Ok {
                label: entry.label,
                result: Box::new(result),
            },
            Err(e) => BatchResultItem::Error {
                label: entry.label,
                error: ErrorBody {
                    code: e.code(),
                    message: e.public_message(),
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub job_requirements: JobRequirements,
    pub results: Vec<BatchResultItem>,
    /// Successful analyses only, best first.
    pub ranking: Vec<AnalysisSummary>,
}

impl From<BatchReport> for BatchResponse {
    fn from(report: BatchReport) -> Self {
        let ranking = report.ranked();
        BatchResponse {
            job_requirements: report.job_requirements,
            results: report.entries.into_iter().map(Into::into).collect(),
            ranking,
        }
    }
}

/// POST /api/v1/analyses
/// Multipart: one `job_description` text field, one or more `resumes` files.
pub async fn handle_analyze_uploads(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchResponse>, AppError> {
    let mut job_description = String::new();
    let mut resumes = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "job_description" => {
                job_description = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Unreadable job_description field: {e}"))
                })?;
            }
            "resumes" => {
                let label = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("resume-{}", resumes.len() + 1));
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable upload '{label}': {e}")))?;

                let file_name = label.clone();
                let text = tokio::task::spawn_blocking(move || {
                    extract_upload_text(&file_name, content_type.as_deref(), &data)
                })
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("Text extraction task failed: {e}")))?;

                resumes.push(ResumeInput { label, text });
            }
            other => debug!("Ignoring multipart field '{other}'"),
        }
    }

    info!("Received {} resume uploads", resumes.len());
    let report = state
        .analyzer
        .analyze_batch(&resumes, &job_description)
        .await?;
    Ok(Json(report.into()))
}

/// POST /api/v1/analyses/text
pub async fn handle_analyze_texts(
    State(state): State<AppState>,
    AppJson(req): AppJson<TextBatchRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    let resumes: Vec<ResumeInput> = req
        .resumes
        .into_iter()
        .enumerate()
        .map(|(i, r)| ResumeInput {
            label: r.label.unwrap_or_else(|| format!("resume-{}", i + 1)),
            text: r.text,
        })
        .collect();

    let report = state
        .analyzer
        .analyze_batch(&resumes, &req.job_description)
        .await?;
    Ok(Json(report.into()))
}

/// POST /api/v1/analyses/single
pub async fn handle_analyze_single(
    State(state): State<AppState>,
    AppJson(req): AppJson<SingleAnalysisRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let result = state
        .analyzer
        .analyze(&req.resume_text, &req.job_description)
        .await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analysis::analyzer::ResumeAnalyzer;
    use crate::analysis::fixtures::{fixture_model, JD_TEXT, RESUME_TEXT};
    use crate::analysis::prompts::{JD_EXTRACT, RESUME_EXTRACT, SKILLS_SCORE};
    use crate::llm_client::stub::StubModel;
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "X-RESUME-MATCH-BOUNDARY";

    fn app(model: Arc<StubModel>) -> Router {
        build_router(AppState::new(ResumeAnalyzer::new(model), 64 * 1024))
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(parts: &[(&str, Option<(&str, &str)>, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, file, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file {
                Some((file_name, content_type)) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/analyses")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let model = Arc::new(fixture_model());
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app(model), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-match-api");
    }

    #[tokio::test]
    async fn test_single_analysis() {
        let model = Arc::new(fixture_model());
        let request = json_request(
            "/api/v1/analyses/single",
            json!({"job_description": JD_TEXT, "resume_text": RESUME_TEXT}),
        );

        let (status, body) = send(app(model.clone()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Jane Doe");
        assert_eq!(body["total_score"], 77.0);
        assert_eq!(body["component_scores"]["skills"]["score"], 32.0);
        assert_eq!(model.total_calls(), 7);
    }

    #[tokio::test]
    async fn test_blank_job_description_is_rejected_without_calls() {
        let model = Arc::new(fixture_model());
        let request = json_request(
            "/api/v1/analyses/single",
            json!({"job_description": "  ", "resume_text": RESUME_TEXT}),
        );

        let (status, body) = send(app(model.clone()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(model.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_job_description_field_is_validation_error() {
        let model = Arc::new(fixture_model());
        let request = json_request("/api/v1/analyses/single", json!({"resume_text": "Jane"}));

        let (status, body) = send(app(model.clone()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(model.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_resumes_field_is_validation_error() {
        let model = Arc::new(fixture_model());
        let request = json_request("/api/v1/analyses/text", json!({"job_description": JD_TEXT}));

        let (status, body) = send(app(model.clone()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(model.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let model = Arc::new(fixture_model());
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analyses/single")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"job_description": "#))
            .unwrap();

        let (status, body) = send(app(model.clone()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(model.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_text_batch_reports_results_and_ranking() {
        let model = Arc::new(fixture_model());
        let request = json_request(
            "/api/v1/analyses/text",
            json!({
                "job_description": JD_TEXT,
                "resumes": [
                    {"label": "jane.txt", "text": RESUME_TEXT},
                    {"text": "John Roe, junior developer"}
                ]
            }),
        );

        let (status, body) = send(app(model.clone()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job_requirements"]["required_skills"], json!(["Rust", "SQL", "AWS"]));

        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["label"], "jane.txt");
        assert_eq!(results[0]["status"], "ok");
        assert_eq!(results[1]["label"], "resume-2");
        assert_eq!(results[1]["result"]["total_score"], 77.0);

        assert_eq!(body["ranking"].as_array().unwrap().len(), 2);
        assert_eq!(model.call_count(JD_EXTRACT.id), 1);
        assert_eq!(model.total_calls(), 1 + 6 * 2);
    }

    #[tokio::test]
    async fn test_text_batch_without_resumes_is_rejected() {
        let model = Arc::new(fixture_model());
        let request = json_request(
            "/api/v1/analyses/text",
            json!({"job_description": JD_TEXT, "resumes": []}),
        );

        let (status, body) = send(app(model.clone()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(model.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_resume_is_reported_inline() {
        let model = Arc::new(fixture_model().unavailable_on(SKILLS_SCORE.id, 1));
        let request = json_request(
            "/api/v1/analyses/text",
            json!({
                "job_description": JD_TEXT,
                "resumes": [{"text": RESUME_TEXT}, {"text": RESUME_TEXT}]
            }),
        );

        let (status, body) = send(app(model), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"][0]["status"], "error");
        assert_eq!(body["results"][0]["error"]["code"], "LLM_ERROR");
        assert_eq!(body["results"][1]["status"], "ok");
        assert_eq!(body["ranking"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_job_extraction_failure_is_bad_gateway() {
        let model = Arc::new(fixture_model().failing_on(JD_EXTRACT.id, 1));
        let request = json_request(
            "/api/v1/analyses/text",
            json!({"job_description": JD_TEXT, "resumes": [{"text": RESUME_TEXT}]}),
        );

        let (status, body) = send(app(model), request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "MODEL_OUTPUT_ERROR");
    }

    #[tokio::test]
    async fn test_multipart_upload() {
        let model = Arc::new(fixture_model());
        let request = multipart_request(&[
            ("job_description", None, JD_TEXT.as_bytes()),
            ("resumes", Some(("jane.txt", "text/plain")), RESUME_TEXT.as_bytes()),
            ("resumes", Some(("scan.pdf", "application/pdf")), &b"not really a pdf"[..]),
            ("comment", None, &b"ignored"[..]),
        ]);

        let (status, body) = send(app(model.clone()), request).await;
        assert_eq!(status, StatusCode::OK);

        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["label"], "jane.txt");
        assert_eq!(results[1]["label"], "scan.pdf");
        assert_eq!(results[1]["status"], "ok");

        // the unreadable PDF is still analyzed, with empty text
        let resume_calls: Vec<_> = model
            .calls()
            .into_iter()
            .filter(|c| c.template_id == RESUME_EXTRACT.id)
            .collect();
        assert_eq!(resume_calls.len(), 2);
        assert!(resume_calls[0].user.contains("Senior Backend Engineer at Acme"));
        assert!(resume_calls[1].user.trim_end().ends_with("Candidate Resume:"));
    }

    #[tokio::test]
    async fn test_multipart_without_job_description_is_rejected() {
        let model = Arc::new(fixture_model());
        let request = multipart_request(&[(
            "resumes",
            Some(("jane.txt", "text/plain")),
            RESUME_TEXT.as_bytes(),
        )]);

        let (status, body) = send(app(model.clone()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(model.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let model = Arc::new(fixture_model());
        let payload = json!({"job_description": "x".repeat(70 * 1024), "resume_text": ""}).to_string();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analyses/single")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, payload.len())
            .body(Body::from(payload))
            .unwrap();

        let response = app(model.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(model.total_calls(), 0);
    }
}
