use std::sync::Arc;

use crate::analysis::analyzer::ResumeAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<ResumeAnalyzer>,
    /// Upper bound on a request body, uploads included.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(analyzer: ResumeAnalyzer, max_upload_bytes: usize) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            max_upload_bytes,
        }
    }
}
