//! Deterministic `StructuredModel` for tests: canned values per template id,
//! scripted failures, and a log of every attempted call.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{LlmError, ModelRequest, StructuredModel};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub template_id: &'static str,
    pub user: String,
    pub schema: String,
}

#[derive(Debug, Clone, Copy)]
enum FailureKind {
    Schema,
    Unavailable,
}

#[derive(Default)]
pub struct StubModel {
    responses: HashMap<&'static str, Value>,
    failures: Mutex<HashMap<&'static str, (FailureKind, usize)>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, template_id: &'static str, value: Value) -> Self {
        self.responses.insert(template_id, value);
        self
    }

    /// The next `times` calls for `template_id` fail with a schema-conformance error.
    pub fn failing_on(self, template_id: &'static str, times: usize) -> Self {
        self.script_failure(template_id, FailureKind::Schema, times)
    }

    /// The next `times` calls for `template_id` fail as an exhausted 503.
    pub fn unavailable_on(self, template_id: &'static str, times: usize) -> Self {
        self.script_failure(template_id, FailureKind::Unavailable, times)
    }

    fn script_failure(self, template_id: &'static str, kind: FailureKind, times: usize) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(template_id, (kind, times));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, template_id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.template_id == template_id)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl StructuredModel for StubModel {
    async fn invoke(&self, request: &ModelRequest) -> Result<Value, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            template_id: request.template_id,
            user: request.user.clone(),
            schema: request.output.name.clone(),
        });

        {
            let mut failures = self.failures.lock().unwrap();
            if let Some((kind, remaining)) = failures.get_mut(request.template_id) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(match kind {
                        FailureKind::Schema => LlmError::MissingStructuredOutput {
                            schema: request.output.name.clone(),
                        },
                        FailureKind::Unavailable => LlmError::Api {
                            status: 503,
                            message: "stub unavailable".to_string(),
                        },
                    });
                }
            }
        }

        self.responses
            .get(request.template_id)
            .cloned()
            .ok_or_else(|| LlmError::Api {
                status: 404,
                message: format!("no stub response for '{}'", request.template_id),
            })
    }
}
