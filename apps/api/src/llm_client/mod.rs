//! Structured-output model access.
//!
//! Pipeline steps never talk to Anthropic directly: they go through `StructuredModel`,
//! implemented by `LlmClient` (forced tool use against a JSON Schema), decorated by
//! `cache::CachedModel`, and replaced by a stub in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod cache;
pub mod prompts;
#[cfg(test)]
pub mod stub;

use prompts::PromptTemplate;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Model used for every call. Not configurable.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.0;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Malformed API response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("Model returned no structured output for schema '{schema}'")]
    MissingStructuredOutput { schema: String },

    #[error("Model output does not match schema '{schema}': {source}")]
    SchemaMismatch {
        schema: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LlmError {
    /// Schema-conformance failures are surfaced immediately and never retried.
    pub fn is_schema_violation(&self) -> bool {
        matches!(
            self,
            LlmError::MissingStructuredOutput { .. } | LlmError::SchemaMismatch { .. }
        )
    }

    /// Network failures (connect, timeout, interrupted body), 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Http(e) => !e.is_builder(),
            LlmError::Api { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// 429 and 5xx (including Anthropic's 529 "overloaded") are worth another attempt.
fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

// ────────────────────────────────────────────────────────────────────────────
// Structured-output request contract
// ────────────────────────────────────────────────────────────────────────────

/// Target shape for one model call: a JSON Schema generated from a Rust type.
/// Field doc comments become `description` entries, so the schema doubles as prompt text.
#[derive(Debug, Clone, Serialize)]
pub struct OutputSchema {
    pub name: String,
    pub description: String,
    pub schema: Value,
}

impl OutputSchema {
    pub fn of<T: JsonSchema>() -> Result<Self, LlmError> {
        let settings = schemars::gen::SchemaSettings::draft07().with(|s| {
            s.inline_subschemas = true;
        });
        let root = settings.into_generator().into_root_schema_for::<T>();
        let description = root
            .schema
            .metadata
            .as_ref()
            .and_then(|m| m.description.clone())
            .unwrap_or_else(|| format!("Structured {} output", T::schema_name()));

        let mut schema = serde_json::to_value(&root)?;
        if let Some(obj) = schema.as_object_mut() {
            obj.remove("$schema");
        }

        Ok(Self {
            name: T::schema_name(),
            description,
            schema,
        })
    }
}

/// One fully rendered model invocation.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub template_id: &'static str,
    pub system: &'static str,
    pub user: String,
    pub output: OutputSchema,
}

/// The model-invocation seam. Production: `LlmClient`. Tests: `stub::StubModel`.
/// Decorators such as `cache::CachedModel` wrap another implementation.
#[async_trait]
pub trait StructuredModel: Send + Sync {
    /// Returns the raw structured value the model produced for `request.output`.
    async fn invoke(&self, request: &ModelRequest) -> Result<Value, LlmError>;
}

/// Renders `template`, invokes the model against `T`'s schema, and deserializes the result.
pub async fn invoke_structured<T>(
    model: &dyn StructuredModel,
    template: &PromptTemplate,
    vars: &[(&str, &str)],
) -> Result<T, LlmError>
where
    T: DeserializeOwned + JsonSchema,
{
    let request = ModelRequest {
        template_id: template.id,
        system: template.system,
        user: template.render(vars),
        output: OutputSchema::of::<T>()?,
    };

    let value = model.invoke(&request).await?;

    serde_json::from_value(value).map_err(|source| LlmError::SchemaMismatch {
        schema: request.output.name.clone(),
        source,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    tools: Vec<ToolDefinition<'a>>,
    tool_choice: ToolChoice<'a>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolDefinition<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
    pub name: Option<String>,
    pub input: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the input of the first `tool_use` block addressed to `tool_name`.
    pub fn tool_input(&self, tool_name: &str) -> Option<&Value> {
        self.content
            .iter()
            .filter(|b| b.block_type == "tool_use")
            .find(|b| b.name.as_deref() == Some(tool_name))
            .and_then(|b| b.input.as_ref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Anthropic Messages API with retry logic. Structured output is obtained by
/// forcing a single tool call whose `input_schema` is the target schema.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    max_retries: u32,
    backoff: Duration,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration, max_retries: u32) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_url: ANTHROPIC_API_URL.to_string(),
            max_retries,
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Points the client at a different Messages endpoint (local gateways, tests).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Base delay for exponential backoff between attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Makes a raw call to the Messages API, returning the full response object.
    /// Transient failures are retried with exponential backoff, up to `max_retries` times.
    async fn call(&self, body: &AnthropicRequest<'_>) -> Result<LlmResponse, LlmError> {
        let mut attempt: u32 = 0;

        loop {
            match self.send_once(body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    // Exponential backoff: 1x, 2x, 4x ...
                    let delay = self.backoff * (1u32 << (attempt - 1).min(16));
                    warn!(
                        "LLM call attempt {} failed ({}), retrying after {}ms...",
                        attempt,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One request/response round trip. The body is read in full before parsing so that
    /// a stalled or interrupted body surfaces as a (transient) `Http` error.
    async fn send_once(&self, body: &AnthropicRequest<'_>) -> Result<LlmResponse, LlmError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            let message = serde_json::from_str::<AnthropicError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse =
            serde_json::from_slice(&bytes).map_err(LlmError::MalformedResponse)?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl StructuredModel for LlmClient {
    async fn invoke(&self, request: &ModelRequest) -> Result<Value, LlmError> {
        let tool_name = request.output.name.as_str();
        let body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: request.system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: &request.user,
            }],
            tools: vec![ToolDefinition {
                name: tool_name,
                description: &request.output.description,
                input_schema: &request.output.schema,
            }],
            tool_choice: ToolChoice {
                choice_type: "tool",
                name: tool_name,
            },
        };

        debug!(template = request.template_id, "invoking model");
        let response = self.call(&body).await?;

        response
            .tool_input(tool_name)
            .cloned()
            .ok_or_else(|| LlmError::MissingStructuredOutput {
                schema: tool_name.to_string(),
            })
    }
}
