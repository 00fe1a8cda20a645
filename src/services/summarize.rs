use super::connection_fallback;
use crate::{
    Result,
    config::BackendConfig,
    form::{FormService, RequestForm},
    remote::{RemoteFailure, RemoteRequest, RemoteResponse},
};
use serde::{Deserialize, Serialize};

pub const SUMMARIZE_PATH: &str = "/api/summarize/summarize";

pub const DEFAULT_MIN_LENGTH: u32 = 30;
pub const DEFAULT_MAX_LENGTH: u32 = 100;

/// Word-count bounds are passed through untouched; the backend decides what
/// `min_length > max_length` means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeInput {
    pub text: String,
    pub min_length: u32,
    pub max_length: u32,
}

impl Default for SummarizeInput {
    fn default() -> Self {
        Self {
            text: String::new(),
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

#[derive(Debug, Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
    max_length: u32,
    min_length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

pub struct Summarizer {
    backend_port: u16,
}

impl Summarizer {
    pub fn new(backend: &BackendConfig) -> Self {
        Self {
            backend_port: backend.port,
        }
    }

    pub fn into_form(self) -> RequestForm<Self> {
        RequestForm::new(self)
    }
}

impl FormService for Summarizer {
    type Input = SummarizeInput;
    type Output = SummarizeResponse;

    fn name(&self) -> &'static str {
        "summarize"
    }

    fn validate(&self, input: &SummarizeInput) -> std::result::Result<(), String> {
        if input.text.trim().is_empty() {
            return Err("Please enter some text to summarize".to_string());
        }
        Ok(())
    }

    fn build_request(&self, input: &SummarizeInput) -> Result<RemoteRequest> {
        RemoteRequest::post_json(
            SUMMARIZE_PATH,
            &SummarizeRequest {
                text: input.text.trim(),
                max_length: input.max_length,
                min_length: input.min_length,
            },
        )
    }

    fn decode(
        &self,
        _input: &SummarizeInput,
        response: RemoteResponse,
    ) -> std::result::Result<SummarizeResponse, RemoteFailure> {
        response.into_json()
    }

    fn fallback_message(&self) -> String {
        connection_fallback("summarization", self.backend_port)
    }
}
