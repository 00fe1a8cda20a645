use super::connection_fallback;
use crate::{
    Result,
    config::BackendConfig,
    form::{FormService, RequestForm},
    remote::{RemoteFailure, RemoteRequest, RemoteResponse},
};
use serde::{Deserialize, Serialize};

pub const COMPLETE_PATH: &str = "/api/complete/complete";
pub const MULTI_COMPLETE_PATH: &str = "/api/complete/multi-complete";

pub const DEFAULT_MAX_NEW_TOKENS: u32 = 50;
pub const DEFAULT_NUM_SEQUENCES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionMode {
    #[default]
    Single,
    Multi,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionInput {
    pub prompt: String,
    pub max_new_tokens: u32,
    pub mode: CompletionMode,
    /// Only sent in [`CompletionMode::Multi`].
    pub num_sequences: u32,
}

impl Default for CompletionInput {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            mode: CompletionMode::default(),
            num_sequences: DEFAULT_NUM_SEQUENCES,
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    max_new_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MultiCompletionRequest<'a> {
    prompt: &'a str,
    max_new_tokens: u32,
    num_sequences: u32,
}

#[derive(Debug, Deserialize)]
struct SingleCompletionBody {
    completion: String,
}

#[derive(Debug, Deserialize)]
struct MultiCompletionBody {
    completions: Vec<String>,
}

/// Completions in the order the server returned them. Single mode always
/// holds exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub completions: Vec<String>,
}

pub struct TextCompletion {
    backend_port: u16,
}

impl TextCompletion {
    pub fn new(backend: &BackendConfig) -> Self {
        Self {
            backend_port: backend.port,
        }
    }

    pub fn into_form(self) -> RequestForm<Self> {
        RequestForm::new(self)
    }
}

impl FormService for TextCompletion {
    type Input = CompletionInput;
    type Output = CompletionResponse;

    fn name(&self) -> &'static str {
        "complete"
    }

    fn validate(&self, input: &CompletionInput) -> std::result::Result<(), String> {
        if input.prompt.trim().is_empty() {
            return Err("Please enter a prompt to complete".to_string());
        }
        Ok(())
    }

    fn build_request(&self, input: &CompletionInput) -> Result<RemoteRequest> {
        let prompt = input.prompt.trim();
        match input.mode {
            CompletionMode::Single => RemoteRequest::post_json(
                COMPLETE_PATH,
                &CompletionRequest {
                    prompt,
                    max_new_tokens: input.max_new_tokens,
                },
            ),
            CompletionMode::Multi => RemoteRequest::post_json(
                MULTI_COMPLETE_PATH,
                &MultiCompletionRequest {
                    prompt,
                    max_new_tokens: input.max_new_tokens,
                    num_sequences: input.num_sequences,
                },
            ),
        }
    }

    fn decode(
        &self,
        input: &CompletionInput,
        response: RemoteResponse,
    ) -> std::result::Result<CompletionResponse, RemoteFailure> {
        let completions = match input.mode {
            CompletionMode::Single => {
                let body: SingleCompletionBody = response.into_json()?;
                vec![body.completion]
            }
            CompletionMode::Multi => {
                let body: MultiCompletionBody = response.into_json()?;
                body.completions
            }
        };

        Ok(CompletionResponse { completions })
    }

    fn fallback_message(&self) -> String {
        connection_fallback("text completion", self.backend_port)
    }
}
