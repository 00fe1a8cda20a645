use super::types::*;
use crate::config::GatewayConfig;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

/// One outbound request/response exchange with an inference backend.
#[async_trait]
pub trait RemoteCall: Send + Sync {
    async fn execute(
        &self,
        request: RemoteRequest,
    ) -> std::result::Result<RemoteResponse, RemoteFailure>;
}

/// `RemoteCall` over HTTP. No retries and no timeout beyond reqwest's defaults.
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config.base_url.clone())
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn build_form(
        parts: Vec<MultipartPart>,
    ) -> std::result::Result<reqwest::multipart::Form, RemoteFailure> {
        let mut form = reqwest::multipart::Form::new();

        for part in parts {
            let file = reqwest::multipart::Part::bytes(part.data)
                .file_name(part.filename)
                .mime_str(&part.content_type)
                .map_err(|e| {
                    warn!("Invalid content type '{}': {}", part.content_type, e);
                    RemoteFailure::transport()
                })?;
            form = form.part(part.name, file);
        }

        Ok(form)
    }
}

#[async_trait]
impl RemoteCall for HttpRemote {
    async fn execute(
        &self,
        request: RemoteRequest,
    ) -> std::result::Result<RemoteResponse, RemoteFailure> {
        let url = self.build_url(&request.path);
        debug!("Sending {} request to {}", request.method, url);

        let mut req_builder = self.client.request(request.method, &url);

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        req_builder = match request.body {
            RequestBody::Json(value) => req_builder.json(&value),
            RequestBody::Multipart(parts) => req_builder.multipart(Self::build_form(parts)?),
        };

        let response = req_builder.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            RemoteFailure::transport()
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| {
            warn!("Failed to read response body from {}: {}", url, e);
            RemoteFailure::transport()
        })?;

        if !status.is_success() {
            let failure = RemoteFailure::from_response(status.as_u16(), &body);
            warn!(
                "Request to {} returned {} (detail: {:?})",
                url, status, failure.detail
            );
            return Err(failure);
        }

        debug!("Received {} bytes from {} ({})", body.len(), url, status);

        match request.accept {
            ResponseKind::Json => serde_json::from_slice(&body)
                .map(RemoteResponse::Json)
                .map_err(|e| {
                    warn!("Failed to parse JSON response from {}: {}", url, e);
                    RemoteFailure::undecodable()
                }),
            ResponseKind::Binary => Ok(RemoteResponse::Binary {
                content_type,
                data: body.to_vec(),
            }),
        }
    }
}
