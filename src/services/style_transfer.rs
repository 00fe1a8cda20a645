use super::connection_fallback;
use crate::{
    Result,
    blob::{BlobHandle, BlobStore},
    config::BackendConfig,
    form::{FormService, RequestForm},
    remote::{MultipartPart, RemoteFailure, RemoteRequest, RemoteResponse, ResponseKind},
};
use std::path::Path;

pub const STYLE_TRANSFER_PATH: &str = "/api/style/style-transfer";
pub const STYLE_TRANSFER_RAW_PATH: &str = "/api/style/style-transfer-raw";

pub const MIN_ALPHA: f64 = 0.1;
pub const MAX_ALPHA: f64 = 1.0;
pub const DEFAULT_ALPHA: f64 = 1.0;

const DEFAULT_RESULT_TYPE: &str = "image/png";

/// An image picked by the user, held in memory until the form is reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self::new(file_name, content_type_for(path), data))
    }
}

fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleMode {
    /// Blend the stylized image with the content image by `alpha`.
    #[default]
    Blended,
    /// Stylize only; `alpha` is ignored.
    Raw,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleTransferInput {
    pub content_image: Option<ImageFile>,
    pub style_image: Option<ImageFile>,
    pub alpha: f64,
    pub mode: StyleMode,
}

impl Default for StyleTransferInput {
    fn default() -> Self {
        Self {
            content_image: None,
            style_image: None,
            alpha: DEFAULT_ALPHA,
            mode: StyleMode::default(),
        }
    }
}

#[derive(Debug)]
pub struct StyleTransferResponse {
    pub result_image: BlobHandle,
}

pub struct StyleTransfer {
    backend_port: u16,
    blobs: BlobStore,
}

impl StyleTransfer {
    pub fn new(backend: &BackendConfig, blobs: BlobStore) -> Self {
        Self {
            backend_port: backend.port,
            blobs,
        }
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn into_form(self) -> RequestForm<Self> {
        RequestForm::new(self)
    }
}

fn file_part(name: &str, image: &ImageFile) -> MultipartPart {
    MultipartPart {
        name: name.to_string(),
        filename: image.file_name.clone(),
        content_type: image.content_type.clone(),
        data: image.data.clone(),
    }
}

impl FormService for StyleTransfer {
    type Input = StyleTransferInput;
    type Output = StyleTransferResponse;

    fn name(&self) -> &'static str {
        "style-transfer"
    }

    fn validate(&self, input: &StyleTransferInput) -> std::result::Result<(), String> {
        if input.content_image.is_none() || input.style_image.is_none() {
            return Err("Please select both content and style images".to_string());
        }
        if input.mode == StyleMode::Blended && !(MIN_ALPHA..=MAX_ALPHA).contains(&input.alpha) {
            return Err(format!(
                "Style strength must be between {:.1} and {:.1}",
                MIN_ALPHA, MAX_ALPHA
            ));
        }
        Ok(())
    }

    fn build_request(&self, input: &StyleTransferInput) -> Result<RemoteRequest> {
        let (Some(content), Some(style)) = (&input.content_image, &input.style_image) else {
            return Err(crate::Error::validation(
                "Please select both content and style images",
            ));
        };

        let parts = vec![file_part("content_file", content), file_part("style_file", style)];

        let request = match input.mode {
            StyleMode::Blended => RemoteRequest::post_multipart(STYLE_TRANSFER_PATH, parts)
                .with_query("alpha", input.alpha),
            StyleMode::Raw => RemoteRequest::post_multipart(STYLE_TRANSFER_RAW_PATH, parts),
        };

        Ok(request.expecting(ResponseKind::Binary))
    }

    fn decode(
        &self,
        _input: &StyleTransferInput,
        response: RemoteResponse,
    ) -> std::result::Result<StyleTransferResponse, RemoteFailure> {
        let (content_type, data) = response.into_binary()?;
        let content_type = content_type.unwrap_or_else(|| DEFAULT_RESULT_TYPE.to_string());

        Ok(StyleTransferResponse {
            result_image: self.blobs.create(content_type, data),
        })
    }

    fn fallback_message(&self) -> String {
        connection_fallback("style transfer", self.backend_port)
    }
}
