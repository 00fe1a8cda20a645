pub mod complete;
pub mod style_transfer;
pub mod summarize;

pub use complete::{CompletionInput, CompletionMode, CompletionResponse, TextCompletion};
pub use style_transfer::{
    ImageFile, StyleMode, StyleTransfer, StyleTransferInput, StyleTransferResponse,
};
pub use summarize::{SummarizeInput, SummarizeResponse, Summarizer};

/// Message shown when a backend could not be reached or gave no detail.
pub fn connection_fallback(service_label: &str, port: u16) -> String {
    format!(
        "Error connecting to {} service. Make sure the backend is running on port {}.",
        service_label, port
    )
}
