use crate::{
    blob::BlobStore,
    config::Config,
    form::RequestForm,
    remote::{HttpRemote, RemoteCall},
    services::{StyleTransfer, Summarizer, TextCompletion},
};
use std::sync::Arc;
use tracing::info;

/// The three forms of the hub sharing one remote and one blob store.
///
/// Forms are independent: nothing submitted on one affects the others.
pub struct Hub {
    pub summarizer: RequestForm<Summarizer>,
    pub style_transfer: RequestForm<StyleTransfer>,
    pub completion: RequestForm<TextCompletion>,
    remote: Arc<dyn RemoteCall>,
    blobs: BlobStore,
}

impl Hub {
    pub fn new(config: &Config) -> Self {
        let remote: Arc<dyn RemoteCall> = Arc::new(HttpRemote::new(&config.gateway));
        info!("Using inference gateway at {}", config.gateway.base_url);
        Self::with_remote(config, remote)
    }

    pub fn with_remote(config: &Config, remote: Arc<dyn RemoteCall>) -> Self {
        let blobs = BlobStore::new();

        Self {
            summarizer: Summarizer::new(&config.services.summarize).into_form(),
            style_transfer: StyleTransfer::new(&config.services.style, blobs.clone())
                .into_form(),
            completion: TextCompletion::new(&config.services.complete).into_form(),
            remote,
            blobs,
        }
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub async fn submit_summarize(&mut self) -> crate::Result<()> {
        self.summarizer.submit(self.remote.as_ref()).await
    }

    pub async fn submit_style_transfer(&mut self) -> crate::Result<()> {
        self.style_transfer.submit(self.remote.as_ref()).await
    }

    pub async fn submit_completion(&mut self) -> crate::Result<()> {
        self.completion.submit(self.remote.as_ref()).await
    }

    pub fn reset_all(&mut self) {
        self.summarizer.reset();
        self.style_transfer.reset();
        self.completion.reset();
    }
}
