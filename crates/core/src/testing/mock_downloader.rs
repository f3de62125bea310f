//! Mock download client for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Notify, RwLock};

use crate::downloader::{DownloadClient, DownloadError, DownloadRequest};

type SubmitHook = Box<dyn Fn(&DownloadRequest) + Send + Sync>;

/// Mock implementation of the [`DownloadClient`] trait.
#[derive(Default)]
pub struct MockDownloadClient {
    submitted: RwLock<Vec<DownloadRequest>>,
    next_error: RwLock<Option<DownloadError>>,
    gate: RwLock<Option<Arc<Notify>>>,
    on_submit: RwLock<Option<SubmitHook>>,
}

impl MockDownloadClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that reached the client, in call order.
    pub async fn submitted(&self) -> Vec<DownloadRequest> {
        self.submitted.read().await.clone()
    }

    /// Make the next submission fail with the given error.
    pub async fn set_next_error(&self, error: DownloadError) {
        *self.next_error.write().await = Some(error);
    }

    /// Hold every subsequent submission until the notify is signalled.
    pub async fn set_block_until(&self, gate: Arc<Notify>) {
        *self.gate.write().await = Some(gate);
    }

    /// Invoke a hook as soon as a submission reaches the client.
    pub async fn set_on_submit<F>(&self, hook: F)
    where
        F: Fn(&DownloadRequest) + Send + Sync + 'static,
    {
        *self.on_submit.write().await = Some(Box::new(hook));
    }
}

#[async_trait]
impl DownloadClient for MockDownloadClient {
    fn name(&self) -> &str {
        "mock-downloader"
    }

    async fn submit(&self, request: &DownloadRequest) -> Result<(), DownloadError> {
        if let Some(hook) = self.on_submit.read().await.as_ref() {
            hook(request);
        }

        let gate = self.gate.read().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.submitted.write().await.push(request.clone());
        Ok(())
    }
}
