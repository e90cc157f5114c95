use crate::{Deck, Error, Pipeline, PipelineConfig, Result};
use std::thread;
use tokio::sync::oneshot;

/// An async-friendly facade over the synchronous pipeline.
///
/// Each request runs on its own worker thread that owns its own browser
/// session, so async hosts (the HTTP transport layer) can serve concurrent
/// requests without any shared mutable browser state: one session per
/// in-flight request, no pooling.
#[derive(Clone)]
pub struct DeckService {
    config: PipelineConfig,
}

impl DeckService {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Generate the PDF for one deck without blocking the async runtime.
    ///
    /// The worker thread reports its terminal result over a oneshot channel;
    /// if the thread dies without replying (a panic mid-pipeline), the
    /// request surfaces an [`Error::Other`] rather than hanging. The
    /// session itself is still reclaimed in that case by its drop guard.
    pub async fn generate(&self, deck: Deck) -> Result<Vec<u8>> {
        let config = self.config.clone();
        let (tx, rx) = oneshot::channel();

        thread::spawn(move || {
            let result = Pipeline::new(config).run(&deck);
            let _ = tx.send(result);
        });

        rx.await
            .map_err(|e| Error::Other(format!("render worker terminated: {}", e)))?
    }

    /// Build the boundary failure payload for an error from this service,
    /// honoring the configured diagnostics verbosity.
    pub fn error_payload(&self, err: &Error) -> crate::ErrorPayload {
        err.to_payload(self.config.verbose_diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validation_error_through_facade() {
        let service = DeckService::new(PipelineConfig::default());
        let err = service.generate(Deck::new(None, vec![])).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let payload = service.error_payload(&err);
        assert_eq!(payload.kind, "validation");
        assert!(payload.details.is_none());
    }
}
