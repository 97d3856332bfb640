//! `ChangeSourcePort` implementation backed by the desktop clipboard.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use clipspeak_core::settings::DEFAULT_POLL_INTERVAL;
use clipspeak_core::{
    ChangeEvent, ChangeSourceError, ChangeSourcePort, ChangeStream, ContentFormat,
};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::detector::ChangeDetector;
use crate::error::ClipboardError;
use crate::thread::ClipboardThreadHandle;

/// Polls the clipboard text and reports changes.
pub struct ClipboardSource {
    handle: OnceLock<Arc<ClipboardThreadHandle>>,
    poll_interval: Duration,
}

impl Default for ClipboardSource {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl ClipboardSource {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            handle: OnceLock::new(),
            poll_interval: poll_interval.max(Duration::from_millis(10)),
        }
    }

    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Release the clipboard and join its thread.
    ///
    /// If a watch stream still holds the thread, it is left to exit when
    /// that stream is dropped.
    pub async fn close(self) {
        let Some(handle) = self.handle.into_inner() else {
            return;
        };
        match Arc::try_unwrap(handle) {
            Ok(handle) => handle.close().await,
            Err(_) => debug!("Clipboard still watched, leaving its thread to exit on drop"),
        }
    }

    fn handle(&self) -> Result<&Arc<ClipboardThreadHandle>, ChangeSourceError> {
        self.handle.get().ok_or(ChangeSourceError::NotInitialised)
    }
}

#[async_trait]
impl ChangeSourcePort for ClipboardSource {
    async fn init(&self) -> Result<(), ChangeSourceError> {
        if self.handle.get().is_some() {
            return Ok(());
        }

        // Opening the clipboard blocks until the thread reports back
        let handle = tokio::task::spawn_blocking(ClipboardThreadHandle::spawn)
            .await
            .map_err(|e| ChangeSourceError::Unavailable(e.to_string()))??;

        // A concurrent init may have won; the extra handle shuts its thread down on drop
        let _ = self.handle.set(Arc::new(handle));
        debug!(interval = ?self.poll_interval, "Clipboard opened");
        Ok(())
    }

    fn watch(&self, cancel: CancellationToken) -> ChangeStream {
        let handle = self.handle.get().cloned();
        let interval = self.poll_interval;

        Box::pin(async_stream::stream! {
            if let Some(handle) = handle {
                let mut detector = ChangeDetector::new();
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                let mut sequence = 0;

                loop {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        _ = ticker.tick() => {}
                    }

                    let content = match handle.read_text().await {
                        Ok(text) => Some(text),
                        Err(ClipboardError::Empty(_)) => None,
                        Err(e) => {
                            debug!(error = %e, "Clipboard poll failed");
                            None
                        }
                    };

                    if detector.observe(content.as_deref()) {
                        sequence += 1;
                        yield ChangeEvent::new(sequence);
                    }
                }
            } else {
                warn!("Clipboard watched before init; no changes will be reported");
            }
        })
    }

    async fn read(&self, format: ContentFormat) -> Result<Vec<u8>, ChangeSourceError> {
        let handle = self.handle()?;
        let bytes = match format {
            ContentFormat::Text => handle.read_text().await.map(String::into_bytes),
            ContentFormat::Image => handle.read_image().await,
        }?;
        Ok(bytes)
    }
}
