//! Change source port.
//!
//! Abstracts the thing being watched (the desktop clipboard in production,
//! scripted fakes in tests). A change event carries no payload: consumers call
//! [`ChangeSourcePort::read`] to fetch the content that is current at that
//! moment.

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Notification that the source content changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Position of this event in the watch stream, starting at 1.
    pub sequence: u64,
}

impl ChangeEvent {
    pub const fn new(sequence: u64) -> Self {
        Self { sequence }
    }
}

/// Content format requested from [`ChangeSourcePort::read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentFormat {
    /// UTF-8 text.
    #[default]
    Text,
    /// Raw RGBA image bytes.
    Image,
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// Errors reported by a change source.
#[derive(Debug, Error)]
pub enum ChangeSourceError {
    /// The source could not be initialised (no display, no clipboard service).
    #[error("Change source unavailable: {0}")]
    Unavailable(String),

    /// `watch` or `read` was used before `init`.
    #[error("Change source not initialised")]
    NotInitialised,

    /// The source holds no content in the requested format.
    #[error("No {0} content available")]
    Empty(ContentFormat),

    /// Reading the content failed.
    #[error("Failed to read {format} content: {reason}")]
    ReadFailed {
        format: ContentFormat,
        reason: String,
    },
}

/// Stream of change events; ends when the watch is cancelled.
pub type ChangeStream = Pin<Box<dyn Stream<Item = ChangeEvent> + Send>>;

/// Port for a watched content source.
#[async_trait]
pub trait ChangeSourcePort: Send + Sync {
    /// One-time setup. Callers treat an error here as fatal.
    async fn init(&self) -> Result<(), ChangeSourceError>;

    /// Start watching for changes.
    ///
    /// The stream is infinite until `cancel` is triggered, after which it ends
    /// and cannot be restarted.
    fn watch(&self, cancel: CancellationToken) -> ChangeStream;

    /// Fetch the current content in `format`.
    async fn read(&self, format: ContentFormat) -> Result<Vec<u8>, ChangeSourceError>;
}
