//! Clipboard error types.

use clipspeak_core::{ChangeSourceError, ContentFormat};

/// Errors raised by the clipboard thread.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// The system clipboard could not be opened (no display server, etc.).
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard thread exited or could not be started.
    #[error("Clipboard thread is not running")]
    ThreadDied,

    /// The clipboard holds nothing in the requested format.
    #[error("Clipboard has no {0} content")]
    Empty(ContentFormat),

    /// The platform clipboard returned an error.
    #[error("Failed to read {format} from clipboard: {reason}")]
    Read {
        format: ContentFormat,
        reason: String,
    },
}

impl ClipboardError {
    /// Classify an arboard error for a read of `format`.
    pub(crate) fn from_read(format: ContentFormat, err: &arboard::Error) -> Self {
        match err {
            arboard::Error::ContentNotAvailable => Self::Empty(format),
            other => Self::Read {
                format,
                reason: other.to_string(),
            },
        }
    }
}

impl From<ClipboardError> for ChangeSourceError {
    fn from(err: ClipboardError) -> Self {
        match err {
            ClipboardError::Unavailable(reason) => Self::Unavailable(reason),
            ClipboardError::ThreadDied => Self::Unavailable(err.to_string()),
            ClipboardError::Empty(format) => Self::Empty(format),
            ClipboardError::Read { format, reason } => Self::ReadFailed { format, reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_content_maps_to_empty() {
        let err =
            ClipboardError::from_read(ContentFormat::Text, &arboard::Error::ContentNotAvailable);
        assert!(matches!(err, ClipboardError::Empty(ContentFormat::Text)));
        assert!(matches!(
            ChangeSourceError::from(err),
            ChangeSourceError::Empty(ContentFormat::Text)
        ));
    }

    #[test]
    fn other_errors_keep_their_reason() {
        let err = ClipboardError::from_read(
            ContentFormat::Image,
            &arboard::Error::ClipboardOccupied,
        );
        match ChangeSourceError::from(err) {
            ChangeSourceError::ReadFailed { format, reason } => {
                assert_eq!(format, ContentFormat::Image);
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn dead_thread_is_unavailable() {
        assert!(matches!(
            ChangeSourceError::from(ClipboardError::ThreadDied),
            ChangeSourceError::Unavailable(_)
        ));
    }
}
