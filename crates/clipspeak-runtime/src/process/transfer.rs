//! Bounded streaming copy from the synthesizer into the player.

use clipspeak_core::settings::DEFAULT_TRANSFER_CHUNK;
use clipspeak_core::{Stage, TaskError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Copies a reader into a writer through one fixed-size buffer.
///
/// At most `chunk_size` bytes are held at any time. Read errors are
/// attributed to the synthesizer and write errors to the player, so a player
/// that exits early surfaces as a player stream failure.
#[derive(Debug, Clone, Copy)]
pub struct StreamTransfer {
    chunk_size: usize,
}

impl Default for StreamTransfer {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSFER_CHUNK)
    }
}

impl StreamTransfer {
    /// Create a transfer with the given buffer size (at least one byte).
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Copy until EOF, then shut down and drop the writer.
    ///
    /// Dropping the writer closes the player's stdin, which is how the player
    /// learns the stream is over. Returns the number of bytes copied.
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> Result<u64, TaskError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = vec![0u8; self.chunk_size];
        let mut total: u64 = 0;

        loop {
            let n = reader
                .read(&mut buf)
                .await
                .map_err(|e| TaskError::stream(Stage::Synthesizer, &e))?;
            if n == 0 {
                break;
            }
            writer
                .write_all(&buf[..n])
                .await
                .map_err(|e| TaskError::stream(Stage::Player, &e))?;
            total += n as u64;
        }

        writer
            .shutdown()
            .await
            .map_err(|e| TaskError::stream(Stage::Player, &e))?;
        drop(writer);

        Ok(total)
    }
}
