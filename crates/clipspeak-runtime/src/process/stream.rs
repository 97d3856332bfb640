//! Async stderr readers for stage processes (non-UTF8-safe).
//!
//! piper and aplay can emit non-UTF8 bytes on stderr. Using
//! `BufReader::lines()` would terminate the reader task on invalid UTF-8, so
//! lines are read as bytes and decoded lossily.

use clipspeak_core::{Stage, TaskId};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

/// Forward every line of `stream` to `tracing` at debug level.
///
/// The reader ends at EOF, which happens once the process exits and its
/// stderr is closed.
pub fn spawn_stream_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    task: TaskId,
    stage: Stage,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    let line = String::from_utf8_lossy(trim_line_end(&buf));
                    if !line.is_empty() {
                        debug!(task = %task, %stage, "{stage}: {line}");
                    }
                }
                Err(e) => {
                    debug!(task = %task, %stage, error = %e, "stderr reader exiting due to read error");
                    break;
                }
            }
        }
    })
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_crlf_and_lf() {
        assert_eq!(trim_line_end(b"abc\r\n"), b"abc");
        assert_eq!(trim_line_end(b"abc\n"), b"abc");
        assert_eq!(trim_line_end(b"abc"), b"abc");
    }

    #[tokio::test]
    async fn reader_survives_invalid_utf8_and_ends_at_eof() {
        let input: &[u8] = b"ok\n\xff\xfe broken\nlast";
        let handle = spawn_stream_reader(input, TaskId(1), Stage::Player);
        handle.await.unwrap();
    }
}
