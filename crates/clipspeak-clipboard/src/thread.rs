//! Dedicated clipboard thread.
//!
//! `arboard::Clipboard` is not `Send` on every platform and its calls block.
//! The clipboard lives on one OS thread for its whole lifetime; async callers
//! send [`ClipboardCommand`]s and await the reply on a oneshot channel.

use std::sync::mpsc;
use std::thread;

use clipspeak_core::ContentFormat;
use tokio::sync::oneshot;

use crate::error::ClipboardError;

type Reply<T> = oneshot::Sender<Result<T, ClipboardError>>;

/// A command sent to the clipboard thread.
enum ClipboardCommand {
    /// Read the current text.
    ReadText { reply: Reply<String> },

    /// Read the current image as raw RGBA bytes.
    ReadImage { reply: Reply<Vec<u8>> },

    /// Release the clipboard and exit.
    Shutdown,
}

/// `Send + Sync` handle to the clipboard thread.
pub struct ClipboardThreadHandle {
    cmd_tx: mpsc::Sender<ClipboardCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ClipboardThreadHandle {
    /// Spawn the clipboard thread and open the clipboard on it.
    ///
    /// Blocks until the clipboard is open; errors from `Clipboard::new` are
    /// returned here.
    pub fn spawn() -> Result<Self, ClipboardError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ClipboardCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), ClipboardError>>();

        let thread = thread::Builder::new()
            .name("clipspeak-clipboard".into())
            .spawn(move || Self::run(&cmd_rx, &init_tx))
            .map_err(|e| {
                ClipboardError::Unavailable(format!("failed to spawn clipboard thread: {e}"))
            })?;

        init_rx.recv().map_err(|_| ClipboardError::ThreadDied)??;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    /// Stop the thread and wait for it to release the clipboard.
    ///
    /// The join runs on the blocking pool so no async worker is held up.
    pub async fn close(mut self) {
        let _ = self.cmd_tx.send(ClipboardCommand::Shutdown);
        let Some(thread) = self.thread.take() else {
            return;
        };
        match tokio::task::spawn_blocking(move || thread.join()).await {
            Ok(Ok(())) => tracing::debug!("Clipboard thread joined"),
            Ok(Err(_)) => tracing::warn!("Clipboard thread panicked"),
            Err(e) => tracing::warn!(error = %e, "Failed to join clipboard thread"),
        }
    }

    pub async fn read_text(&self) -> Result<String, ClipboardError> {
        self.request(|reply| ClipboardCommand::ReadText { reply }).await
    }

    pub async fn read_image(&self) -> Result<Vec<u8>, ClipboardError> {
        self.request(|reply| ClipboardCommand::ReadImage { reply }).await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> ClipboardCommand,
    ) -> Result<T, ClipboardError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(tx))
            .map_err(|_| ClipboardError::ThreadDied)?;
        rx.await.map_err(|_| ClipboardError::ThreadDied)?
    }

    fn run(
        cmd_rx: &mpsc::Receiver<ClipboardCommand>,
        init_tx: &mpsc::Sender<Result<(), ClipboardError>>,
    ) {
        let mut clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => clipboard,
            Err(e) => {
                let _ = init_tx.send(Err(ClipboardError::Unavailable(e.to_string())));
                return;
            }
        };

        if init_tx.send(Ok(())).is_err() {
            return;
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ClipboardCommand::ReadText { reply } => {
                    let result = clipboard
                        .get_text()
                        .map_err(|e| ClipboardError::from_read(ContentFormat::Text, &e));
                    let _ = reply.send(result);
                }

                ClipboardCommand::ReadImage { reply } => {
                    let result = clipboard
                        .get_image()
                        .map(|image| image.bytes.into_owned())
                        .map_err(|e| ClipboardError::from_read(ContentFormat::Image, &e));
                    let _ = reply.send(result);
                }

                ClipboardCommand::Shutdown => break,
            }
        }

        // The clipboard is dropped here, on its own thread
        tracing::debug!("Clipboard thread shutting down");
    }
}

impl Drop for ClipboardThreadHandle {
    fn drop(&mut self) {
        // Never joins: drop may run on an async worker. The thread exits on
        // its own once it sees Shutdown or the closed channel.
        let _ = self.cmd_tx.send(ClipboardCommand::Shutdown);
        self.thread.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    /// A handle whose thread takes `linger` to exit after Shutdown.
    fn slow_handle(linger: Duration) -> (ClipboardThreadHandle, Arc<AtomicBool>) {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ClipboardCommand>();
        let exited = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&exited);
        let thread = thread::spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                if matches!(cmd, ClipboardCommand::Shutdown) {
                    break;
                }
            }
            thread::sleep(linger);
            flag.store(true, Ordering::SeqCst);
        });
        let handle = ClipboardThreadHandle {
            cmd_tx,
            thread: Some(thread),
        };
        (handle, exited)
    }

    #[tokio::test]
    async fn drop_does_not_wait_for_the_thread() {
        let (handle, exited) = slow_handle(Duration::from_millis(500));

        let started = Instant::now();
        drop(handle);
        assert!(started.elapsed() < Duration::from_millis(250));
        assert!(!exited.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn close_joins_the_thread() {
        let (handle, exited) = slow_handle(Duration::from_millis(100));

        handle.close().await;
        assert!(exited.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn requests_after_thread_exit_report_thread_died() {
        let (handle, _) = slow_handle(Duration::ZERO);
        let _ = handle.cmd_tx.send(ClipboardCommand::Shutdown);
        tokio::time::sleep(Duration::from_millis(100)).await;

        let err = handle.read_text().await.unwrap_err();
        assert!(matches!(err, ClipboardError::ThreadDied));
    }
}
