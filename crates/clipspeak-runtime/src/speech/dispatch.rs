//! The loop that turns change events into speech tasks.

use std::sync::Arc;
use std::time::Duration;

use clipspeak_core::settings::DEFAULT_SHUTDOWN_GRACE;
use clipspeak_core::{ChangeEvent, ChangeSourceError, ChangeSourcePort, ContentFormat, TargetScript, filter_script};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::supervisor::TaskSupervisor;

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Change events received.
    pub changes: u64,
    /// Changes whose content had no characters of the target script.
    pub skipped_empty: u64,
    /// Changes whose content could not be read.
    pub read_failures: u64,
    /// Speech tasks started.
    pub tasks_started: u64,
    /// Tasks that finished on their own during shutdown.
    pub tasks_reaped: usize,
}

/// Consumes change events in arrival order and drives the supervisor.
pub struct ChangeDispatchLoop {
    source: Arc<dyn ChangeSourcePort>,
    supervisor: TaskSupervisor,
    script: TargetScript,
    shutdown_grace: Duration,
}

enum Outcome {
    Started,
    NoMatch,
    ReadFailed,
}

impl ChangeDispatchLoop {
    pub fn new(
        source: Arc<dyn ChangeSourcePort>,
        supervisor: TaskSupervisor,
        script: TargetScript,
    ) -> Self {
        Self {
            source,
            supervisor,
            script,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE * 2,
        }
    }

    /// How long shutdown waits for in-flight tasks.
    ///
    /// Should exceed the pipe's own SIGTERM grace so tasks can reap their
    /// processes before being aborted.
    #[must_use]
    pub const fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Run until `cancel` fires or the change stream ends, then shut the
    /// supervisor down.
    pub async fn run(mut self, cancel: CancellationToken) -> DispatchStats {
        let mut stats = DispatchStats::default();
        let mut events = self.source.watch(cancel.clone());
        debug!(script = %self.script, "Dispatch loop started");

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                event = events.next() => event,
            };
            let Some(event) = next else {
                break;
            };

            stats.changes += 1;
            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                outcome = self.on_change(event) => outcome,
            };
            match outcome {
                Outcome::Started => stats.tasks_started += 1,
                Outcome::NoMatch => stats.skipped_empty += 1,
                Outcome::ReadFailed => stats.read_failures += 1,
            }
        }

        drop(events);
        stats.tasks_reaped = self.supervisor.shutdown(self.shutdown_grace).await;
        info!(
            changes = stats.changes,
            tasks = stats.tasks_started,
            "Dispatch loop stopped"
        );
        stats
    }

    async fn on_change(&mut self, event: ChangeEvent) -> Outcome {
        let bytes = match self.source.read(ContentFormat::Text).await {
            Ok(bytes) => bytes,
            Err(ChangeSourceError::Empty(format)) => {
                debug!(seq = event.sequence, %format, "Change has no text content");
                return Outcome::NoMatch;
            }
            Err(e) => {
                warn!(seq = event.sequence, error = %e, "Failed to read changed content, skipping");
                return Outcome::ReadFailed;
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        let Some(filtered) = filter_script(&text, self.script) else {
            info!(
                seq = event.sequence,
                "Content changed, but no {} characters found to speak",
                self.script
            );
            return Outcome::NoMatch;
        };

        let handle = self.supervisor.supersede(filtered);
        debug!(seq = event.sequence, task = %handle.id(), "Change dispatched");
        Outcome::Started
    }
}
