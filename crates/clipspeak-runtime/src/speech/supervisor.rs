//! Single-flight supervision of speech tasks.
//!
//! The supervisor is owned by the dispatch loop and mutated through
//! `&mut self`, so the current task's token has exactly one writer and needs
//! no lock.

use std::sync::Arc;
use std::time::Duration;

use clipspeak_core::{FilteredText, TaskId, TaskState};
use tokio::task::{JoinError, JoinSet};
use tokio::time::{Instant, timeout_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::task::{SynthesisTask, TaskHandle};
use crate::process::ProcessPipe;

/// Owns the current task's token and every spawned task future.
pub struct TaskSupervisor {
    pipe: Arc<ProcessPipe>,
    root: CancellationToken,
    current: Option<CancellationToken>,
    tasks: JoinSet<TaskState>,
    next_id: u64,
}

impl TaskSupervisor {
    /// Create a supervisor whose task tokens are children of `root`.
    pub fn new(pipe: ProcessPipe, root: CancellationToken) -> Self {
        Self {
            pipe: Arc::new(pipe),
            root,
            current: None,
            tasks: JoinSet::new(),
            next_id: 0,
        }
    }

    pub fn pipe(&self) -> &ProcessPipe {
        &self.pipe
    }

    /// Cancel the current task (if any) and start a new one for `text`.
    ///
    /// The previous token is triggered before the new one is stored, and this
    /// returns without waiting for the previous task's processes to exit.
    pub fn supersede(&mut self, text: FilteredText) -> TaskHandle {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        self.reap_finished();

        let cancel = self.root.child_token();
        self.current = Some(cancel.clone());

        self.next_id += 1;
        let id = TaskId(self.next_id);
        let task = SynthesisTask::new(id, text, Arc::clone(&self.pipe), cancel);
        let handle = task.handle();
        self.tasks.spawn(task.run());

        debug!(task = %id, active = self.tasks.len(), "Task started");
        handle
    }

    /// Cancel the current task without starting another.
    ///
    /// Returns whether there was a task to cancel.
    pub fn cancel_current(&mut self) -> bool {
        match self.current.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Number of spawned tasks not yet reaped.
    pub fn active_tasks(&self) -> usize {
        self.tasks.len()
    }

    fn reap_finished(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            log_task_result(result);
        }
    }

    /// Cancel everything and wait for the tasks to reap their processes.
    ///
    /// Tasks still running after `grace` are aborted; dropping their
    /// children kills the processes. Returns the number of tasks that
    /// finished on their own.
    pub async fn shutdown(mut self, grace: Duration) -> usize {
        self.root.cancel();
        self.current = None;

        let deadline = Instant::now() + grace;
        let mut reaped = 0;
        loop {
            match timeout_at(deadline, self.tasks.join_next()).await {
                Ok(Some(result)) => {
                    reaped += 1;
                    log_task_result(result);
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        remaining = self.tasks.len(),
                        "Speech tasks did not stop in time, aborting"
                    );
                    self.tasks.shutdown().await;
                    break;
                }
            }
        }

        debug!(reaped, "Supervisor shut down");
        reaped
    }
}

fn log_task_result(result: Result<TaskState, JoinError>) {
    match result {
        Ok(state) => debug!(%state, "Task reaped"),
        Err(e) if e.is_cancelled() => debug!("Task aborted"),
        Err(e) => warn!(error = %e, "Task panicked"),
    }
}
