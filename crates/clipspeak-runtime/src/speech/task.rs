//! A single attempt to speak one filtered text.

use std::sync::Arc;

use clipspeak_core::{FilteredText, TaskId, TaskState};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::process::ProcessPipe;

/// One speech task: owns its cancellation token and one pipe run.
///
/// State changes are published on a watch channel; [`TaskHandle`] observes
/// them without owning the task.
pub struct SynthesisTask {
    id: TaskId,
    text: FilteredText,
    pipe: Arc<ProcessPipe>,
    cancel: CancellationToken,
    state: watch::Sender<TaskState>,
}

impl SynthesisTask {
    pub fn new(
        id: TaskId,
        text: FilteredText,
        pipe: Arc<ProcessPipe>,
        cancel: CancellationToken,
    ) -> Self {
        let (state, _) = watch::channel(TaskState::Created);
        Self {
            id,
            text,
            pipe,
            cancel,
            state,
        }
    }

    pub const fn id(&self) -> TaskId {
        self.id
    }

    pub fn handle(&self) -> TaskHandle {
        TaskHandle {
            id: self.id,
            cancel: self.cancel.clone(),
            state: self.state.subscribe(),
        }
    }

    /// Drive the task to a terminal state.
    ///
    /// A task whose token is already cancelled spawns nothing. Failures are
    /// logged here and never propagate further.
    pub async fn run(self) -> TaskState {
        if self.cancel.is_cancelled() {
            debug!(task = %self.id, "Task superseded before start");
            return self.finish(TaskState::Cancelled);
        }

        let running = match self.pipe.spawn(self.id).await {
            Ok(running) => running,
            Err(err) => {
                error!(task = %self.id, error = %err, "Failed to start speech");
                return self.finish(TaskState::Failed(err));
            }
        };

        self.state.send_replace(TaskState::Running);
        info!(task = %self.id, chars = self.text.char_count(), text = %self.text, "Speaking");

        let outcome = running.drive(&self.text, &self.cancel).await;
        match &outcome {
            TaskState::Completed => info!(task = %self.id, "Finished speaking"),
            TaskState::Cancelled => info!(task = %self.id, "Speech cancelled"),
            TaskState::Failed(err) => error!(task = %self.id, error = %err, "Speech failed"),
            TaskState::Created | TaskState::Running => {}
        }

        self.finish(outcome)
    }

    fn finish(&self, state: TaskState) -> TaskState {
        self.state.send_replace(state.clone());
        state
    }
}

/// Observer and canceller for a [`SynthesisTask`].
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel: CancellationToken,
    state: watch::Receiver<TaskState>,
}

impl TaskHandle {
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Trigger the task's token. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Latest published state.
    pub fn state(&self) -> TaskState {
        self.state.borrow().clone()
    }

    /// Running and not yet cancelled.
    ///
    /// A cancelled task stops counting as running as soon as its token
    /// fires, even while its processes are still being reaped.
    pub fn is_running(&self) -> bool {
        !self.is_cancelled() && matches!(*self.state.borrow(), TaskState::Running)
    }

    /// Wait for the task to reach a terminal state.
    ///
    /// If the task is dropped before finishing (aborted at shutdown), the
    /// last published state is returned.
    pub async fn wait(&self) -> TaskState {
        let mut rx = self.state.clone();
        if let Ok(state) = rx.wait_for(TaskState::is_terminal).await {
            return state.clone();
        }
        rx.borrow().clone()
    }
}
