//! Speech pipeline orchestration.
//!
//! The dispatch loop filters each change and hands non-empty text to the
//! supervisor, which cancels the task in flight and starts a new one. At most
//! one task is running at a time; superseded tasks are reaped in the
//! background.

mod commands;
mod dispatch;
mod supervisor;
mod task;

pub use commands::{player_command, speech_pipe, synthesizer_command};
pub use dispatch::{ChangeDispatchLoop, DispatchStats};
pub use supervisor::TaskSupervisor;
pub use task::{SynthesisTask, TaskHandle};
