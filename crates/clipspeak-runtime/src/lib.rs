#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unsafe_code)]

pub mod piper;
pub mod process;
pub mod speech;

pub use piper::{BootstrapError, InstallOutcome, ensure_piper_installed, read_model_sample_rate};
pub use process::{ProcessPipe, RunningPipe, StreamTransfer, shutdown_child};
pub use speech::{
    ChangeDispatchLoop, DispatchStats, SynthesisTask, TaskHandle, TaskSupervisor, speech_pipe,
};
