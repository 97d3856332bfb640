//! Stage process management.
//!
//! - [`command`]: building and spawning stage commands
//! - [`stream`]: stderr forwarding to `tracing`
//! - [`transfer`]: bounded synthesizer → player copy
//! - [`pipe`]: the two-stage pipeline and its cancellation
//! - [`shutdown`]: SIGTERM → SIGKILL escalation with reaping

pub mod command;
pub mod pipe;
pub mod shutdown;
pub mod stream;
pub mod transfer;

pub use pipe::{ProcessPipe, RunningPipe};
pub use shutdown::shutdown_child;
pub use transfer::StreamTransfer;
