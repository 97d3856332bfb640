#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod paths;
pub mod ports;
pub mod script;
pub mod settings;
pub mod task;

// Re-export commonly used types for convenience
pub use paths::{PathError, PiperPaths, config_root, ensure_directory};
pub use ports::{ChangeEvent, ChangeSourceError, ChangeSourcePort, ChangeStream, ContentFormat};
pub use script::{FilteredText, TargetScript, UnknownScript, filter_script};
pub use settings::{SpeechSettings, StageCommand};
pub use task::{Stage, TaskError, TaskId, TaskState};

// Silence unused dev-dependency warnings; these are used by tests/
#[cfg(test)]
use tokio as _;
#[cfg(test)]
use tokio_test as _;
