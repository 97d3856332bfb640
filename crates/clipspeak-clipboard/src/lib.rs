#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

mod detector;
pub mod error;
mod source;
mod thread;

pub use detector::ChangeDetector;
pub use error::ClipboardError;
pub use source::ClipboardSource;
pub use thread::ClipboardThreadHandle;
