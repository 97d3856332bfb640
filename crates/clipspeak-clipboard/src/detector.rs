//! Change detection over successive clipboard polls.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Remembers a fingerprint of the last text seen.
///
/// The first observation only primes the detector, so whatever is on the
/// clipboard when watching starts is not reported. Polls that found no text
/// are ignored and keep the previous fingerprint.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last: Option<u64>,
    primed: bool,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one poll result. Returns `true` if it differs from the last text.
    pub fn observe(&mut self, content: Option<&str>) -> bool {
        let Some(content) = content else {
            self.primed = true;
            return false;
        };

        let fingerprint = fingerprint(content);
        let changed = self.primed && self.last != Some(fingerprint);
        self.last = Some(fingerprint);
        self.primed = true;
        changed
    }
}

fn fingerprint(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}
