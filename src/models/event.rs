use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A transient astrophysical event.
///
/// Events are keyed by `dateobs`, the UTC observation timestamp rounded to the
/// nearest second. Multiple notices about the same burst (alert, flight
/// position, ground position, final position) all resolve to one event row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// UTC observation timestamp, second resolution. Primary key.
    pub dateobs: DateTime<Utc>,
    /// Ordered classification tags, e.g. `["Fermi", "long", "GRB"]`.
    pub tags: Vec<String>,
}

impl Event {
    pub fn new(dateobs: DateTime<Utc>, tags: Vec<String>) -> Self {
        Self { dateobs, tags }
    }

    /// Merge tags from a later notice into this event.
    ///
    /// Order is preserved: existing tags keep their position and new tags are
    /// appended in the order the notice produced them. Duplicates are dropped.
    pub fn merge_tags(&mut self, incoming: &[String]) {
        for tag in incoming {
            if !self.tags.iter().any(|t| t == tag) {
                self.tags.push(tag.clone());
            }
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}]",
            self.dateobs.format("%Y-%m-%dT%H:%M:%S"),
            self.tags.join(", ")
        )
    }
}
