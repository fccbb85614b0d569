use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gcn::NoticeType;

/// A single ingested GCN notice.
///
/// One row per payload: the ivorn is globally unique, so re-delivering the
/// same notice is a no-op. The `dateobs` here keeps the full sub-second
/// precision from the notice; the owning event's key is the rounded value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcnNotice {
    /// IVOA Resource Name uniquely identifying this notice.
    pub ivorn: String,
    /// GCN packet type.
    pub notice_type: NoticeType,
    /// Source stream, e.g. `Fermi`, `AMON`, `LVC`.
    pub stream: String,
    /// Notice creation date from the `Who` section.
    pub date: DateTime<Utc>,
    /// Observation time of the underlying astrophysical event (un-rounded).
    pub dateobs: DateTime<Utc>,
    /// Raw XML payload as delivered.
    #[serde(with = "serde_bytes_vec")]
    pub content: Vec<u8>,
}

impl GcnNotice {
    /// Event key this notice belongs to.
    pub fn event_dateobs(&self) -> DateTime<Utc> {
        super::time::round_to_second(self.dateobs)
    }
}

/// Serialize raw payloads as base64-free byte arrays in JSON contexts.
/// Diesel stores them as `bytea` directly.
mod serde_bytes_vec {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        Vec::<u8>::deserialize(deserializer)
    }
}
