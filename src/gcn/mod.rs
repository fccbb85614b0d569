//! GCN notice ingestion.
//!
//! This module owns the path from a raw VOEvent XML payload to database rows
//! and dispatched follow-up:
//!
//! - [`voevent`]: read-only VOEvent document accessors
//! - [`notice_types`]: the GCN packet-type registry subset we handle
//! - [`classify`]: classification tag derivation
//! - [`handler`]: the `handle` ingestion entry point ([`Pipeline`])
//! - [`listen`]: VOEvent Transport Protocol client

pub mod classify;
pub mod handler;
pub mod listen;
pub mod notice_types;
pub mod voevent;

pub use handler::{IngestOutcome, Pipeline};
pub use listen::GcnListener;
pub use notice_types::NoticeType;
pub use voevent::VoEvent;
