//! Background follow-up tasks and the notification seam.
//!
//! - [`job_tracker`]: in-memory progress logs for ingestion follow-up
//! - [`notifier`]: voice/SMS responder notification behind a trait
//! - [`followup`]: localization, tiling and plan generation for one notice

pub mod followup;
pub mod job_tracker;
pub mod notifier;

pub use job_tracker::{FollowupJob, JobStatus, JobTracker, LogEntry, LogLevel};
pub use notifier::{LogNotifier, Notifier, RecordingNotifier};
