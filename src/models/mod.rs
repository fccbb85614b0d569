//! Domain types for the alert pipeline.
//!
//! Events are keyed by their UTC observation timestamp (`dateobs`), rounded to
//! the nearest second. Notices, localizations and plans all hang off that key.

pub mod event;
pub mod localization;
pub mod notice;
pub mod plan;
pub mod telescope;
pub mod time;

pub use event::Event;
pub use localization::Localization;
pub use notice::GcnNotice;
pub use plan::{Plan, PlanStatus, PlannedObservation};
pub use telescope::{Field, Telescope};
pub use time::{parse_isotime, round_to_second};
