//! # ToO Alert Pipeline
//!
//! Ingestion backend for Gamma-ray Coordinates Network (GCN) alerts and
//! Target-of-Opportunity follow-up.
//!
//! This crate receives VOEvent XML notices describing transient astrophysical
//! events (gamma-ray bursts, neutrino alerts), persists them into a relational
//! event model, classifies each event, and triggers downstream follow-up:
//! sky-localization construction and contouring, telescope tiling, observation
//! plan generation, and responder notification (voice call / SMS).
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types (events, notices, localizations, plans, telescopes)
//! - [`gcn`]: VOEvent parsing, notice classification, the ingestion entry point,
//!   and the VOEvent Transport Protocol listener
//! - [`skymaps`]: Probability sky maps and credible-region contours
//! - [`tiles`]: Telescope field grids and localization tiling
//! - [`plans`]: Observation plan generation
//! - [`tasks`]: Follow-up dispatch and the notification seam
//! - [`db`]: Repository pattern and persistence layer
//! - [`http`]: Axum-based REST API (feature `http-server`)

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod gcn;
pub mod models;
pub mod plans;
pub mod skymaps;
pub mod tasks;
pub mod tiles;

#[cfg(feature = "http-server")]
pub mod http;
