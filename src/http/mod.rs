//! Axum-based REST API (feature `http-server`).
//!
//! Read endpoints serve the event model; `POST /v1/notices` feeds payloads
//! into the same ingestion pipeline the GCN listener uses, which makes the
//! whole chain testable without a broker connection.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::AppError;
pub use router::create_router;
pub use state::AppState;
