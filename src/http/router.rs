//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing) and
//! returns an axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS for development; restrict in production deployments.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Event model
        .route("/events", get(handlers::list_events))
        .route("/events/{dateobs}", get(handlers::get_event))
        .route("/events/{dateobs}/notices", get(handlers::list_notices))
        .route(
            "/events/{dateobs}/localizations",
            get(handlers::list_localizations),
        )
        .route("/events/{dateobs}/plans", get(handlers::list_plans))
        .route(
            "/events/{dateobs}/plans/{telescope}/{plan_name}",
            get(handlers::get_plan),
        )
        // Ingestion
        .route("/notices", post(handlers::ingest_notice))
        // Follow-up jobs
        .route("/jobs/{job_id}", get(handlers::get_job_status))
        .route("/jobs/{job_id}/logs", get(handlers::stream_job_logs));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Notices are small; a 1 MiB cap matches the VTP frame limit.
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::PipelineConfig;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::FullRepository;
    use crate::gcn::Pipeline;
    use crate::tasks::LogNotifier;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
        let pipeline = Arc::new(
            Pipeline::new(
                repo.clone(),
                Arc::new(LogNotifier),
                &PipelineConfig::default(),
            )
            .unwrap(),
        );
        let _router = create_router(AppState::new(repo, pipeline));
    }
}
