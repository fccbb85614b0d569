//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::db::services::EventService;
use crate::gcn::Pipeline;
use crate::tasks::JobTracker;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn FullRepository>,
    /// Ingestion entry point backing `POST /v1/notices`.
    pub pipeline: Arc<Pipeline>,
    /// Follow-up job tracker, shared with the pipeline.
    pub job_tracker: JobTracker,
    pub service: EventService,
}

impl AppState {
    pub fn new(repository: Arc<dyn FullRepository>, pipeline: Arc<Pipeline>) -> Self {
        let job_tracker = pipeline.tracker().clone();
        let service = EventService::new(repository.clone());
        Self {
            repository,
            pipeline,
            job_tracker,
            service,
        }
    }
}
