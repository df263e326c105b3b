use std::sync::Arc;

use crate::assignment::AssignmentResolver;
use crate::position::PositionStore;
use crate::tracking::{IngestService, LookupConfig, LookupService};

/// Shared handler state.
pub struct AppState<R> {
    pub ingest: IngestService,
    pub lookup: LookupService<R>,
    pub store: Arc<PositionStore>,
    /// Upper bound on drivers returned by a nearby query.
    pub nearby_limit: usize,
}

impl<R: AssignmentResolver> AppState<R> {
    pub fn new(
        store: Arc<PositionStore>,
        resolver: R,
        lookup_config: LookupConfig,
        nearby_limit: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            ingest: IngestService::new(Arc::clone(&store)),
            lookup: LookupService::new(resolver, Arc::clone(&store), lookup_config),
            store,
            nearby_limit: nearby_limit.max(1),
        })
    }
}
