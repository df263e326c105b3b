//! Tracking services: the ingest write path and the lookup read path.
//!
//! Both services are thin, transport-agnostic wrappers around the
//! [`PositionStore`](crate::position::PositionStore). The HTTP layer in
//! [`crate::server`] only translates requests and errors.

mod error;
mod ingest;
mod lookup;

pub use error::TrackingError;
pub use ingest::{IngestAck, IngestService, PositionReport};
pub use lookup::{
    LookupConfig, LookupService, TrackingResult, TrackingState, DEFAULT_RESOLVE_TIMEOUT,
};
