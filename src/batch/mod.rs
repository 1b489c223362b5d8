//! Batch processing of many observations against one table store.

pub mod observation;
pub mod report;
pub mod runner;
pub mod sources;

pub use observation::{
    Observation, ObservationError, ObservationRecord, ObservationSet, RejectedRecord,
    read_observations,
};
pub use report::{BatchReport, BatchSummary, ObservationOutcome};
pub use runner::{BatchRunner, CancelToken};
pub use sources::{AtmosphereSource, ImagerySource, Place, SourceError};
