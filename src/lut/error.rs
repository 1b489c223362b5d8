use std::path::PathBuf;
use thiserror::Error;

use super::grid::AxisKind;

/// Errors raised while querying or building a single band table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LutError {
    #[error("{axis} = {value} is outside the table domain [{min}, {max}]")]
    OutOfDomain {
        axis: AxisKind,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{axis} = {value} is not a valid coordinate")]
    InvalidCoordinate { axis: AxisKind, value: f64 },
    #[error("axis {axis} must have strictly increasing, finite nodes")]
    InvalidAxis { axis: AxisKind },
    #[error("table holds {actual} nodes, grid expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
}

/// Why one band's table file could not be added to the store.
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed table file: {0}")]
    Format(String),
    #[error(transparent)]
    Table(#[from] LutError),
    #[error("band code {code:?} has no mapping for {mission}")]
    UnknownBandCode { code: String, mission: String },
    #[error("band {band} already loaded from another file")]
    DuplicateBand { band: String },
}

/// Fatal errors for a whole store load.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table directory {0} does not exist")]
    DirectoryNotFound(PathBuf),
    #[error("invalid table file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
