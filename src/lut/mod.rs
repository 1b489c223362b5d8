//! Interpolated lookup tables (iLUTs) of 6S correction coefficients.
//!
//! Each spectral band has one table sampled over solar zenith, water vapour,
//! ozone, aerosol optical thickness and target altitude. Tables are produced
//! offline by running 6S over the grid and are loaded read-only here.

pub mod band_table;
pub mod error;
pub mod grid;
pub mod layout;
pub mod store;

pub use band_table::{BandTable, CoefficientPair};
pub use error::{LutError, StoreError, TableLoadError};
pub use grid::{Axis, AxisKind, DomainPolicy};
pub use layout::TableLayout;
pub use store::{LoadReport, TableLoadFailure, TableStore, load_tables};
