//! Atmospheric correction of Sentinel-2 imagery with a 6S emulator.
//!
//! Interpolated look-up tables (iLUTs) replace the 6S radiative transfer
//! code: each band table maps solar zenith, water vapour, ozone, aerosol
//! optical thickness and altitude to the coefficients `a` and `b` of
//! `L = a + b * ρ`, which turn at-sensor radiance into surface reflectance.

pub mod batch;
pub mod config;
pub mod correction;
pub mod emulator;
pub mod lut;
pub mod mission;
pub mod solar;

pub use config::{Config, ConfigError};
pub use correction::{CorrectedImage, ReflectanceScale};
pub use emulator::{Coefficients, CorrectionCoefficients, Emulator, EmulatorError, PhysicalInputs};
pub use lut::{DomainPolicy, TableLayout, TableStore};
pub use mission::{AerosolProfile, Mission};
