//! TOA reflectance -> at-sensor radiance -> surface reflectance.
//!
//! Bands are always visited in sorted band-id order, so the band stack of
//! every output is reproducible.

use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::emulator::{CorrectionCoefficients, PhysicalInputs};

pub mod radiance;
pub mod surface;

pub use radiance::{RadianceImage, ReflectanceScale, radiance_from_toa, radiance_multiplier};
pub use surface::surface_reflectance;

/// Per-band pixel arrays keyed by band id.
pub type BandImages = BTreeMap<String, Vec<f64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingIrradiance,
    MissingCoefficients,
    DegenerateCoefficients,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingIrradiance => write!(f, "no solar irradiance"),
            SkipReason::MissingCoefficients => write!(f, "no correction coefficients"),
            SkipReason::DegenerateCoefficients => write!(f, "unusable correction coefficients"),
        }
    }
}

/// A band left out of an observation's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBand {
    pub band: String,
    pub reason: SkipReason,
}

/// Surface reflectance of one observation.
#[derive(Debug, Default, Serialize)]
pub struct CorrectedImage {
    pub bands: BandImages,
    pub skipped: Vec<SkippedBand>,
}

/// Full pipeline for one observation with precomputed coefficients.
pub fn correct(
    raw_pixels: &BandImages,
    solar_irradiance: &BTreeMap<String, f64>,
    inputs: &PhysicalInputs,
    coefficients: &CorrectionCoefficients,
    scale: ReflectanceScale,
) -> CorrectedImage {
    let radiance = radiance_from_toa(
        raw_pixels,
        solar_irradiance,
        inputs.solar_zenith,
        inputs.day_of_year,
        scale,
    );

    let mut image = surface_reflectance(&radiance.bands, coefficients);
    image.skipped.extend(radiance.skipped);
    image.skipped.sort_by(|a, b| a.band.cmp(&b.band));

    for skipped in &image.skipped {
        warn!("Band {} skipped: {}", skipped.band, skipped.reason);
    }

    image
}
