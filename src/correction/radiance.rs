use std::collections::BTreeMap;
use std::f64::consts::PI;

use super::{BandImages, SkipReason, SkippedBand};
use crate::solar::earth_sun_distance;

/// Integer scaling of stored TOA reflectance (Sentinel-2 L1C: 10000 = 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectanceScale(f64);

impl ReflectanceScale {
    pub const SENTINEL2: ReflectanceScale = ReflectanceScale(10000.0);

    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for ReflectanceScale {
    fn default() -> Self {
        Self::SENTINEL2
    }
}

/// Factor converting unit TOA reflectance to at-sensor radiance.
///
/// `solar_zenith` is in degrees.
pub fn radiance_multiplier(solar_irradiance: f64, solar_zenith: f64, day_of_year: f64) -> f64 {
    let distance = earth_sun_distance(day_of_year);
    solar_irradiance * solar_zenith.to_radians().cos() / (PI * distance * distance)
}

/// At-sensor radiance per band, with the bands that had no irradiance.
#[derive(Debug, Default)]
pub struct RadianceImage {
    pub bands: BandImages,
    pub skipped: Vec<SkippedBand>,
}

/// Converts scaled TOA reflectance to at-sensor radiance, band by band.
pub fn radiance_from_toa(
    toa: &BandImages,
    solar_irradiance: &BTreeMap<String, f64>,
    solar_zenith: f64,
    day_of_year: f64,
    scale: ReflectanceScale,
) -> RadianceImage {
    toa.iter()
        .fold(RadianceImage::default(), |mut image, (band, pixels)| {
            match solar_irradiance.get(band) {
                Some(&irradiance) => {
                    let multiplier = radiance_multiplier(irradiance, solar_zenith, day_of_year);
                    let radiance = pixels
                        .iter()
                        .map(|value| value / scale.value() * multiplier)
                        .collect();
                    image.bands.insert(band.clone(), radiance);
                }
                None => image.skipped.push(SkippedBand {
                    band: band.clone(),
                    reason: SkipReason::MissingIrradiance,
                }),
            }
            image
        })
}
