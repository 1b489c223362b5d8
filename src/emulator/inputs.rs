use serde::{Deserialize, Serialize};

use super::EmulatorError;
use crate::lut::band_table::NDIM;

/// Largest solar zenith angle [degrees] an observation may have.
pub const MAX_SOLAR_ZENITH: f64 = 90.0;

/// Physical state of one observation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PhysicalInputs {
    /// Solar zenith angle [degrees]
    #[serde(rename = "solar_z")]
    pub solar_zenith: f64,
    /// Water vapour column [g/cm^2]
    #[serde(rename = "h2o")]
    pub water_vapor: f64,
    /// Ozone column [cm-atm]
    #[serde(rename = "o3")]
    pub ozone: f64,
    /// Aerosol optical thickness at 550 nm
    pub aot: f64,
    /// Target altitude [km], negative below sea level
    #[serde(rename = "alt")]
    pub altitude: f64,
    #[serde(rename = "doy")]
    pub day_of_year: f64,
}

impl PhysicalInputs {
    pub fn new(
        solar_zenith: f64,
        water_vapor: f64,
        ozone: f64,
        aot: f64,
        altitude: f64,
        day_of_year: f64,
    ) -> Self {
        Self {
            solar_zenith,
            water_vapor,
            ozone,
            aot,
            altitude,
            day_of_year,
        }
    }

    /// Rejects non-finite values, negative atmospheric quantities and a sun
    /// below the horizon.
    ///
    /// The zenith bound holds under every domain policy: the radiance
    /// conversion uses the raw angle, and `cos(θs)` turns negative past 90°.
    /// Range checks against the table grid happen at interpolation time.
    pub fn validate(&self) -> Result<(), EmulatorError> {
        let non_negative = 0.0..=f64::INFINITY;
        let fields = [
            ("solar_z", self.solar_zenith, Some(0.0..=MAX_SOLAR_ZENITH)),
            ("h2o", self.water_vapor, Some(non_negative.clone())),
            ("o3", self.ozone, Some(non_negative.clone())),
            ("aot", self.aot, Some(non_negative)),
            ("alt", self.altitude, None),
            ("doy", self.day_of_year, None),
        ];

        for (field, value, range) in fields {
            if !value.is_finite() || !range.is_none_or(|r| r.contains(&value)) {
                return Err(EmulatorError::InvalidInput { field, value });
            }
        }
        Ok(())
    }

    /// Coordinates in table axis order.
    pub fn table_point(&self) -> [f64; NDIM] {
        [
            self.solar_zenith,
            self.water_vapor,
            self.ozone,
            self.aot,
            self.altitude,
        ]
    }
}
