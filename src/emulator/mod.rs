//! 6S emulator: per-band table lookups plus the elliptical orbit correction.
//!
//! The tables hold coefficients computed at perihelion, so every
//! interpolated pair is scaled by [`orbital_correction`] for the observation
//! date before it is returned.

use log::debug;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::correction::{self, BandImages, CorrectedImage, ReflectanceScale};
use crate::lut::{DomainPolicy, LutError, TableStore};
use crate::solar::orbital_correction;

pub mod coefficients;
pub mod inputs;

pub use coefficients::{Coefficients, CorrectionCoefficients};
pub use inputs::{MAX_SOLAR_ZENITH, PhysicalInputs};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmulatorError {
    #[error("invalid input {field} = {value}")]
    InvalidInput { field: &'static str, value: f64 },
    #[error("band {band}: {source}")]
    OutOfDomain {
        band: String,
        #[source]
        source: LutError,
    },
}

/// Computes correction coefficients from a shared, read-only table store.
///
/// Cheap to copy; all state is borrowed or plain configuration, so one
/// emulator can serve any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Emulator<'a> {
    store: &'a TableStore,
    policy: DomainPolicy,
    scale: ReflectanceScale,
}

impl<'a> Emulator<'a> {
    pub fn new(store: &'a TableStore) -> Self {
        Self {
            store,
            policy: DomainPolicy::default(),
            scale: ReflectanceScale::default(),
        }
    }

    pub fn with_domain_policy(mut self, policy: DomainPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_reflectance_scale(mut self, scale: ReflectanceScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn store(&self) -> &'a TableStore {
        self.store
    }

    pub fn domain_policy(&self) -> DomainPolicy {
        self.policy
    }

    pub fn reflectance_scale(&self) -> ReflectanceScale {
        self.scale
    }

    /// Correction coefficients for every band the store holds.
    ///
    /// Fails on the first band whose table does not cover `inputs`.
    pub fn run(&self, inputs: &PhysicalInputs) -> Result<CorrectionCoefficients, EmulatorError> {
        inputs.validate()?;

        let point = inputs.table_point();
        let elliptical_orbit = orbital_correction(inputs.day_of_year);

        let coefficients = self.store.tables().try_fold(
            CorrectionCoefficients::default(),
            |mut cc, table| {
                let [a, b] = table.interpolate(point, self.policy).map_err(|source| {
                    EmulatorError::OutOfDomain {
                        band: table.band().to_string(),
                        source,
                    }
                })?;
                cc.insert(
                    table.band(),
                    Coefficients {
                        a: a * elliptical_orbit,
                        b: b * elliptical_orbit,
                    },
                );
                Ok(cc)
            },
        )?;

        debug!(
            "Computed coefficients for {} bands (orbit factor {:.5})",
            coefficients.len(),
            elliptical_orbit
        );

        Ok(coefficients)
    }

    pub fn compute_coefficients(
        &self,
        inputs: &PhysicalInputs,
    ) -> Result<CorrectionCoefficients, EmulatorError> {
        self.run(inputs)
    }

    /// Surface reflectance for one observation's TOA reflectance bands.
    pub fn correct(
        &self,
        raw_pixels: &BandImages,
        irradiance: &BTreeMap<String, f64>,
        inputs: &PhysicalInputs,
    ) -> Result<CorrectedImage, EmulatorError> {
        let coefficients = self.run(inputs)?;
        Ok(correction::correct(
            raw_pixels,
            irradiance,
            inputs,
            &coefficients,
            self.scale,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::SkipReason;
    use crate::lut::band_table::tests::{affine, test_axes};
    use crate::lut::{AxisKind, BandTable};
    use crate::mission::Mission;
    use approx::assert_relative_eq;

    fn store(bands: &[&str]) -> TableStore {
        let tables = bands
            .iter()
            .map(|band| BandTable::from_fn(*band, test_axes(), affine).unwrap());
        TableStore::from_tables(Mission::Sentinel2A, tables)
    }

    fn scenario() -> PhysicalInputs {
        PhysicalInputs::new(30.0, 2.0, 0.3, 0.1, 0.1, 100.0)
    }

    #[test]
    fn test_returns_exactly_the_available_bands() {
        let store = store(&["B2", "B3", "B4"]);
        let cc = Emulator::new(&store).run(&scenario()).unwrap();

        assert_eq!(cc.bands().collect::<Vec<_>>(), vec!["B2", "B3", "B4"]);
        for (_, c) in cc.iter() {
            assert!(c.a.is_finite() && c.b.is_finite());
        }
    }

    #[test]
    fn test_applies_orbital_correction() {
        let store = store(&["B4"]);
        let inputs = scenario();
        let cc = Emulator::new(&store).run(&inputs).unwrap();

        let raw = affine(inputs.table_point());
        let factor = orbital_correction(100.0);
        let c = cc.get("B4").unwrap();
        assert_relative_eq!(c.a, raw[0] * factor, epsilon = 1e-9);
        assert_relative_eq!(c.b, raw[1] * factor, epsilon = 1e-9);

        // No scaling on the perihelion reference date
        let perihelion = PhysicalInputs {
            day_of_year: 4.0,
            ..inputs
        };
        let c = Emulator::new(&store).run(&perihelion).unwrap();
        assert_relative_eq!(c.get("B4").unwrap().a, raw[0], epsilon = 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let store = store(&["B2", "B3", "B4", "B8A"]);
        let emulator = Emulator::new(&store);
        let first = emulator.run(&scenario()).unwrap();
        let second = emulator.run(&scenario()).unwrap();
        for ((b1, c1), (b2, c2)) in first.iter().zip(second.iter()) {
            assert_eq!(b1, b2);
            assert_eq!(c1.a.to_bits(), c2.a.to_bits());
            assert_eq!(c1.b.to_bits(), c2.b.to_bits());
        }
    }

    #[test]
    fn test_out_of_domain_fails_observation() {
        let store = store(&["B2", "B3"]);
        let inputs = PhysicalInputs {
            solar_zenith: 80.0,
            ..scenario()
        };

        let err = Emulator::new(&store).run(&inputs).unwrap_err();
        match err {
            EmulatorError::OutOfDomain { band, source } => {
                assert_eq!(band, "B2");
                assert!(matches!(
                    source,
                    LutError::OutOfDomain {
                        axis: AxisKind::SolarZenith,
                        ..
                    }
                ));
            }
            other => panic!("unexpected error {other}"),
        }

        let clamped = Emulator::new(&store)
            .with_domain_policy(DomainPolicy::Clamp)
            .run(&inputs)
            .unwrap();
        assert_eq!(clamped.len(), 2);
    }

    #[test]
    fn test_invalid_input_rejected_before_lookup() {
        let store = store(&["B2"]);
        let inputs = PhysicalInputs {
            water_vapor: -1.0,
            ..scenario()
        };
        assert!(matches!(
            Emulator::new(&store).run(&inputs),
            Err(EmulatorError::InvalidInput { field: "h2o", .. })
        ));
    }

    #[test]
    fn test_clamp_does_not_admit_sun_below_horizon() {
        let store = store(&["B2"]);
        let inputs = PhysicalInputs {
            solar_zenith: 100.0,
            ..scenario()
        };
        let emulator = Emulator::new(&store).with_domain_policy(DomainPolicy::Clamp);

        assert!(matches!(
            emulator.run(&inputs),
            Err(EmulatorError::InvalidInput { field: "solar_z", .. })
        ));

        let raw = BandImages::from([("B2".to_string(), vec![1000.0])]);
        let irradiance = BTreeMap::from([("B2".to_string(), 1941.6)]);
        assert!(emulator.correct(&raw, &irradiance, &inputs).is_err());
    }

    #[test]
    fn test_concurrent_runs_share_store() {
        use rayon::prelude::*;

        let store = store(&["B2", "B3", "B4"]);
        let emulator = Emulator::new(&store);
        let expected = emulator.run(&scenario()).unwrap();

        let results: Vec<_> = (0..64)
            .into_par_iter()
            .map(|_| emulator.run(&scenario()).unwrap())
            .collect();
        assert!(results.iter().all(|cc| *cc == expected));
    }

    #[test]
    fn test_correct_recovers_surface_reflectance() {
        let store = store(&["B2", "B3", "B4"]);
        let emulator = Emulator::new(&store);
        let inputs = scenario();
        let cc = emulator.run(&inputs).unwrap();

        // Build TOA reflectance that maps to radiance a + b * rho
        let known = [0.02, 0.11, 0.35];
        let irradiance: BTreeMap<String, f64> = [("B2", 1941.6), ("B3", 1822.6), ("B4", 1512.8)]
            .into_iter()
            .map(|(b, e)| (b.to_string(), e))
            .collect();
        let multiplier = |band: &str| {
            correction::radiance_multiplier(irradiance[band], inputs.solar_zenith, inputs.day_of_year)
        };

        let mut raw = BandImages::new();
        for band in ["B2", "B3", "B4", "B9"] {
            let toa = match cc.get(band) {
                Some(c) => known
                    .iter()
                    .map(|rho| (c.a + c.b * rho) / multiplier(band) * 10000.0)
                    .collect(),
                None => vec![1200.0; 3],
            };
            raw.insert(band.to_string(), toa);
        }

        let image = emulator.correct(&raw, &irradiance, &inputs).unwrap();
        assert_eq!(image.bands.keys().collect::<Vec<_>>(), vec!["B2", "B3", "B4"]);
        for values in image.bands.values() {
            for (got, want) in values.iter().zip(known) {
                assert_relative_eq!(*got, want, epsilon = 1e-9);
            }
        }

        // B9 has neither irradiance nor a table
        assert_eq!(image.skipped.len(), 1);
        assert_eq!(image.skipped[0].band, "B9");
        assert_eq!(image.skipped[0].reason, SkipReason::MissingIrradiance);
    }
}
