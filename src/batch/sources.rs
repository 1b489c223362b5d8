//! Interfaces of the external data providers an observation is built from.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::correction::BandImages;
use crate::emulator::PhysicalInputs;
use crate::mission::Mission;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct SourceError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Place {
    pub longitude: f64,
    pub latitude: f64,
}

impl Place {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, String> {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err("Longitude values must be between -180 and 180".to_string());
        }

        if !(-90.0..=90.0).contains(&latitude) {
            return Err("Latitude values must be between -90 and 90".to_string());
        }

        Ok(Place {
            longitude,
            latitude,
        })
    }
}

/// Atmospheric state and solar geometry for a place and time.
pub trait AtmosphereSource {
    fn physical_inputs(
        &self,
        place: Place,
        time: NaiveDateTime,
    ) -> Result<PhysicalInputs, SourceError>;
}

/// TOA reflectance pixels and band irradiance of the imaged scene.
pub trait ImagerySource {
    fn raw_pixels(
        &self,
        place: Place,
        time: NaiveDateTime,
        mission: Mission,
    ) -> Result<BandImages, SourceError>;

    fn solar_irradiance(&self, mission: Mission) -> BTreeMap<String, f64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{Observation, ObservationError};
    use crate::solar;

    struct ClimatologyAtmosphere;

    impl AtmosphereSource for ClimatologyAtmosphere {
        fn physical_inputs(
            &self,
            place: Place,
            time: NaiveDateTime,
        ) -> Result<PhysicalInputs, SourceError> {
            Ok(PhysicalInputs::new(
                solar::sun_zenith_angle(time, place.longitude, place.latitude),
                1.5,
                0.3,
                0.1,
                0.05,
                solar::day_of_year(time) as f64,
            ))
        }
    }

    struct OfflineImagery;

    impl ImagerySource for OfflineImagery {
        fn raw_pixels(
            &self,
            _place: Place,
            _time: NaiveDateTime,
            _mission: Mission,
        ) -> Result<BandImages, SourceError> {
            Err(SourceError("no scene cached for this date".to_string()))
        }

        fn solar_irradiance(&self, _mission: Mission) -> BTreeMap<String, f64> {
            BTreeMap::new()
        }
    }

    struct CachedImagery;

    impl ImagerySource for CachedImagery {
        fn raw_pixels(
            &self,
            _place: Place,
            _time: NaiveDateTime,
            mission: Mission,
        ) -> Result<BandImages, SourceError> {
            match mission {
                Mission::Sentinel2A => Ok(BandImages::from([("B4".to_string(), vec![800.0])])),
                Mission::Sentinel2B => Err(SourceError("no S2B scene cached".to_string())),
            }
        }

        fn solar_irradiance(&self, _mission: Mission) -> BTreeMap<String, f64> {
            BTreeMap::from([("B4".to_string(), 1512.79)])
        }
    }

    fn time() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2017-06-12 21:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_place_bounds() {
        assert!(Place::new(-157.816222, 21.297481).is_ok());
        assert!(Place::new(-200.0, 0.0).is_err());
        assert!(Place::new(0.0, 91.0).is_err());
    }

    #[test]
    fn test_gather_observation() {
        let place = Place::new(-157.816222, 21.297481).unwrap();
        let obs = Observation::gather(
            "honolulu",
            place,
            time(),
            Mission::Sentinel2A,
            &ClimatologyAtmosphere,
            &CachedImagery,
        )
        .unwrap();
        assert_eq!(obs.inputs.day_of_year, 163.0);
        assert_eq!(obs.toa.len(), 1);
        assert_eq!(obs.solar_irradiance["B4"], 1512.79);
    }

    #[test]
    fn test_gather_reports_source_failure() {
        let place = Place::new(-157.816222, 21.297481).unwrap();
        let err = Observation::gather(
            "honolulu",
            place,
            time(),
            Mission::Sentinel2A,
            &ClimatologyAtmosphere,
            &OfflineImagery,
        )
        .unwrap_err();
        assert!(matches!(err, ObservationError::Source { ref id, .. } if id == "honolulu"));
    }
}
