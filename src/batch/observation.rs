use chrono::NaiveDateTime;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

use super::sources::{AtmosphereSource, ImagerySource, Place, SourceError};
use crate::correction::BandImages;
use crate::emulator::PhysicalInputs;
use crate::mission::Mission;
use crate::solar;

#[derive(Debug, Error)]
pub enum ObservationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse observations: {0}")]
    Json(#[from] serde_json::Error),
    #[error("observation {id}: {reason}")]
    InvalidRecord { id: String, reason: String },
    #[error("observation {id}: {source}")]
    Source {
        id: String,
        #[source]
        source: SourceError,
    },
}

/// Everything needed to correct one scene at one place.
#[derive(Debug, Clone)]
pub struct Observation {
    pub id: String,
    pub place: Place,
    pub time: NaiveDateTime,
    pub inputs: PhysicalInputs,
    pub toa: BandImages,
    pub solar_irradiance: BTreeMap<String, f64>,
}

/// Observation as written in an observations file.
///
/// `solar_z` and `doy` may be left out, in which case they are derived from
/// `datetime` and the position.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationRecord {
    pub id: String,
    pub datetime: NaiveDateTime,
    pub longitude: f64,
    pub latitude: f64,
    pub solar_z: Option<f64>,
    pub doy: Option<f64>,
    pub h2o: f64,
    pub o3: f64,
    pub aot: f64,
    pub alt: f64,
    pub toa: BandImages,
    pub solar_irradiance: BTreeMap<String, f64>,
}

impl TryFrom<ObservationRecord> for Observation {
    type Error = ObservationError;

    fn try_from(record: ObservationRecord) -> Result<Self, Self::Error> {
        let place = Place::new(record.longitude, record.latitude).map_err(|reason| {
            ObservationError::InvalidRecord {
                id: record.id.clone(),
                reason,
            }
        })?;

        let solar_zenith = record.solar_z.unwrap_or_else(|| {
            solar::sun_zenith_angle(record.datetime, place.longitude, place.latitude)
        });
        let day_of_year = record
            .doy
            .unwrap_or_else(|| solar::day_of_year(record.datetime) as f64);

        Ok(Observation {
            id: record.id,
            place,
            time: record.datetime,
            inputs: PhysicalInputs::new(
                solar_zenith,
                record.h2o,
                record.o3,
                record.aot,
                record.alt,
                day_of_year,
            ),
            toa: record.toa,
            solar_irradiance: record.solar_irradiance,
        })
    }
}

impl Observation {
    /// Assembles an observation from the external data providers.
    pub fn gather<A, I>(
        id: impl Into<String>,
        place: Place,
        time: NaiveDateTime,
        mission: Mission,
        atmosphere: &A,
        imagery: &I,
    ) -> Result<Self, ObservationError>
    where
        A: AtmosphereSource + ?Sized,
        I: ImagerySource + ?Sized,
    {
        let id = id.into();
        let wrap = |source| ObservationError::Source {
            id: id.clone(),
            source,
        };

        let inputs = atmosphere.physical_inputs(place, time).map_err(wrap)?;
        let toa = imagery.raw_pixels(place, time, mission).map_err(wrap)?;
        let solar_irradiance = imagery.solar_irradiance(mission);

        Ok(Self {
            id,
            place,
            time,
            inputs,
            toa,
            solar_irradiance,
        })
    }
}

/// A record from an observations file that could not be used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub id: String,
    pub error: String,
}

/// Contents of an observations file: the usable observations, in file
/// order, and the records that were rejected.
#[derive(Debug, Default)]
pub struct ObservationSet {
    pub observations: Vec<Observation>,
    pub rejected: Vec<RejectedRecord>,
}

impl ObservationSet {
    pub fn len(&self) -> usize {
        self.observations.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads a JSON array of [`ObservationRecord`]s.
///
/// Only an unreadable file or a document that is not a JSON array fails the
/// read. A malformed or invalid record is rejected on its own; records
/// without an `id` are named by their position, `#<index>`.
pub fn read_observations<P: AsRef<Path>>(path: P) -> Result<ObservationSet, ObservationError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let values: Vec<Value> = serde_json::from_reader(reader)?;

    let set = values
        .into_iter()
        .enumerate()
        .fold(ObservationSet::default(), |mut set, (index, value)| {
            let id = value
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", index));

            let observation = ObservationRecord::deserialize(value)
                .map_err(ObservationError::from)
                .and_then(Observation::try_from);

            match observation {
                Ok(observation) => set.observations.push(observation),
                Err(error) => {
                    warn!("Observation record {} rejected: {}", id, error);
                    set.rejected.push(RejectedRecord {
                        id,
                        error: error.to_string(),
                    });
                }
            }
            set
        });

    Ok(set)
}
