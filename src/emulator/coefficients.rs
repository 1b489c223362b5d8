use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Linear correction for one band: `surface = (radiance - a) / b`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coefficients {
    pub a: f64,
    pub b: f64,
}

impl Coefficients {
    pub fn apply(&self, radiance: f64) -> f64 {
        (radiance - self.a) / self.b
    }

    pub fn is_usable(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.b != 0.0
    }
}

/// Band id -> (a, b) for one observation, sorted by band id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CorrectionCoefficients {
    bands: BTreeMap<String, Coefficients>,
}

impl CorrectionCoefficients {
    pub fn insert(&mut self, band: impl Into<String>, coefficients: Coefficients) {
        self.bands.insert(band.into(), coefficients);
    }

    pub fn get(&self, band: &str) -> Option<&Coefficients> {
        self.bands.get(band)
    }

    pub fn bands(&self) -> impl Iterator<Item = &str> {
        self.bands.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Coefficients)> {
        self.bands.iter().map(|(band, c)| (band.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

impl FromIterator<(String, Coefficients)> for CorrectionCoefficients {
    fn from_iter<I: IntoIterator<Item = (String, Coefficients)>>(iter: I) -> Self {
        Self {
            bands: iter.into_iter().collect(),
        }
    }
}
