use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Satellite sensor a table set was generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Mission {
    #[serde(rename = "S2A_MSI")]
    Sentinel2A,
    #[serde(rename = "S2B_MSI")]
    Sentinel2B,
}

// 6S numbers the Sentinel-2 MSI wavebands sequentially, so B8A is "09" and
// everything after it shifts by one.
const SENTINEL2_BANDS: &[(&str, &str)] = &[
    ("01", "B1"),
    ("02", "B2"),
    ("03", "B3"),
    ("04", "B4"),
    ("05", "B5"),
    ("06", "B6"),
    ("07", "B7"),
    ("08", "B8"),
    ("09", "B8A"),
    ("10", "B9"),
    ("11", "B10"),
    ("12", "B11"),
    ("13", "B12"),
];

impl Mission {
    /// Directory name used for this sensor in a table set.
    pub fn sensor_directory(&self) -> &'static str {
        match self {
            Mission::Sentinel2A => "S2A_MSI",
            Mission::Sentinel2B => "S2B_MSI",
        }
    }

    /// Image collection the sensor's scenes are served from.
    pub fn collection(&self) -> &'static str {
        match self {
            Mission::Sentinel2A | Mission::Sentinel2B => "COPERNICUS/S2",
        }
    }

    fn band_codes(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Mission::Sentinel2A | Mission::Sentinel2B => SENTINEL2_BANDS,
        }
    }

    /// Translates a two-digit 6S band code into the mission's band name.
    pub fn band_name(&self, code: &str) -> Option<&'static str> {
        self.band_codes()
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| *name)
    }

    /// All band names the mission defines, in 6S code order.
    pub fn band_names(&self) -> Vec<&'static str> {
        self.band_codes().iter().map(|(_, name)| *name).collect()
    }

    pub fn from_sensor_directory(name: &str) -> Option<Self> {
        [Mission::Sentinel2A, Mission::Sentinel2B]
            .into_iter()
            .find(|m| m.sensor_directory() == name)
    }
}

impl Display for Mission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mission::Sentinel2A => write!(f, "Sentinel-2A MSI"),
            Mission::Sentinel2B => write!(f, "Sentinel-2B MSI"),
        }
    }
}

/// 6S aerosol model the tables were generated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum AerosolProfile {
    NoAerosols,
    Continental,
    Maritime,
    Urban,
    Desert,
    BiomassBurning,
    Stratospheric,
}

impl AerosolProfile {
    pub const ALL: [AerosolProfile; 7] = [
        AerosolProfile::NoAerosols,
        AerosolProfile::Continental,
        AerosolProfile::Maritime,
        AerosolProfile::Urban,
        AerosolProfile::Desert,
        AerosolProfile::BiomassBurning,
        AerosolProfile::Stratospheric,
    ];

    pub fn directory(&self) -> &'static str {
        match self {
            AerosolProfile::NoAerosols => "NoAerosols",
            AerosolProfile::Continental => "Continental",
            AerosolProfile::Maritime => "Maritime",
            AerosolProfile::Urban => "Urban",
            AerosolProfile::Desert => "Desert",
            AerosolProfile::BiomassBurning => "BiomassBurning",
            AerosolProfile::Stratospheric => "Stratospheric",
        }
    }

    pub fn from_directory(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.directory() == name)
    }
}

impl Display for AerosolProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.directory())
    }
}
