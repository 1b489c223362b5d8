use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::correction::ReflectanceScale;
use crate::lut::{DomainPolicy, TableLayout};
use crate::mission::{AerosolProfile, Mission};

pub mod error;
pub use error::ConfigError;

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct Config {
    tables_root: PathBuf,
    layout: TableLayout,
    domain_policy: DomainPolicy,
    reflectance_scale: ReflectanceScale,
    threads: Option<usize>,
    observations: PathBuf,
    output: Option<PathBuf>,
}

// Deserializes through a helper so the numeric settings are validated while
// the file is read.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigHelper {
            tables_root: PathBuf,
            mission: Mission,
            aerosol_profile: AerosolProfile,
            #[serde(default)]
            view_zenith: u32,
            #[serde(default)]
            domain_policy: DomainPolicy,
            reflectance_scale: Option<f64>,
            threads: Option<usize>,
            observations: PathBuf,
            output: Option<PathBuf>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let reflectance_scale = match helper.reflectance_scale {
            Some(value) => ReflectanceScale::new(value)
                .ok_or_else(|| D::Error::custom(ConfigError::ReflectanceScale))?,
            None => ReflectanceScale::default(),
        };

        if helper.threads == Some(0) {
            return Err(D::Error::custom(ConfigError::Threads));
        }

        Ok(Config {
            tables_root: helper.tables_root,
            layout: TableLayout::new(helper.mission, helper.aerosol_profile, helper.view_zenith),
            domain_policy: helper.domain_policy,
            reflectance_scale,
            threads: helper.threads,
            observations: helper.observations,
            output: helper.output,
        })
    }
}

impl Config {
    pub fn new(tables_root: PathBuf, layout: TableLayout, observations: PathBuf) -> Self {
        Self {
            tables_root,
            layout,
            domain_policy: DomainPolicy::default(),
            reflectance_scale: ReflectanceScale::default(),
            threads: None,
            observations,
            output: None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn tables_root(&self) -> &Path {
        &self.tables_root
    }

    pub fn table_layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Directory holding this run's `.ilut` files.
    pub fn table_directory(&self) -> PathBuf {
        self.layout.directory(&self.tables_root)
    }

    pub fn domain_policy(&self) -> DomainPolicy {
        self.domain_policy
    }

    pub fn reflectance_scale(&self) -> ReflectanceScale {
        self.reflectance_scale
    }

    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    pub fn observations(&self) -> &Path {
        &self.observations
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}
