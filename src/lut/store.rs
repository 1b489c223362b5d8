use log::{info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::band_table::BandTable;
use super::error::{StoreError, TableLoadError};
use super::layout::TableLayout;
use crate::mission::Mission;

pub const TABLE_EXTENSION: &str = "ilut";

/// A table file that could not be added to the store.
#[derive(Debug)]
pub struct TableLoadFailure {
    pub path: PathBuf,
    pub error: TableLoadError,
}

/// Outcome of a store load, per file.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub failures: Vec<TableLoadFailure>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Read-only collection of band tables for one mission configuration.
#[derive(Debug)]
pub struct TableStore {
    mission: Mission,
    tables: BTreeMap<String, BandTable>,
    report: LoadReport,
}

/// Extracts the two-character band code from a table file name
/// (`S2A_MSI_09.ilut` -> `09`).
fn band_code(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = name.split('.').next()?;
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() < 2 {
        return None;
    }
    Some(chars[chars.len() - 2..].iter().collect())
}

/// Splits a directory listing into sorted table files and the entries that
/// could not be examined.
fn candidate_files<I>(entries: I) -> (Vec<PathBuf>, Vec<TableLoadFailure>)
where
    I: IntoIterator<Item = Result<PathBuf, (PathBuf, std::io::Error)>>,
{
    let (mut paths, failures) = entries.into_iter().fold(
        (Vec::new(), Vec::new()),
        |(mut paths, mut failures), entry| {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err((path, error)) => {
                    warn!("Cannot read table entry {}: {}", path.display(), error);
                    failures.push(TableLoadFailure {
                        path,
                        error: TableLoadError::Io(error),
                    });
                }
            }
            (paths, failures)
        },
    );
    paths.sort();
    (paths, failures)
}

impl TableStore {
    /// Loads every `*.ilut` file in `dir` for `mission`.
    ///
    /// Files that fail to load are recorded in [`TableStore::report`] and
    /// their bands are left out; only a missing directory aborts the load.
    pub fn load<P: AsRef<Path>>(dir: P, mission: Mission) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(StoreError::DirectoryNotFound(dir.to_path_buf()));
        }

        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&dir.to_string_lossy()),
            TABLE_EXTENSION
        );
        let entries = glob::glob(&pattern)?
            .map(|entry| entry.map_err(|e| (e.path().to_path_buf(), e.into_error())));
        let (paths, failures) = candidate_files(entries);

        let mut tables = BTreeMap::new();
        let mut report = LoadReport {
            loaded: Vec::new(),
            failures,
        };

        for path in paths {
            match Self::load_band(&path, mission, &tables) {
                Ok(table) => {
                    report.loaded.push(table.band().to_string());
                    tables.insert(table.band().to_string(), table);
                }
                Err(error) => {
                    warn!("Skipping table {}: {}", path.display(), error);
                    report.failures.push(TableLoadFailure { path, error });
                }
            }
        }

        info!(
            "Loaded {} band tables for {} from {} ({} failed)",
            tables.len(),
            mission,
            dir.display(),
            report.failures.len()
        );

        Ok(Self {
            mission,
            tables,
            report,
        })
    }

    /// Loads the table set `layout` describes under `root`.
    pub fn load_layout<P: AsRef<Path>>(root: P, layout: &TableLayout) -> Result<Self, StoreError> {
        Self::load(layout.directory(root), layout.mission)
    }

    fn load_band(
        path: &Path,
        mission: Mission,
        tables: &BTreeMap<String, BandTable>,
    ) -> Result<BandTable, TableLoadError> {
        let code = band_code(path)
            .ok_or_else(|| TableLoadError::Format("file name carries no band code".to_string()))?;
        let band = mission
            .band_name(&code)
            .ok_or_else(|| TableLoadError::UnknownBandCode {
                code: code.clone(),
                mission: mission.to_string(),
            })?;

        if tables.contains_key(band) {
            return Err(TableLoadError::DuplicateBand {
                band: band.to_string(),
            });
        }

        BandTable::read_from(path, band)
    }

    /// Builds a store from tables already in memory.
    pub fn from_tables(mission: Mission, tables: impl IntoIterator<Item = BandTable>) -> Self {
        let tables: BTreeMap<String, BandTable> = tables
            .into_iter()
            .map(|t| (t.band().to_string(), t))
            .collect();
        let report = LoadReport {
            loaded: tables.keys().cloned().collect(),
            failures: Vec::new(),
        };
        Self {
            mission,
            tables,
            report,
        }
    }

    pub fn mission(&self) -> Mission {
        self.mission
    }

    /// Band ids with a usable table, sorted.
    pub fn available_bands(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    pub fn get(&self, band: &str) -> Option<&BandTable> {
        self.tables.get(band)
    }

    pub fn tables(&self) -> impl Iterator<Item = &BandTable> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

/// Loads the tables in `dir` for `mission`.
pub fn load_tables<P: AsRef<Path>>(dir: P, mission: Mission) -> Result<TableStore, StoreError> {
    TableStore::load(dir, mission)
}
