use std::fmt::Display;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::mission::{AerosolProfile, Mission};

const VIEW_ZENITH_PREFIX: &str = "view_zenith_";

/// Location of one table set under a table root:
/// `<root>/<sensor>/<aerosol profile>/view_zenith_<degrees>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableLayout {
    pub mission: Mission,
    pub aerosol_profile: AerosolProfile,
    pub view_zenith: u32,
}

impl TableLayout {
    pub fn new(mission: Mission, aerosol_profile: AerosolProfile, view_zenith: u32) -> Self {
        Self {
            mission,
            aerosol_profile,
            view_zenith,
        }
    }

    pub fn directory<P: AsRef<Path>>(&self, root: P) -> PathBuf {
        root.as_ref()
            .join(self.mission.sensor_directory())
            .join(self.aerosol_profile.directory())
            .join(format!("{}{}", VIEW_ZENITH_PREFIX, self.view_zenith))
    }

    /// Lists every table set found under `root`, sorted.
    ///
    /// Directories whose names do not follow the layout are ignored.
    pub fn discover<P: AsRef<Path>>(root: P) -> Vec<TableLayout> {
        let root = root.as_ref();
        let mut layouts: Vec<TableLayout> = WalkDir::new(root)
            .min_depth(3)
            .max_depth(3)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_dir())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(root).ok()?;
                let mut parts = relative.iter().map(|p| p.to_string_lossy());
                let mission = Mission::from_sensor_directory(&parts.next()?)?;
                let profile = AerosolProfile::from_directory(&parts.next()?)?;
                let view_zenith = parts
                    .next()?
                    .strip_prefix(VIEW_ZENITH_PREFIX)?
                    .parse::<u32>()
                    .ok()?;
                Some(TableLayout::new(mission, profile, view_zenith))
            })
            .collect();

        layouts.sort_by_key(|l| {
            (
                l.mission.sensor_directory(),
                l.aerosol_profile.directory(),
                l.view_zenith,
            )
        });
        layouts
    }
}

impl Display for TableLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {} / view zenith {}°",
            self.mission, self.aerosol_profile, self.view_zenith
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_directory_layout() {
        let layout = TableLayout::new(Mission::Sentinel2A, AerosolProfile::Continental, 0);
        assert_eq!(
            layout.directory("files/iLUTs"),
            PathBuf::from("files/iLUTs/S2A_MSI/Continental/view_zenith_0")
        );
    }

    #[test]
    fn test_discover_table_sets() {
        let dir = tempdir().unwrap();
        let wanted = [
            TableLayout::new(Mission::Sentinel2A, AerosolProfile::Continental, 0),
            TableLayout::new(Mission::Sentinel2A, AerosolProfile::Maritime, 10),
            TableLayout::new(Mission::Sentinel2B, AerosolProfile::Continental, 0),
        ];
        for layout in &wanted {
            std::fs::create_dir_all(layout.directory(dir.path())).unwrap();
        }
        // Not part of the layout
        std::fs::create_dir_all(dir.path().join("S2A_MSI/Volcanic/view_zenith_0")).unwrap();
        std::fs::create_dir_all(dir.path().join("S2A_MSI/Urban/nadir")).unwrap();
        std::fs::create_dir_all(dir.path().join("LC08_OLI/Urban/view_zenith_0")).unwrap();

        assert_eq!(TableLayout::discover(dir.path()), wanted.to_vec());
    }
}
