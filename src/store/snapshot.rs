//! Whole-collection JSON snapshot on disk.
//!
//! Every save replaces the previous snapshot. Writes go to a sibling temp
//! file first and are renamed into place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::files;
use crate::models::Plant;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("snapshot at {path} is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. A missing file is an empty collection.
    pub fn load(&self) -> Result<Vec<Plant>, SnapshotError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SnapshotError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&data).map_err(|source| SnapshotError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, plants: &[Plant]) -> Result<(), SnapshotError> {
        let data = serde_json::to_vec_pretty(plants)?;
        files::write_atomic(&self.path, &data).map_err(|source| self.io_err(source))?;

        tracing::debug!(path = %self.path.display(), plants = plants.len(), "snapshot saved");
        Ok(())
    }

    /// Copy an unreadable snapshot to `<path>.bak` so the next save cannot
    /// destroy it.
    pub fn back_up(&self) -> Result<PathBuf, SnapshotError> {
        files::back_up(&self.path).map_err(|source| self.io_err(source))
    }

    fn io_err(&self, source: io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreatePlantInput, Room, WateringDays};
    use tempfile::TempDir;

    fn sample() -> Vec<Plant> {
        let mut watered = Plant::new(CreatePlantInput {
            room: Room::Kitchen,
            watering_days: WateringDays::OnceWeek,
            ..CreatePlantInput::named("Basil")
        });
        watered.is_watered = true;
        watered.last_watered_at = Some("2026-04-01T07:15:30.123456789Z".parse().unwrap());

        vec![watered, Plant::new(CreatePlantInput::named("Pothos"))]
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("plants.json"));
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_returns_equal_collection() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("nested/plants.json"));
        let plants = sample();

        file.save(&plants).unwrap();
        assert_eq!(file.load().unwrap(), plants);
    }

    #[test]
    fn save_replaces_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("plants.json"));

        file.save(&sample()).unwrap();
        file.save(&[]).unwrap();
        assert!(file.load().unwrap().is_empty());
        assert!(!dir.path().join("plants.json.tmp").exists());
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plants.json");
        fs::write(&path, "{not json").unwrap();

        let file = SnapshotFile::new(&path);
        assert!(matches!(file.load(), Err(SnapshotError::Corrupt { .. })));

        let backup = file.back_up().unwrap();
        assert_eq!(fs::read_to_string(backup).unwrap(), "{not json");
    }
}
