//! Local keyed store - JSON slot files under a per-profile data directory
//!
//! Each logical table is one slot file serialized as a whole: there is no
//! partial persistence, every save rewrites the entire blob. Absent or
//! corrupt slots read back as empty.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Exercise, Measurement, Routine};

/// Soft ceiling for one serialized table, kept under typical storage quotas.
pub const MAX_TABLE_BYTES: u64 = 4 * 1024 * 1024;

/// Profile used when none has ever been selected.
pub const DEFAULT_PROFILE: &str = "principal";

const ROUTINES_SLOT: &str = "entrenos.json";
const EXERCISES_SLOT: &str = "ejercicios.json";
const MEASUREMENTS_SLOT: &str = "medidas.json";
const PROFILE_SLOT: &str = "perfil.json";

/// Routine id (stringified) -> ordered exercises. BTreeMap keeps the
/// serialized blob stable across saves.
pub type ExerciseTable = BTreeMap<String, Vec<Exercise>>;

/// Slot-file store scoped to one profile.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open the store for a profile, creating its directory on first use.
    pub fn open(base: &Path, profile: &str) -> Result<Self> {
        let dir = base.join(profile);
        fs::create_dir_all(&dir).map_err(|e| Error::Save(e.to_string()))?;
        Ok(Self { dir })
    }

    fn slot(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Read one slot; an absent or corrupt slot yields the default value.
    fn load_slot<T: Default + DeserializeOwned>(&self, name: &str) -> T {
        let raw = match fs::read_to_string(self.slot(name)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return T::default(),
            Err(e) => {
                warn!(slot = name, error = %e, "could not read slot, treating as empty");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(slot = name, error = %e, "corrupt slot, treating as empty");
                T::default()
            }
        }
    }

    /// Serialize and write one slot, enforcing the table size ceiling.
    fn save_slot<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|e| Error::Save(e.to_string()))?;
        let size = raw.len() as u64;
        if size >= MAX_TABLE_BYTES {
            return Err(Error::SizeLimit {
                size,
                limit: MAX_TABLE_BYTES,
            });
        }
        match fs::write(self.slot(name), raw) {
            Ok(()) => {
                debug!(slot = name, bytes = size, "slot saved");
                Ok(())
            }
            // A full disk is the filesystem's version of a quota failure.
            Err(e) if matches!(e.kind(), ErrorKind::StorageFull | ErrorKind::QuotaExceeded) => {
                Err(Error::SizeLimit {
                    size,
                    limit: MAX_TABLE_BYTES,
                })
            }
            Err(e) => Err(Error::Save(e.to_string())),
        }
    }

    /// The whole exercises table; empty when nothing was ever saved.
    pub fn load(&self) -> ExerciseTable {
        self.load_slot(EXERCISES_SLOT)
    }

    /// Persist the whole exercises table as one blob.
    pub fn save(&self, table: &ExerciseTable) -> Result<()> {
        self.save_slot(EXERCISES_SLOT, table)
    }

    /// Seed the routine list on first run. Idempotent: later calls return
    /// the existing list unchanged.
    pub fn initialize(&self) -> Result<Vec<Routine>> {
        let existing: Vec<Routine> = self.load_slot(ROUTINES_SLOT);
        if !existing.is_empty() {
            return Ok(existing);
        }
        let seed = seed_routines();
        self.save_slot(ROUTINES_SLOT, &seed)?;
        Ok(seed)
    }

    /// The routine seed list as currently stored.
    pub fn routines(&self) -> Vec<Routine> {
        self.load_slot(ROUTINES_SLOT)
    }

    /// Newest-first body-measurement history.
    pub fn load_measurements(&self) -> Vec<Measurement> {
        self.load_slot(MEASUREMENTS_SLOT)
    }

    pub fn save_measurements(&self, measurements: &[Measurement]) -> Result<()> {
        self.save_slot(MEASUREMENTS_SLOT, &measurements)
    }
}

#[derive(Serialize, Deserialize)]
struct ProfileSlot {
    #[serde(rename = "activo")]
    active: String,
}

/// The profile selected on this machine, or the default.
pub fn active_profile(base: &Path) -> String {
    fs::read_to_string(base.join(PROFILE_SLOT))
        .ok()
        .and_then(|raw| serde_json::from_str::<ProfileSlot>(&raw).ok())
        .map(|slot| slot.active)
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

/// Persist the active profile choice.
pub fn set_active_profile(base: &Path, name: &str) -> Result<()> {
    fs::create_dir_all(base).map_err(|e| Error::Save(e.to_string()))?;
    let slot = ProfileSlot {
        active: name.to_string(),
    };
    let raw = serde_json::to_string(&slot).map_err(|e| Error::Save(e.to_string()))?;
    fs::write(base.join(PROFILE_SLOT), raw).map_err(|e| Error::Save(e.to_string()))
}

fn seed_routines() -> Vec<Routine> {
    vec![
        Routine {
            id: 1,
            name: "Piernas".to_string(),
            image: "img/piernas.jpg".to_string(),
            description: "Cuádriceps, femoral y gemelo".to_string(),
        },
        Routine {
            id: 2,
            name: "Push".to_string(),
            image: "img/push.jpg".to_string(),
            description: "Pecho, hombro y tríceps".to_string(),
        },
        Routine {
            id: 3,
            name: "Pull".to_string(),
            image: "img/pull.jpg".to_string(),
            description: "Espalda y bíceps".to_string(),
        },
        Routine {
            id: 4,
            name: "Glúteo".to_string(),
            image: "img/gluteo.jpg".to_string(),
            description: "Glúteo e isquios".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Record, SetEntry};
    use tempfile::TempDir;

    fn open_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path(), DEFAULT_PROFILE).unwrap();
        (dir, store)
    }

    fn exercise(id: i64, name: &str) -> Exercise {
        Exercise {
            id,
            name: name.to_string(),
            image_data: String::new(),
            records: vec![],
        }
    }

    #[test]
    fn test_initialize_seeds_four_routines() {
        let (_dir, store) = open_store();
        let routines = store.initialize().unwrap();
        let names: Vec<_> = routines.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Piernas", "Push", "Pull", "Glúteo"]);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_dir, store) = open_store();
        let first = store.initialize().unwrap();
        let second = store.initialize().unwrap();
        assert_eq!(first, second);
        assert_eq!(store.routines(), first);
    }

    #[test]
    fn test_load_empty_store() {
        let (_dir, store) = open_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let (_dir, store) = open_store();
        let mut table = ExerciseTable::new();
        let mut ex = exercise(100, "Sentadilla");
        ex.records.push(Record {
            id: 101,
            date: "2024-01-01".to_string(),
            sets: vec![SetEntry {
                weight: 50.0,
                reps: 10,
            }],
            notes: "profundidad completa".to_string(),
        });
        table.insert("1".to_string(), vec![ex]);
        table.insert("2".to_string(), vec![exercise(200, "Press banca")]);

        store.save(&table).unwrap();
        assert_eq!(store.load(), table);

        // Saving what was loaded must round-trip again unchanged.
        let reloaded = store.load();
        store.save(&reloaded).unwrap();
        assert_eq!(store.load(), table);
    }

    #[test]
    fn test_corrupt_slot_reads_as_empty() {
        let (dir, store) = open_store();
        let path = dir.path().join(DEFAULT_PROFILE).join("ejercicios.json");
        fs::write(&path, "{not json at all").unwrap();
        assert!(store.load().is_empty());
    }

    /// Build a table whose serialized form is exactly `total` bytes. Padding
    /// goes into the image field, where one char is one serialized byte.
    fn table_of_size(total: usize) -> ExerciseTable {
        let mut table = ExerciseTable::new();
        table.insert("1".to_string(), vec![exercise(100, "relleno")]);
        let base = serde_json::to_string(&table).unwrap().len();
        table.get_mut("1").unwrap()[0].image_data = "x".repeat(total - base);
        assert_eq!(serde_json::to_string(&table).unwrap().len(), total);
        table
    }

    #[test]
    fn test_save_at_size_ceiling_fails() {
        let (_dir, store) = open_store();
        let table = table_of_size(MAX_TABLE_BYTES as usize);
        let err = store.save(&table).unwrap_err();
        assert!(err.is_size_limit(), "expected size limit, got: {err}");
    }

    #[test]
    fn test_save_just_below_ceiling_succeeds() {
        let (_dir, store) = open_store();
        let table = table_of_size(MAX_TABLE_BYTES as usize - 1);
        store.save(&table).unwrap();
        assert_eq!(store.load(), table);
    }

    #[test]
    fn test_active_profile_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(active_profile(dir.path()), DEFAULT_PROFILE);
    }

    #[test]
    fn test_profile_switch_persists() {
        let dir = TempDir::new().unwrap();
        set_active_profile(dir.path(), "segundo").unwrap();
        assert_eq!(active_profile(dir.path()), "segundo");
    }

    #[test]
    fn test_profiles_are_isolated() {
        let dir = TempDir::new().unwrap();
        let first = Store::open(dir.path(), "principal").unwrap();
        let second = Store::open(dir.path(), "segundo").unwrap();

        let mut table = ExerciseTable::new();
        table.insert("1".to_string(), vec![exercise(100, "Sentadilla")]);
        first.save(&table).unwrap();

        assert_eq!(first.load(), table);
        assert!(second.load().is_empty());
    }
}
