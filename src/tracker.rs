//! Mutation API - CRUD and reorder operations over the local store
//!
//! Every operation reloads the whole table, mutates it, and saves it back:
//! strict last-write-wins, no cached snapshot between calls. Missing targets
//! are silent no-ops or `false` returns, never errors; only persistence
//! failures raise.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::error::Result;
use crate::models::{Exercise, Measurement, NewMeasurement, NewRecord, Record};
use crate::store::{ExerciseTable, Store};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Millisecond-timestamp id with a monotonic bump so rapid successive calls
/// never collide.
pub fn fresh_id() -> i64 {
    let now = Utc::now().timestamp_millis();
    // The closure always returns Some, so fetch_update cannot fail.
    let last = LAST_ID
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    now.max(last + 1)
}

/// Stateless facade over one profile's store.
pub struct Tracker {
    store: Store,
}

impl Tracker {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The underlying store, for seed and slot-level operations.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// A fresh copy of the whole table, for read-only aggregation.
    pub fn snapshot(&self) -> ExerciseTable {
        self.store.load()
    }

    /// Exercises of a routine in stored order; empty when none. Never fails.
    pub fn list_exercises(&self, routine_id: i64) -> Vec<Exercise> {
        self.store
            .load()
            .remove(&routine_id.to_string())
            .unwrap_or_default()
    }

    /// Linear scan by id within the routine.
    pub fn get_exercise(&self, routine_id: i64, exercise_id: i64) -> Option<Exercise> {
        self.list_exercises(routine_id)
            .into_iter()
            .find(|e| e.id == exercise_id)
    }

    /// Append an exercise to a routine, creating its sequence if absent.
    /// The caller supplies the id (by convention `fresh_id()`); no
    /// cross-routine uniqueness check is performed.
    pub fn add_exercise(&self, routine_id: i64, exercise: Exercise) -> Result<()> {
        let mut table = self.store.load();
        table
            .entry(routine_id.to_string())
            .or_default()
            .push(exercise);
        self.store.save(&table)
    }

    /// Filter an exercise out by id. Silent no-op when the routine or the
    /// id does not exist.
    pub fn remove_exercise(&self, routine_id: i64, exercise_id: i64) -> Result<()> {
        let mut table = self.store.load();
        let Some(exercises) = table.get_mut(&routine_id.to_string()) else {
            return Ok(());
        };
        exercises.retain(|e| e.id != exercise_id);
        self.store.save(&table)
    }

    /// Replace an exercise in place, located by its id. Persists only on a
    /// match; silent no-op otherwise.
    pub fn update_exercise(&self, routine_id: i64, exercise: Exercise) -> Result<()> {
        let mut table = self.store.load();
        let Some(exercises) = table.get_mut(&routine_id.to_string()) else {
            return Ok(());
        };
        let Some(slot) = exercises.iter_mut().find(|e| e.id == exercise.id) else {
            return Ok(());
        };
        *slot = exercise;
        self.store.save(&table)
    }

    /// Stamp a fresh id on the record and insert it at the FRONT of the
    /// exercise's history (newest-first is a store invariant, not a caller
    /// choice). `false` means the exercise was not found.
    pub fn add_record(&self, routine_id: i64, exercise_id: i64, record: NewRecord) -> Result<bool> {
        let mut table = self.store.load();
        let Some(exercise) = find_exercise(&mut table, routine_id, exercise_id) else {
            return Ok(false);
        };
        exercise.records.insert(
            0,
            Record {
                id: fresh_id(),
                date: record.date,
                sets: record.sets,
                notes: record.notes,
            },
        );
        self.store.save(&table)?;
        Ok(true)
    }

    /// Filter a record out by id. Returns whether the exercise existed.
    pub fn remove_record(&self, routine_id: i64, exercise_id: i64, record_id: i64) -> Result<bool> {
        let mut table = self.store.load();
        let Some(exercise) = find_exercise(&mut table, routine_id, exercise_id) else {
            return Ok(false);
        };
        exercise.records.retain(|r| r.id != record_id);
        self.store.save(&table)?;
        Ok(true)
    }

    /// Replace a record's data in place. The stored id always wins: callers
    /// cannot change a record's id through an update. Returns whether a
    /// matching record was found.
    pub fn update_record(
        &self,
        routine_id: i64,
        exercise_id: i64,
        record_id: i64,
        new_data: NewRecord,
    ) -> Result<bool> {
        let mut table = self.store.load();
        let Some(exercise) = find_exercise(&mut table, routine_id, exercise_id) else {
            return Ok(false);
        };
        let Some(record) = exercise.records.iter_mut().find(|r| r.id == record_id) else {
            return Ok(false);
        };
        *record = Record {
            id: record_id,
            date: new_data.date,
            sets: new_data.sets,
            notes: new_data.notes,
        };
        self.store.save(&table)?;
        Ok(true)
    }

    /// Move the dragged exercise to the target's prior position (a single
    /// element move, not a swap). `false` when either id is absent, with no
    /// mutation. Equal ids are a success no-op without a persist.
    pub fn reorder_exercises(
        &self,
        routine_id: i64,
        dragged_id: i64,
        target_id: i64,
    ) -> Result<bool> {
        let mut table = self.store.load();
        let Some(exercises) = table.get_mut(&routine_id.to_string()) else {
            return Ok(false);
        };
        let dragged_pos = exercises.iter().position(|e| e.id == dragged_id);
        let target_pos = exercises.iter().position(|e| e.id == target_id);
        let (Some(dragged_pos), Some(target_pos)) = (dragged_pos, target_pos) else {
            return Ok(false);
        };
        if dragged_id == target_id {
            return Ok(true);
        }
        let dragged = exercises.remove(dragged_pos);
        exercises.insert(target_pos, dragged);
        self.store.save(&table)?;
        Ok(true)
    }

    /// Newest-first body-measurement history.
    pub fn list_measurements(&self) -> Vec<Measurement> {
        self.store.load_measurements()
    }

    /// Stamp a fresh id and insert at the front of the history.
    pub fn add_measurement(&self, measurement: NewMeasurement) -> Result<Measurement> {
        let mut measurements = self.store.load_measurements();
        let entry = Measurement {
            id: fresh_id(),
            date: measurement.date,
            weight: measurement.weight,
            waist: measurement.waist,
            hip: measurement.hip,
            chest: measurement.chest,
            arm: measurement.arm,
            notes: measurement.notes,
        };
        measurements.insert(0, entry.clone());
        self.store.save_measurements(&measurements)?;
        Ok(entry)
    }

    /// Filter a measurement out by id. Returns whether one was removed.
    pub fn remove_measurement(&self, measurement_id: i64) -> Result<bool> {
        let mut measurements = self.store.load_measurements();
        let before = measurements.len();
        measurements.retain(|m| m.id != measurement_id);
        if measurements.len() == before {
            return Ok(false);
        }
        self.store.save_measurements(&measurements)?;
        Ok(true)
    }
}

fn find_exercise(
    table: &mut ExerciseTable,
    routine_id: i64,
    exercise_id: i64,
) -> Option<&mut Exercise> {
    table
        .get_mut(&routine_id.to_string())?
        .iter_mut()
        .find(|e| e.id == exercise_id)
}
