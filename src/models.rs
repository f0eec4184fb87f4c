//! Data model - routines, exercises, records and body measurements
//!
//! Wire keys stay in Spanish so the JSON slot files remain compatible with
//! data exported from the original app.

use serde::{Deserialize, Serialize};

/// A workout routine ("entreno"): a named session template, e.g. "Push"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "imagen")]
    pub image: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

/// An exercise inside a routine, with its full record history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Embedded image as a `data:` URI; empty when none was attached
    #[serde(rename = "imagenBase64", default)]
    pub image_data: String,
    /// Newest-first history of logged performances
    #[serde(rename = "registros", default)]
    pub records: Vec<Record>,
}

/// One logged performance of an exercise on a given date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "series")]
    pub sets: Vec<SetEntry>,
    #[serde(rename = "notas", default)]
    pub notes: String,
}

/// One weight + repetitions pair within a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    #[serde(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "repeticiones")]
    pub reps: i64,
}

/// Record input as supplied by callers; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub date: String,
    pub sets: Vec<SetEntry>,
    pub notes: String,
}

/// One body-measurement entry (weight plus optional girths in cm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "cintura")]
    pub waist: Option<f64>,
    #[serde(rename = "cadera")]
    pub hip: Option<f64>,
    #[serde(rename = "pecho")]
    pub chest: Option<f64>,
    #[serde(rename = "brazo")]
    pub arm: Option<f64>,
    #[serde(rename = "notas", default)]
    pub notes: String,
}

/// Measurement input as supplied by callers; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeasurement {
    pub date: String,
    pub weight: f64,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
    pub chest: Option<f64>,
    pub arm: Option<f64>,
    pub notes: String,
}
