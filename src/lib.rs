//! entrenos - Personal workout tracker
//!
//! Routines ("entrenos") hold exercises, exercises hold logged records.
//! Everything lives in JSON slot files under a per-profile data directory.

pub mod error;
pub mod ingest;
pub mod models;
pub mod stats;
pub mod store;
pub mod tracker;

pub use error::{Error, Result};
pub use store::Store;
pub use tracker::Tracker;
