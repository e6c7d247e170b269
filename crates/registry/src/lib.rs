//! `nibtab-registry`: bank-code registry extraction and reconciliation engine.
//!
//! Pure engine crate: receives rows already read from a workbook, returns
//! registries, indices and reconciliation reports. No CLI or IO dependencies.

pub mod cell;
pub mod config;
pub mod dump;
pub mod error;
pub mod iban;
pub mod index;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod registry;
pub mod snapshot;
pub mod text;

pub use cell::{Cell, RawRow};
pub use config::RegistryConfig;
pub use error::RegistryError;
pub use index::DualIndex;
pub use model::{CanonicalRecord, ReconciliationReport, SnapshotEntry};
pub use normalize::{extract, normalize, Extraction, NormalizePolicy, RowOutcome};
pub use reconcile::reconcile;
pub use registry::Registry;
