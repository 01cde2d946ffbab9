//! clinic-core: Shared clinic record types and utilities
//!
//! This crate provides the flat clinic document (users, patient profiles,
//! prescriptions, prescription medicines), its lookup and append operations,
//! the intent corpus used by the fallback matcher, and the shared error type.

pub mod error;
pub mod intent;
pub mod model;

pub use error::ClinicError;
pub use intent::{Intent, IntentCorpus};
pub use model::{
    ClinicDb, ClinicStats, PatientInfo, PatientProfile, Prescription, PrescriptionMedicine, User,
};
