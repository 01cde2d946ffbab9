//! Clinic document storage

mod repository;

pub use repository::{ClinicRepository, InMemoryRepository, JsonFileRepository};
