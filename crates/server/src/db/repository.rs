use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clinic_core::{ClinicDb, ClinicError};

/// Whole-document storage for clinic records.
///
/// Every mutation loads the full document, changes it in memory and saves it
/// back. Nothing is locked between `load` and `save`, so two concurrent
/// writers race and the last save wins without detection.
pub trait ClinicRepository: Send + Sync {
    /// Read the full document
    fn load(&self) -> Result<ClinicDb, ClinicError>;

    /// Replace the full document
    fn save(&self, db: &ClinicDb) -> Result<(), ClinicError>;
}

/// Repository backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ClinicRepository for JsonFileRepository {
    fn load(&self) -> Result<ClinicDb, ClinicError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => ClinicDb::from_json(&text),
            // A store that was never written is an empty clinic
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Store file missing, using empty document");
                Ok(ClinicDb::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, db: &ClinicDb) -> Result<(), ClinicError> {
        let bytes = db.to_pretty_json()?;
        std::fs::write(&self.path, bytes)?;

        tracing::info!(
            target: "audit",
            path = %self.path.display(),
            prescriptions = db.prescriptions.len(),
            medicines = db.prescription_medicines.len(),
            "Clinic store saved"
        );
        Ok(())
    }
}

/// In-memory repository, mainly for tests
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    db: Mutex<ClinicDb>,
}

impl InMemoryRepository {
    pub fn new(db: ClinicDb) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// The document as last saved
    pub fn snapshot(&self) -> Result<ClinicDb, ClinicError> {
        self.load()
    }
}

impl ClinicRepository for InMemoryRepository {
    fn load(&self) -> Result<ClinicDb, ClinicError> {
        let db = self
            .db
            .lock()
            .map_err(|_| ClinicError::Store("in-memory store lock poisoned".to_string()))?;
        Ok(db.clone())
    }

    fn save(&self, db: &ClinicDb) -> Result<(), ClinicError> {
        let mut stored = self
            .db
            .lock()
            .map_err(|_| ClinicError::Store("in-memory store lock poisoned".to_string()))?;
        *stored = db.clone();
        Ok(())
    }
}
