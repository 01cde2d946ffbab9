//! Static intent corpus used by the fallback matcher

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ClinicError;

/// Corpus compiled into the binary
const BUILTIN_CORPUS: &str = include_str!("../data/intents.json");

/// A named group of trigger phrases and canned replies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Intent {
    pub tag: String,

    #[serde(default)]
    pub patterns: Vec<String>,

    #[serde(default)]
    pub responses: Vec<String>,
}

/// Ordered list of intents. Order matters: ties go to the earlier intent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentCorpus {
    pub intents: Vec<Intent>,
}

impl IntentCorpus {
    /// The default corpus shipped with the responder
    pub fn builtin() -> Result<Self, ClinicError> {
        Self::from_json(BUILTIN_CORPUS)
    }

    /// Parse and validate a corpus from JSON text
    pub fn from_json(text: &str) -> Result<Self, ClinicError> {
        let corpus: Self = serde_json::from_str(text)?;
        corpus.validate()?;
        Ok(corpus)
    }

    /// Load a corpus file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClinicError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<(), ClinicError> {
        for (index, intent) in self.intents.iter().enumerate() {
            if intent.tag.trim().is_empty() {
                return Err(ClinicError::InvalidCorpus(format!(
                    "intent #{index} has an empty tag"
                )));
            }
            if self.intents[..index].iter().any(|i| i.tag == intent.tag) {
                return Err(ClinicError::InvalidCorpus(format!(
                    "duplicate intent tag '{}'",
                    intent.tag
                )));
            }
        }
        Ok(())
    }
}
