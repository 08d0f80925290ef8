//! Model persistence: the JSON wire format and the async save/load pair.
//!
//! The wire format matches the classifier's historical JSON layout: bigram
//! keys as `"<idA>:<idB>"` strings, camel-cased threshold names, and a
//! `modelVersion` stamp. File I/O is the only asynchronous boundary in the
//! crate.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::core::TextClassifier;
use crate::classifier::types::Thresholds;
use crate::error::{AugurError, Result};

/// Version stamp written into saved models.
pub const MODEL_VERSION: u32 = 10;

/// Serialized classifier state.
///
/// An ordered map keeps the stored model diffable between saves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedModel {
    /// Bigram weight rows keyed by the `"a:b"` wire form.
    pub model: BTreeMap<String, Vec<f64>>,
    /// Vocabulary words; index = id.
    pub vocabulary: Vec<String>,
    /// Distinct output labels.
    pub outputs: Vec<usize>,
    /// Accuracy of the last training pass.
    pub accuracy: f64,
    /// Confidence thresholds.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Per-output balance factors.
    #[serde(default)]
    pub balance: Vec<f64>,
    /// Format version.
    #[serde(rename = "modelVersion")]
    pub model_version: u32,
}

impl TextClassifier {
    /// Serialize the model to `path`.
    ///
    /// Writes a sibling temporary file first and renames it over the
    /// target, so a failed save never truncates an existing model.
    pub async fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .ok_or_else(|| AugurError::invalid_argument("save path has no file name"))?;
        let saved = self.snapshot();
        let json = serde_json::to_vec(&saved)?;

        let tmp = path.with_file_name(format!("{}.tmp", file_name.to_string_lossy()));
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, path).await?;

        info!(
            path = %path.display(),
            bigrams = saved.model.len(),
            vocabulary = saved.vocabulary.len(),
            "model saved"
        );
        Ok(())
    }

    /// Load a previously saved model from `path`.
    ///
    /// The whole file is read and parsed before any instance state is
    /// touched; a missing, unreadable, or malformed file leaves the
    /// classifier exactly as it was.
    pub async fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let saved: SavedModel = serde_json::from_slice(&bytes)?;
        self.restore(saved)?;

        info!(
            path = %path.display(),
            bigrams = self.model_len(),
            vocabulary = self.vocabulary_len(),
            outputs = self.outputs().len(),
            "model loaded"
        );
        Ok(())
    }
}
