//! The trained categorizer artifact: fitted vectorizer + random forest

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::vectorizer::TfIdfVectorizer;

/// Bumped whenever the serialized layout changes
pub const ARTIFACT_VERSION: u32 = 1;

pub(crate) type Forest = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// A fitted description → category classifier
#[derive(Serialize, Deserialize)]
pub struct ClassifierModel {
    version: u32,
    vectorizer: TfIdfVectorizer,
    /// Class index → category label, sorted
    labels: Vec<String>,
    forest: Forest,
}

impl fmt::Debug for ClassifierModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierModel")
            .field("version", &self.version)
            .field("labels", &self.labels)
            .field("n_features", &self.vectorizer.n_features())
            .finish()
    }
}

impl ClassifierModel {
    pub(crate) fn new(vectorizer: TfIdfVectorizer, labels: Vec<String>, forest: Forest) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            vectorizer,
            labels,
            forest,
        }
    }

    /// Category labels this model can produce
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Predict a label, or `None` when the description has no known terms
    pub fn predict(&self, description: &str) -> Option<&str> {
        if !self.vectorizer.has_known_terms(description) {
            return None;
        }

        let row = self.vectorizer.transform(description);
        let x = DenseMatrix::from_2d_vec(&vec![row]);

        match self.forest.predict(&x) {
            Ok(predicted) => predicted
                .first()
                .and_then(|&class| self.labels.get(class as usize))
                .map(String::as_str),
            Err(e) => {
                warn!(error = %e, "Forest prediction failed");
                None
            }
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let model: Self = serde_json::from_slice(bytes)?;
        if model.version != ARTIFACT_VERSION {
            return Err(Error::InvalidData(format!(
                "Unsupported model artifact version {} (expected {})",
                model.version, ARTIFACT_VERSION
            )));
        }
        if model.labels.is_empty() {
            return Err(Error::InvalidData("Model artifact has no labels".into()));
        }
        Ok(model)
    }

    /// Write the artifact, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = self.to_bytes()?;
        fs::write(path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Saved model artifact");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// SHA-256 of the serialized artifact
    pub fn fingerprint(&self) -> Result<String> {
        Ok(fingerprint_bytes(&self.to_bytes()?))
    }
}

pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::training::{seed_dataset, train};
    use crate::config::TrainingConfig;

    fn small_model() -> ClassifierModel {
        let params = TrainingConfig {
            n_trees: 10,
            seed: 42,
        };
        train(&seed_dataset(), &params).unwrap()
    }

    #[test]
    fn test_bytes_round_trip_predicts_identically() {
        let model = small_model();
        let restored = ClassifierModel::from_bytes(&model.to_bytes().unwrap()).unwrap();

        assert_eq!(model.labels(), restored.labels());
        for description in ["Starbucks Coffee", "Uber Ride", "Netflix", "Monthly Rent"] {
            assert_eq!(model.predict(description), restored.predict(description));
        }
        assert_eq!(model.fingerprint().unwrap(), restored.fingerprint().unwrap());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("expense_model.json");

        let model = small_model();
        model.save(&path).unwrap();

        let loaded = ClassifierModel::load(&path).unwrap();
        assert_eq!(loaded.labels(), model.labels());
    }

    #[test]
    fn test_unknown_terms_predict_none() {
        let model = small_model();
        assert_eq!(model.predict("zzzz qqqq"), None);
        assert_eq!(model.predict(""), None);
        assert!(model.predict("Gym Membership").is_some());
    }

    #[test]
    fn test_corrupt_bytes_rejected() {
        assert!(ClassifierModel::from_bytes(b"not json").is_err());
        assert!(ClassifierModel::from_bytes(&[0xff, 0x00, 0x13]).is_err());
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let fp = fingerprint_bytes(b"abc");
        assert_eq!(
            fp,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
