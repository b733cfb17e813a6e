//! Categorizer - description → spending category
//!
//! A [`Categorizer`] is constructed once at startup and handed to every
//! ingestion path. It wraps an optional trained [`ClassifierModel`]; without
//! one it labels everything "Others". Classification never fails.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendsight_core::categorizer::Categorizer;
//!
//! let categorizer = Categorizer::load(&model_path);
//! let label = categorizer.classify("Starbucks Coffee");
//! ```

pub mod model;
pub mod training;
pub mod vectorizer;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::OTHERS_CATEGORY;

pub use model::{fingerprint_bytes, ClassifierModel, ARTIFACT_VERSION};
pub use training::{read_seed_csv, seed_dataset, train, SeedExample};
pub use vectorizer::{tokenize, TfIdfVectorizer};

/// Shared, read-only handle to the loaded classifier
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    model: Option<Arc<ClassifierModel>>,
    fingerprint: Option<String>,
}

impl Categorizer {
    /// Categorizer without a model; always answers "Others"
    pub fn fallback() -> Self {
        Self::default()
    }

    pub fn from_model(model: ClassifierModel) -> Self {
        let fingerprint = model.fingerprint().ok();
        Self {
            model: Some(Arc::new(model)),
            fingerprint,
        }
    }

    /// Load the artifact at `path`. A missing artifact silently selects the
    /// fallback; an unreadable one logs a warning and does the same.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!(
                path = %path.display(),
                "No model artifact found, categorizing as \"{}\"",
                OTHERS_CATEGORY
            );
            return Self::fallback();
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read model artifact");
                return Self::fallback();
            }
        };

        match ClassifierModel::from_bytes(&bytes) {
            Ok(model) => {
                let fingerprint = fingerprint_bytes(&bytes);
                info!(
                    path = %path.display(),
                    labels = model.labels().len(),
                    fingerprint = &fingerprint[..12],
                    "Loaded model artifact"
                );
                Self {
                    model: Some(Arc::new(model)),
                    fingerprint: Some(fingerprint),
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid model artifact");
                Self::fallback()
            }
        }
    }

    /// Load from an optional path (`None` selects the fallback)
    pub fn load_optional(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::load(p),
            None => Self::fallback(),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Labels the model can produce (empty for the fallback)
    pub fn labels(&self) -> &[String] {
        self.model.as_deref().map(ClassifierModel::labels).unwrap_or(&[])
    }

    /// SHA-256 of the loaded artifact bytes
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Label a description. Always returns a non-empty label.
    pub fn classify(&self, description: &str) -> String {
        let label = self
            .model
            .as_deref()
            .and_then(|m| m.predict(description))
            .filter(|l| !l.is_empty())
            .unwrap_or(OTHERS_CATEGORY);

        debug!(description, label, "Classified description");
        label.to_string()
    }

    pub fn classify_batch(&self, descriptions: &[&str]) -> Vec<String> {
        descriptions.iter().map(|d| self.classify(d)).collect()
    }
}
