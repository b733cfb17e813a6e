//! Offline training of the categorizer artifact
//!
//! Training is a one-shot batch job: vectorize the labeled seed set, fit a
//! seeded random forest, and bundle both into a [`ClassifierModel`]. Given the
//! same examples and the same seed the resulting model predicts identically.

use std::collections::BTreeSet;
use std::io::Read;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::info;

use crate::config::TrainingConfig;
use crate::error::{Error, Result};

use super::model::ClassifierModel;
use super::vectorizer::TfIdfVectorizer;

/// One labeled (description, category) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedExample {
    pub description: String,
    pub category: String,
}

impl SeedExample {
    pub fn new(description: &str, category: &str) -> Self {
        Self {
            description: description.to_string(),
            category: category.to_string(),
        }
    }
}

/// Built-in labeled merchant descriptions
pub fn seed_dataset() -> Vec<SeedExample> {
    [
        ("Starbucks Coffee", "Food"),
        ("Uber Ride", "Travel"),
        ("Monthly Rent", "Rent"),
        ("Amazon Shopping", "Shopping"),
        ("Netflix Subscription", "Entertainment"),
        ("Electricity Bill", "Bills"),
        ("Grocery Store", "Food"),
        ("Delta Airlines", "Travel"),
        ("Walmart Grocery", "Food"),
        ("Gas Station", "Travel"),
        ("Gym Membership", "Entertainment"),
        ("Dining Out", "Food"),
        ("ZARA Clothing", "Shopping"),
        ("Spotify", "Entertainment"),
        ("Mobile Bill", "Bills"),
        ("Train Ticket", "Travel"),
    ]
    .into_iter()
    .map(|(description, category)| SeedExample::new(description, category))
    .collect()
}

/// Read labeled examples from CSV with `description,category` headers
pub fn read_seed_csv<R: Read>(reader: R) -> Result<Vec<SeedExample>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut examples = Vec::new();
    for (i, result) in rdr.deserialize::<SeedExample>().enumerate() {
        let example = result?;
        if example.category.is_empty() {
            return Err(Error::Training(format!(
                "Row {} has an empty category",
                i + 2
            )));
        }
        examples.push(example);
    }

    Ok(examples)
}

/// Fit vectorizer and forest over `examples`
pub fn train(examples: &[SeedExample], params: &TrainingConfig) -> Result<ClassifierModel> {
    if examples.is_empty() {
        return Err(Error::Training("No training examples".into()));
    }
    if params.n_trees == 0 {
        return Err(Error::Training("n_trees must be at least 1".into()));
    }

    let labels: Vec<String> = examples
        .iter()
        .map(|e| e.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let y: Vec<u32> = examples
        .iter()
        .map(|e| {
            labels
                .binary_search(&e.category)
                .map(|idx| idx as u32)
                .map_err(|_| Error::Training(format!("Unknown label: {}", e.category)))
        })
        .collect::<Result<_>>()?;

    let descriptions: Vec<&str> = examples.iter().map(|e| e.description.as_str()).collect();
    let vectorizer = TfIdfVectorizer::fit(&descriptions)?;
    let x = DenseMatrix::from_2d_vec(&vectorizer.transform_batch(&descriptions));

    let parameters = RandomForestClassifierParameters::default()
        .with_n_trees(params.n_trees)
        .with_seed(params.seed);

    let forest = RandomForestClassifier::fit(&x, &y, parameters)
        .map_err(|e| Error::Training(format!("Random forest fit failed: {}", e)))?;

    info!(
        examples = examples.len(),
        labels = labels.len(),
        features = vectorizer.n_features(),
        trees = params.n_trees,
        seed = params.seed,
        "Trained expense classifier"
    );

    Ok(ClassifierModel::new(vectorizer, labels, forest))
}
