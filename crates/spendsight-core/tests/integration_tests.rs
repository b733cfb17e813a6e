//! Integration tests for spendsight-core
//!
//! These tests exercise the full import → categorize → analyze → report workflow.

use chrono::NaiveDate;
use spendsight_core::{
    advisor::Advisor,
    categorizer::{seed_dataset, train, Categorizer, ClassifierModel},
    config::{Config, TrainingConfig},
    dashboard::SpendingAnalysis,
    forecaster::ForecastMethod,
    import::{categorize_rows, parse_csv, write_csv},
    report::{build_document, build_report},
    OTHERS_CATEGORY,
};

/// Three months of statements; rent and one grocery row are pre-labeled
fn statement_csv() -> &'static str {
    r#"Date,Description,Amount,Category
2024-01-03,Monthly Rent,"12,000.00",Rent
2024-01-05,Starbucks Coffee,350.00,
2024-01-12,Uber Ride,420.00,
2024-02-03,Monthly Rent,"12,000.00",Rent
2024-02-09,Netflix Subscription,649.00,
2024-02-14,Grocery Store,2100.00,Food
2024-03-03,Monthly Rent,"12,000.00",Rent
2024-03-10,Electricity Bill,1800.00,
2024-03-18,Delta Airlines,5400.00,
"#
}

fn small_training() -> TrainingConfig {
    TrainingConfig {
        n_trees: 30,
        seed: 42,
    }
}

// =============================================================================
// Pipeline Integration Tests
// =============================================================================

#[test]
fn test_full_pipeline_with_trained_model() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let model_path = dir.path().join("models").join("expense_model.json");

    // Offline training writes the artifact
    let model = train(&seed_dataset(), &small_training()).expect("Failed to train");
    model.save(&model_path).expect("Failed to save artifact");

    // Startup loads it once
    let categorizer = Categorizer::load(&model_path);
    assert!(categorizer.is_trained());

    let records = parse_csv(statement_csv().as_bytes()).expect("Failed to parse CSV");
    assert_eq!(records.len(), 9);

    let records = categorize_rows(records, &categorizer);
    assert!(records.iter().all(|r| r.category.is_some()));
    assert_eq!(records[0].category.as_deref(), Some("Rent"));
    assert_eq!(records[5].category.as_deref(), Some("Food"));
    for record in &records {
        let label = record.category.as_deref().unwrap();
        assert!(label == OTHERS_CATEGORY || categorizer.labels().iter().any(|l| l == label));
    }

    let today = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
    let analysis = SpendingAnalysis::compute(&records, 20_000.0, today, &Advisor::default());

    assert_eq!(analysis.monthly.len(), 3);
    assert!(analysis.forecast.estimate >= 0.0);
    assert_eq!(analysis.forecast.method, ForecastMethod::LinearTrend);
    assert_eq!(analysis.budget.current_period_spend, 19_200.0);
    // 19,200 of 20,000 is past the 90% mark
    assert!(analysis.suggestions[0].contains("You have reached 90%"));
    // Rent dominates total spend
    assert!(analysis
        .suggestions
        .iter()
        .any(|s| s.starts_with("Rent is taking up more than 40%")));

    let pdf = build_report(
        "tester",
        analysis.total_spend,
        &analysis.category_totals,
        &analysis.suggestions,
    );
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn test_pipeline_without_artifact_uses_others() {
    let dir = tempfile::tempdir().unwrap();
    let categorizer = Categorizer::load(&dir.path().join("absent.json"));

    let records = categorize_rows(
        parse_csv(statement_csv().as_bytes()).unwrap(),
        &categorizer,
    );

    let unlabeled_in_csv = [1, 2, 4, 7, 8];
    for i in unlabeled_in_csv {
        assert_eq!(records[i].category.as_deref(), Some(OTHERS_CATEGORY));
    }

    let today = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
    let analysis = SpendingAnalysis::compute(&records, 0.0, today, &Advisor::default());
    let keys: Vec<&str> = analysis.category_totals.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Food", "Others", "Rent"]);

    let doc = analysis.report_document("tester");
    assert_eq!(doc.rows.len(), 3);
    assert!(build_document(&doc).starts_with(b"%PDF"));
}

#[test]
fn test_artifact_roundtrip_predicts_identically() {
    let model = train(&seed_dataset(), &small_training()).unwrap();
    let restored = ClassifierModel::from_bytes(&model.to_bytes().unwrap()).unwrap();

    for description in ["Starbucks Coffee", "Train Ticket", "Spotify Premium", "zzz"] {
        assert_eq!(model.predict(description), restored.predict(description));
    }
    assert_eq!(model.fingerprint().unwrap(), restored.fingerprint().unwrap());
}

#[test]
fn test_categorized_csv_export() {
    let records = categorize_rows(
        parse_csv(statement_csv().as_bytes()).unwrap(),
        &Categorizer::fallback(),
    );

    let mut out = Vec::new();
    write_csv(&records, &mut out).unwrap();

    let reparsed = parse_csv(out.as_slice()).unwrap();
    assert_eq!(reparsed, records);
}

#[test]
fn test_default_config_drives_advisor() {
    let config = Config::embedded().unwrap();
    let advisor = Advisor::new(&config.advisor);

    let empty = SpendingAnalysis::compute(
        &[],
        0.0,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        &advisor,
    );
    assert_eq!(empty.suggestions.len(), 1);
    assert!(empty.suggestions[0].starts_with("Start tracking"));
}
