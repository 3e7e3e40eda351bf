use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::json;
use toxic_classifier::{
    cli::Model,
    config::Settings,
    models::tfidf,
    pipelines::toxicity::{self, Category},
};

/// Writes a tiny fitted vectorizer and classifier: "idiot" is toxic and insulting,
/// "kill" is toxic and threatening, "love" is clean.
fn write_artifacts(dir: &Path) {
    let vectorizer = json!({
        "vocabulary": {"idiot": 0, "hate": 1, "love": 2, "kill": 3},
        "idf": [1.0, 1.0, 1.0, 1.0]
    });

    let zeros = [0.0, 0.0, 0.0, 0.0];
    let classifier = json!({
        "labels": ["insult", "toxic", "severe_toxic", "obscene", "threat", "identity_hate"],
        "coef": [
            [4.0, 0.0, 0.0, 0.0],
            [3.0, 3.0, -3.0, 2.0],
            zeros,
            zeros,
            [0.0, 0.0, 0.0, 5.0],
            zeros
        ],
        "intercept": [-1.0, -1.0, -1.0, -1.0, -1.0, -2.0]
    });

    std::fs::write(
        dir.join(tfidf::VECTORIZER_FILE),
        serde_json::to_string(&vectorizer).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join(tfidf::CLASSIFIER_FILE),
        serde_json::to_string(&classifier).unwrap(),
    )
    .unwrap();
}

fn settings(dir: &Path) -> Settings {
    Settings {
        model: Model::Tfidf,
        artifact_dir: dir.to_path_buf(),
        ..Default::default()
    }
}

#[tokio::test]
async fn flags_toxic_categories() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let pipeline = toxicity::load(&settings(dir.path())).await.unwrap();

    let texts: Vec<String> = ["You idiot", "I love you", "I will KILL you", ""]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let predictions = pipeline.predict(&texts).unwrap();

    assert_eq!(predictions[0].labels, vec![Category::Toxic, Category::Insult]);
    assert!(predictions[1].labels.is_empty());
    assert_eq!(predictions[2].labels, vec![Category::Toxic, Category::Threat]);
    assert!(!predictions[3].any());

    assert!(predictions[0].scores.get(Category::Insult) > 0.9);
    assert!(predictions[1].scores.get(Category::Toxic) < 0.1);
}

#[tokio::test]
async fn is_toxic_follows_the_toxic_label() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let pipeline = toxicity::load(&settings(dir.path())).await.unwrap();

    assert!(!pipeline.is_toxic("I love you").unwrap());
    assert!(pipeline.is_toxic("hate hate hate").unwrap());
}

#[tokio::test]
async fn thresholds_change_decisions() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let mut settings = settings(dir.path());
    settings.thresholds.insert(Category::Insult, 0.99);

    let pipeline = toxicity::load(&settings).await.unwrap();
    let prediction = pipeline.predict_one("you idiot").unwrap();

    assert_eq!(prediction.labels, vec![Category::Toxic]);
}

#[tokio::test]
async fn missing_artifacts_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();

    let err = toxicity::load(&settings(dir.path())).await.err().unwrap();
    assert!(err.to_string().contains(tfidf::VECTORIZER_FILE));
}

#[tokio::test]
async fn mismatched_weights_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let vectorizer = json!({
        "vocabulary": {"idiot": 0},
        "idf": [1.0]
    });
    std::fs::write(
        dir.path().join(tfidf::VECTORIZER_FILE),
        serde_json::to_string(&vectorizer).unwrap(),
    )
    .unwrap();

    let err = tfidf::Classifier::load(dir.path()).await.unwrap_err();
    assert!(err.to_string().contains("expected 1"));
}

#[tokio::test]
async fn is_toxic_needs_a_positive_decision() {
    for (intercept, expected) in [(0.0, false), (-1e-8, false), (1e-8, true)] {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());

        let classifier = json!({
            "labels": ["toxic", "severe_toxic", "obscene", "threat", "insult", "identity_hate"],
            "coef": vec![[0.0, 0.0, 0.0, 0.0]; 6],
            "intercept": vec![intercept; 6]
        });
        std::fs::write(
            dir.path().join(tfidf::CLASSIFIER_FILE),
            serde_json::to_string(&classifier).unwrap(),
        )
        .unwrap();

        let pipeline = toxicity::load(&settings(dir.path())).await.unwrap();

        assert_eq!(
            pipeline.is_toxic("I love you").unwrap(),
            expected,
            "intercept {intercept}"
        );
    }
}
