//! End-to-end tests for anomaly-facade
//!
//! Tests complete train, score and summarize workflows using only this crate's API.

use std::sync::Arc;

use anomaly::{
    load_checkpoint, load_csv, population_stats, score, summarize, train_from_csv, AnomalyReport,
    AnomalyScorer, LstmAutoencoder, ModelConfig, StreamMonitor, StreamValues, Summarizer,
    SummaryConfig, TrainConfig,
};

fn sine_with_spike() -> Vec<f64> {
    let mut values: Vec<f64> = (0..50)
        .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 49.0).sin())
        .collect();
    values[25] += 5.0;
    values
}

fn write_series(dir: &std::path::Path, name: &str, values: &[f64]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut text = String::from("v\n");
    for v in values {
        text.push_str(&format!("{}\n", v));
    }
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn e2e_train_one_epoch_writes_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_series(dir.path(), "ramp.csv", &[0.0, 1.0, 2.0, 3.0, 4.0]);
    let checkpoint = dir.path().join("models").join("checkpoint.safetensors");

    let trained = train_from_csv(
        &csv,
        ModelConfig::default(),
        TrainConfig {
            epochs: 1,
            checkpoint_path: checkpoint.clone(),
            ..TrainConfig::default()
        },
    )
    .unwrap();

    assert!(checkpoint.exists());
    assert_eq!(trained.history.len(), 1);
    assert!(load_checkpoint(&checkpoint).is_ok());
}

#[test]
fn e2e_untrained_sine_scores() {
    let table = anomaly::NumericTable::from_series("v", &sine_with_spike()).unwrap();
    let model = LstmAutoencoder::new(ModelConfig::new(1, 8, 4, 1)).unwrap();

    let scores = score(&table, &model).unwrap();

    assert_eq!(scores.len(), 50);
    assert!(scores.iter().all(|&s| s >= 0.0));
}

#[test]
fn e2e_train_score_summarize() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_series(dir.path(), "sine.csv", &sine_with_spike());
    let checkpoint = dir.path().join("sine.safetensors");

    train_from_csv(
        &csv,
        ModelConfig::new(1, 16, 4, 1),
        TrainConfig::new(20, 1e-2, &checkpoint),
    )
    .unwrap();

    let model = load_checkpoint(&checkpoint).unwrap();
    let table = load_csv(&csv).unwrap();
    let scores = model.score(&table).unwrap();
    let report: AnomalyReport = summarize(&scores);

    let (mean, std) = population_stats(&scores);
    assert_eq!(report.mean, mean);
    assert_eq!(report.std_dev, std);
    for (i, &s) in scores.iter().enumerate() {
        assert_eq!(report.anomaly_indices.contains(&i), s > report.threshold);
    }
}

#[test]
fn e2e_summary_properties_hold_for_many_sequences() {
    let summarizer = Summarizer::new(SummaryConfig::default());
    for seed in 1..20u64 {
        let scores: Vec<f64> = (0..64)
            .map(|i| ((i as u64 * seed * 2654435761) % 1000) as f64 / 100.0)
            .collect();
        let report = summarizer.summarize(&scores);
        let mut previous = None;
        for &i in &report.anomaly_indices {
            assert!(scores[i] > report.threshold);
            if let Some(p) = previous {
                assert!(i > p, "indices must ascend");
            }
            previous = Some(i);
        }
        let unflagged_above = scores
            .iter()
            .enumerate()
            .filter(|(i, _)| !report.anomaly_indices.contains(i))
            .any(|(_, &s)| s > report.threshold);
        assert!(!unflagged_above);
    }
}

#[test]
fn e2e_stream_session() {
    let model = LstmAutoencoder::new(ModelConfig::default()).unwrap();
    let scorer: Arc<dyn AnomalyScorer> = Arc::new(model);
    let mut monitor = StreamMonitor::new(scorer, 3);

    for text in ["0.5", "0.6", "oops", "0.7", "9.0"] {
        let _ = monitor.handle_text(text);
    }
    let update = monitor.handle_text("0.8").unwrap();

    assert_eq!(update.values, StreamValues::Series(vec![0.7, 9.0, 0.8]));
    assert_eq!(update.scores.len(), 3);

    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json["values"].as_array().unwrap().len(), 3);
}
