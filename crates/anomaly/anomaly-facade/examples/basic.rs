//! Basic example: train an autoencoder on a sine wave, then score a spiked copy
//!
//! Run with: cargo run --example basic -p anomaly-facade

use anomaly::{score, LstmAutoencoder, ModelConfig, NumericTable, Summarizer, TrainConfig, Trainer};

fn sine(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 25.0).sin())
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== anomaly-facade Basic Example ===\n");

    let training = NumericTable::from_series("v", &sine(100))?;
    let checkpoint = std::env::temp_dir().join("anomaly-basic.safetensors");

    // 1. Train
    println!("1. Training on {} clean samples", training.n_rows());
    let trained = Trainer::new(
        ModelConfig::new(1, 16, 4, 1),
        TrainConfig::new(50, 1e-2, &checkpoint),
    )
    .fit(&training)?;
    for stats in trained.history.iter().step_by(10) {
        println!("   epoch {:>3}/{}  loss={:.6}", stats.epoch, stats.total_epochs, stats.loss);
    }
    println!("   checkpoint: {}\n", trained.checkpoint_path.display());

    // 2. Score a spiked copy with the reloaded model
    let mut spiked = sine(100);
    spiked[40] += 3.0;
    spiked[75] -= 2.5;
    let test = NumericTable::from_series("v", &spiked)?;

    let model = LstmAutoencoder::load(&checkpoint, trained.model.config())?;
    let scores = score(&test, &model)?;
    println!("2. Scored {} timesteps", scores.len());

    // 3. Summarize
    let report = Summarizer::default().summarize(&scores);
    println!("3. {}", report.summary);

    Ok(())
}
