//! # anomaly
//!
//! Command-line interface for training the LSTM autoencoder and scoring
//! sensor tables by reconstruction error.

use anomaly::{
    inspect_checkpoint, load_checkpoint, load_csv, score, train_from_csv, LstmAutoencoder,
    ModelConfig, NumericTable, Summarizer, TrainConfig, DEFAULT_CHECKPOINT_PATH,
};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "anomaly")]
#[command(about = "Sequence-autoencoder anomaly detection CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model on a CSV table and save a checkpoint
    Train {
        /// Training data (CSV with a header row)
        csv: PathBuf,

        /// Checkpoint output path
        #[arg(short, long, default_value = DEFAULT_CHECKPOINT_PATH)]
        out: PathBuf,

        /// Number of full-batch epochs
        #[arg(short, long, default_value = "10")]
        epochs: usize,

        /// Adam learning rate
        #[arg(long, default_value = "0.001")]
        lr: f64,

        /// LSTM hidden size
        #[arg(long, default_value = "32")]
        hidden_dim: usize,

        /// Bottleneck size
        #[arg(long, default_value = "8")]
        latent_dim: usize,

        /// Stacked LSTM layers in the encoder and the decoder
        #[arg(long, default_value = "1")]
        layers: usize,
    },

    /// Score every row of a CSV table
    Score {
        /// Input file (CSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Trained checkpoint (default: untrained model sized to the input)
        #[arg(short, long)]
        checkpoint: Option<PathBuf>,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score a CSV table and print the rule-based summary
    Analyze {
        /// Input file (CSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Trained checkpoint (default: untrained model sized to the input)
        #[arg(short, long)]
        checkpoint: Option<PathBuf>,
    },

    /// Print the architecture stored in a checkpoint
    Inspect {
        /// Checkpoint file
        checkpoint: PathBuf,
    },
}

/// Load the checkpoint, or build an untrained model matching the table width.
fn model_for(table: &NumericTable, checkpoint: Option<&Path>) -> CliResult<LstmAutoencoder> {
    match checkpoint {
        Some(path) => load_checkpoint(path).map_err(|e| e.to_string()),
        None => LstmAutoencoder::new(ModelConfig::default().with_input_dim(table.n_features()))
            .map_err(|e| e.to_string()),
    }
}

fn load_and_score(input: &Path, checkpoint: Option<&Path>) -> CliResult<(NumericTable, Vec<f64>)> {
    let table = load_csv(input).map_err(|e| e.to_string())?;
    eprintln!(
        "Loaded {} rows x {} columns from {:?}",
        table.n_rows(),
        table.n_features(),
        input.file_name().unwrap_or_default()
    );
    let model = model_for(&table, checkpoint)?;
    let scores = score(&table, &model).map_err(|e| e.to_string())?;
    Ok((table, scores))
}

/// Run train command
fn run_train(
    csv: PathBuf,
    out: PathBuf,
    epochs: usize,
    lr: f64,
    model_config: ModelConfig,
) -> CliResult<()> {
    let trained = train_from_csv(&csv, model_config, TrainConfig::new(epochs, lr, out))
        .map_err(|e| e.to_string())?;

    let config = trained.model.config();
    println!(
        "Trained {} epoch(s): input_dim={}, hidden_dim={}, latent_dim={}, n_layers={}",
        trained.history.len(),
        config.input_dim,
        config.hidden_dim,
        config.latent_dim,
        config.n_layers
    );
    if let Some(loss) = trained.final_loss() {
        println!("Final loss: {:.6}", loss);
    }
    println!("Checkpoint written to {:?}", trained.checkpoint_path);
    Ok(())
}

/// Run score command
fn run_score(
    input: PathBuf,
    checkpoint: Option<PathBuf>,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let (_, scores) = load_and_score(&input, checkpoint.as_deref())?;
    let json = serde_json::json!({ "scores": scores });

    if let Some(path) = output {
        let mut file = File::create(&path).map_err(|e| format!("Failed to create output: {}", e))?;
        serde_json::to_writer_pretty(&mut file, &json)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        println!("Scores written to {:?}", path);
    } else {
        let text = serde_json::to_string_pretty(&json)
            .map_err(|e| format!("Failed to encode JSON: {}", e))?;
        println!("{}", text);
    }
    Ok(())
}

/// Run analyze command
fn run_analyze(input: PathBuf, checkpoint: Option<PathBuf>) -> CliResult<()> {
    let (_, scores) = load_and_score(&input, checkpoint.as_deref())?;
    let report = Summarizer::default().summarize(&scores);
    println!("{}", report.summary);
    Ok(())
}

/// Run inspect command
fn run_inspect(checkpoint: PathBuf) -> CliResult<()> {
    let config = inspect_checkpoint(&checkpoint).map_err(|e| e.to_string())?;
    let text = serde_json::to_string_pretty(&config)
        .map_err(|e| format!("Failed to encode JSON: {}", e))?;
    println!("{}", text);
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anomaly_core=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Train {
            csv,
            out,
            epochs,
            lr,
            hidden_dim,
            latent_dim,
            layers,
        } => run_train(
            csv,
            out,
            epochs,
            lr,
            ModelConfig::new(1, hidden_dim, latent_dim, layers),
        ),

        Commands::Score {
            input,
            checkpoint,
            output,
        } => run_score(input, checkpoint, output),

        Commands::Analyze { input, checkpoint } => run_analyze(input, checkpoint),

        Commands::Inspect { checkpoint } => run_inspect(checkpoint),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
