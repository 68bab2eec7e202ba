//! Fine-tuning driver for the vision-language proctoring judge.
//!
//! `prepare` writes the seed JSONL dataset, `config` generates the
//! LLaMA-Factory YAML and dataset registry without training, `train` runs
//! the LoRA fine-tune, and `merge` folds the adapter back into the base
//! model for deployment.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use invigil_trainer::judge::config::{TrainKnobs, write_config_artifacts};
use invigil_trainer::judge::{self, BASE_MODEL};

#[derive(Parser)]
#[command(name = "finetune-judge")]
#[command(about = "Fine-tune a Vision LLM as the proctoring judge")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base model name
    #[arg(short, long, default_value = BASE_MODEL)]
    model: String,

    /// Dataset directory
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Output directory for configs, adapter, and merged model
    #[arg(short, long, default_value = "runs/vlm-judge")]
    output: PathBuf,

    /// Training epochs
    #[arg(long, default_value_t = 3)]
    epochs: u32,

    /// Per-device batch size
    #[arg(long, default_value_t = 2)]
    batch_size: u32,

    /// Learning rate
    #[arg(long, default_value_t = 2e-4)]
    lr: f64,

    /// LoRA rank (alpha is fixed at 2x rank)
    #[arg(long, default_value_t = 64)]
    lora_rank: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the sample JSONL dataset
    Prepare,
    /// Generate the LLaMA-Factory config without training
    Config,
    /// Run the LoRA fine-tune via llamafactory-cli
    Train,
    /// Merge the LoRA adapter into the base model
    Merge,
}

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run() {
        eprintln!("finetune-judge failed: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let dataset_dir = cli
        .dataset
        .unwrap_or_else(|| invigil_trainer::default_dataset_root().join("vlm_proctoring"));
    let knobs = TrainKnobs {
        model_name: cli.model.clone(),
        epochs: cli.epochs,
        batch_size: cli.batch_size,
        learning_rate: cli.lr,
        lora_rank: cli.lora_rank,
    };

    match cli.command {
        Commands::Prepare => {
            judge::write_sample_dataset(&dataset_dir)?;
        }
        Commands::Config => {
            let train_jsonl = dataset_dir.join("train.jsonl");
            let config_path = write_config_artifacts(&knobs, &train_jsonl, &cli.output)?;

            println!("LLaMA-Factory config written to: {}", config_path.display());
            println!("\nTo train with LLaMA-Factory:");
            println!("  pip install llamafactory");
            println!("  llamafactory-cli train {}", config_path.display());
        }
        Commands::Train => {
            let train_jsonl = dataset_dir.join("train.jsonl");
            judge::run_training(&knobs, &train_jsonl, &cli.output)?;
        }
        Commands::Merge => {
            let export_dir = cli.output.join("merged");
            judge::merge_adapter(&cli.model, &cli.output, &export_dir)?;
        }
    }

    Ok(())
}
