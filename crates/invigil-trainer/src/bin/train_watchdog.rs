//! Training driver for the proctoring watchdog object detector.
//!
//! `yaml` emits the dataset config, `download` pulls a labeled dataset from
//! Roboflow Universe, `train` runs the detector training, `validate` reports
//! held-out metrics, and `export` produces the browser-ready ONNX artifact.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use invigil_trainer::watchdog::{
    DatasetConfig, ModelSize, RoboflowSource, TrainParams, export_to_onnx, run_validation,
};

#[derive(Parser)]
#[command(name = "train-watchdog")]
#[command(about = "Train the proctoring watchdog object detector")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Dataset directory
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Model size (nano is best for browser deployment)
    #[arg(short = 's', long, value_enum, default_value_t = ModelSize::N)]
    model_size: ModelSize,

    /// Training epochs
    #[arg(long, default_value_t = 50)]
    epochs: u32,

    /// Square image size
    #[arg(long, default_value_t = 640)]
    imgsz: u32,

    /// Batch size
    #[arg(long, default_value_t = 16)]
    batch: u32,

    /// GPU device selector, or "cpu"
    #[arg(long, default_value = "0")]
    device: String,

    /// Trained checkpoint (for export/validate)
    #[arg(long, default_value = "runs/proctoring/watchdog/weights/best.pt")]
    model_path: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the dataset YAML
    Yaml,
    /// Download a labeled dataset from Roboflow Universe
    Download {
        /// Roboflow API key
        #[arg(long, env = "ROBOFLOW_API_KEY")]
        roboflow_key: String,
        /// Roboflow workspace name
        #[arg(long)]
        roboflow_workspace: String,
        /// Roboflow project name
        #[arg(long)]
        roboflow_project: String,
        /// Dataset version
        #[arg(long, default_value_t = 1)]
        roboflow_version: u32,
    },
    /// Train the detector
    Train,
    /// Validate a trained checkpoint
    Validate,
    /// Export to ONNX for browser inference
    Export {
        /// Directory the web app serves models from
        #[arg(long, default_value = "public/models")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        eprintln!("train-watchdog failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let dataset_dir = cli
        .dataset
        .unwrap_or_else(|| invigil_trainer::default_dataset_root().join("proctoring"));

    match cli.command {
        Commands::Yaml => {
            DatasetConfig::new(&dataset_dir).write_yaml(&dataset_dir)?;
        }
        Commands::Download {
            roboflow_key,
            roboflow_workspace,
            roboflow_project,
            roboflow_version,
        } => {
            let source = RoboflowSource {
                api_key: roboflow_key,
                workspace: roboflow_workspace,
                project: roboflow_project,
                version: roboflow_version,
            };
            source.download(&dataset_dir).await?;
        }
        Commands::Train => {
            let yaml_path = DatasetConfig::new(&dataset_dir).write_yaml(&dataset_dir)?;
            let params = TrainParams {
                model_size: cli.model_size,
                epochs: cli.epochs,
                imgsz: cli.imgsz,
                batch: cli.batch,
                device: cli.device,
                ..TrainParams::default()
            };
            params.run(&yaml_path)?;
        }
        Commands::Validate => {
            let yaml_path = DatasetConfig::new(&dataset_dir).write_yaml(&dataset_dir)?;
            run_validation(&cli.model_path, &yaml_path)?;
        }
        Commands::Export { output_dir } => {
            export_to_onnx(&cli.model_path, cli.imgsz, &output_dir)?;
        }
    }

    Ok(())
}
