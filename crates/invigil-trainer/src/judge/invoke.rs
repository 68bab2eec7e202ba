//! Delegation to `llamafactory-cli` for training and adapter merge.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::config::{MergeConfig, TrainKnobs, write_config_artifacts};
use crate::exec::LLAMAFACTORY;

/// Generates the config artifacts and runs `llamafactory-cli train`.
pub fn run_training(knobs: &TrainKnobs, train_jsonl: &Path, output_dir: &Path) -> Result<()> {
    anyhow::ensure!(
        train_jsonl.exists(),
        "training data not found: {} (run the `prepare` action first)",
        train_jsonl.display()
    );

    let config_path = write_config_artifacts(knobs, train_jsonl, output_dir)?;

    info!(model = %knobs.model_name, epochs = knobs.epochs, "starting LoRA fine-tuning");
    LLAMAFACTORY.run(["train".to_string(), config_path.display().to_string()])?;

    println!("\nLoRA adapter saved to: {}", output_dir.display());
    Ok(())
}

/// Generates the merge config and runs `llamafactory-cli export`, then
/// prints deployment guidance for the merged model.
pub fn merge_adapter(base_model: &str, adapter_dir: &Path, export_dir: &Path) -> Result<()> {
    anyhow::ensure!(
        adapter_dir.exists(),
        "adapter directory not found: {} (run the `train` action first)",
        adapter_dir.display()
    );

    let merge = MergeConfig::new(base_model, adapter_dir, export_dir);
    let config_path = merge
        .write_yaml(adapter_dir)
        .context("writing merge config")?;

    info!(base = base_model, "merging LoRA adapter into base model");
    LLAMAFACTORY.run(["export".to_string(), config_path.display().to_string()])?;

    println!("\nMerged model saved to: {}", export_dir.display());
    println!("\nDeploy with vLLM:");
    println!("  pip install vllm");
    println!("  python -m vllm.entrypoints.openai.api_server \\");
    println!("    --model {} \\", export_dir.display());
    println!("    --port 8000 \\");
    println!("    --trust-remote-code");
    println!("\nThen set in the edge-function secrets:");
    println!("  CUSTOM_VLM_ENDPOINT=http://your-gpu-server:8000/v1");
    println!("  CUSTOM_VLM_API_KEY=your-api-key");
    Ok(())
}
