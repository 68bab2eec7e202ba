//! Typed LLaMA-Factory configuration artifacts.
//!
//! The trainer consumes these files verbatim; the structs here only pin the
//! key names and the defaults that work for webcam-frame SFT.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::DATASET_NAME;

/// Knobs exposed on the command line; everything else is fixed policy.
#[derive(Debug, Clone)]
pub struct TrainKnobs {
    pub model_name: String,
    pub epochs: u32,
    pub batch_size: u32,
    pub learning_rate: f64,
    pub lora_rank: u32,
}

/// LLaMA-Factory SFT configuration, serialized to `train_config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoraTrainConfig {
    pub model_name_or_path: String,
    pub stage: String,
    pub do_train: bool,
    pub finetuning_type: String,
    pub lora_rank: u32,
    pub lora_alpha: u32,
    pub lora_target: String,
    pub dataset: String,
    pub template: String,
    pub cutoff_len: u32,
    pub max_samples: u32,
    pub overwrite_cache: bool,
    pub preprocessing_num_workers: u32,
    pub output_dir: String,
    pub logging_steps: u32,
    pub save_steps: u32,
    pub save_total_limit: u32,
    pub plot_loss: bool,
    pub overwrite_output_dir: bool,
    pub per_device_train_batch_size: u32,
    pub gradient_accumulation_steps: u32,
    pub learning_rate: f64,
    pub num_train_epochs: u32,
    pub lr_scheduler_type: String,
    pub warmup_ratio: f64,
    pub bf16: bool,
    pub ddp_timeout: u64,
    pub val_size: f64,
    pub evaluation_strategy: String,
    pub eval_steps: u32,
    pub per_device_eval_batch_size: u32,
}

impl LoraTrainConfig {
    /// Builds the SFT config for the given knobs.
    ///
    /// LoRA alpha follows the usual 2x-rank rule; the chat template is
    /// selected from the base-model family.
    #[must_use]
    pub fn new(knobs: &TrainKnobs, output_dir: &Path) -> Self {
        Self {
            model_name_or_path: knobs.model_name.clone(),
            stage: "sft".to_string(),
            do_train: true,
            finetuning_type: "lora".to_string(),
            lora_rank: knobs.lora_rank,
            lora_alpha: knobs.lora_rank * 2,
            lora_target: "all".to_string(),
            dataset: DATASET_NAME.to_string(),
            template: template_for(&knobs.model_name).to_string(),
            cutoff_len: 2048,
            max_samples: 10_000,
            overwrite_cache: true,
            preprocessing_num_workers: 4,
            output_dir: output_dir.display().to_string(),
            logging_steps: 10,
            save_steps: 100,
            save_total_limit: 3,
            plot_loss: true,
            overwrite_output_dir: true,
            per_device_train_batch_size: knobs.batch_size,
            gradient_accumulation_steps: 4,
            learning_rate: knobs.learning_rate,
            num_train_epochs: knobs.epochs,
            lr_scheduler_type: "cosine".to_string(),
            warmup_ratio: 0.1,
            bf16: true,
            ddp_timeout: 180_000_000,
            val_size: 0.05,
            evaluation_strategy: "steps".to_string(),
            eval_steps: 100,
            per_device_eval_batch_size: 1,
        }
    }

    /// Writes `train_config.yaml` under the output directory.
    pub fn write_yaml(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("creating {}", output_dir.display()))?;
        let path = output_dir.join("train_config.yaml");
        let yaml = serde_yaml::to_string(self).context("serializing training config")?;
        fs::write(&path, yaml).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "training config written");
        Ok(path)
    }
}

/// Writes both trainer inputs — `train_config.yaml` and
/// `dataset_info.json` — for the given knobs and dataset, returning the
/// config path to pass to `llamafactory-cli train`.
///
/// Single generation path for the `config` and `train` actions, so the two
/// cannot drift.
pub fn write_config_artifacts(
    knobs: &TrainKnobs,
    train_jsonl: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let config = LoraTrainConfig::new(knobs, output_dir);
    let config_path = config.write_yaml(output_dir)?;
    DatasetInfo::for_dataset(train_jsonl).write_json(output_dir)?;
    Ok(config_path)
}

/// Chat template for the base-model family.
fn template_for(model_name: &str) -> &'static str {
    if model_name.to_lowercase().contains("qwen") {
        "qwen_vl"
    } else {
        "llava"
    }
}

/// Per-dataset entry in LLaMA-Factory's `dataset_info.json` registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub file_name: String,
    pub formatting: String,
    pub columns: BTreeMap<String, String>,
}

/// The `dataset_info.json` registry mapping dataset names to files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetInfo(pub BTreeMap<String, DatasetEntry>);

impl DatasetInfo {
    /// Registers the proctoring JSONL under [`DATASET_NAME`] with the
    /// ShareGPT column mapping.
    #[must_use]
    pub fn for_dataset(train_jsonl: &Path) -> Self {
        let mut columns = BTreeMap::new();
        columns.insert("messages".to_string(), "conversations".to_string());
        columns.insert("images".to_string(), "image".to_string());

        let mut datasets = BTreeMap::new();
        datasets.insert(
            DATASET_NAME.to_string(),
            DatasetEntry {
                file_name: train_jsonl.display().to_string(),
                formatting: "sharegpt".to_string(),
                columns,
            },
        );
        Self(datasets)
    }

    /// Writes `dataset_info.json` under the output directory.
    pub fn write_json(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("creating {}", output_dir.display()))?;
        let path = output_dir.join("dataset_info.json");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "dataset info written");
        Ok(path)
    }
}

/// LLaMA-Factory export configuration for merging the LoRA adapter back
/// into the base model, serialized to `merge_config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    pub model_name_or_path: String,
    pub adapter_name_or_path: String,
    pub template: String,
    pub finetuning_type: String,
    pub export_dir: String,
    pub trust_remote_code: bool,
}

impl MergeConfig {
    #[must_use]
    pub fn new(base_model: &str, adapter_dir: &Path, export_dir: &Path) -> Self {
        Self {
            model_name_or_path: base_model.to_string(),
            adapter_name_or_path: adapter_dir.display().to_string(),
            template: template_for(base_model).to_string(),
            finetuning_type: "lora".to_string(),
            export_dir: export_dir.display().to_string(),
            trust_remote_code: true,
        }
    }

    /// Writes `merge_config.yaml` next to the adapter.
    pub fn write_yaml(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("creating {}", output_dir.display()))?;
        let path = output_dir.join("merge_config.yaml");
        let yaml = serde_yaml::to_string(self).context("serializing merge config")?;
        fs::write(&path, yaml).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "merge config written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knobs() -> TrainKnobs {
        TrainKnobs {
            model_name: "Qwen/Qwen-VL-Chat".to_string(),
            epochs: 3,
            batch_size: 2,
            learning_rate: 2e-4,
            lora_rank: 64,
        }
    }

    #[test]
    fn qwen_models_get_qwen_template() {
        let config = LoraTrainConfig::new(&knobs(), Path::new("runs/vlm-judge"));
        assert_eq!(config.template, "qwen_vl");
        assert_eq!(config.lora_alpha, 128);
        assert_eq!(config.stage, "sft");

        let mut llava = knobs();
        llava.model_name = "liuhaotian/llava-v1.5-7b".to_string();
        let config = LoraTrainConfig::new(&llava, Path::new("runs/vlm-judge"));
        assert_eq!(config.template, "llava");
    }

    #[test]
    fn train_config_yaml_uses_llamafactory_keys() {
        let config = LoraTrainConfig::new(&knobs(), Path::new("runs/vlm-judge"));
        let yaml = serde_yaml::to_string(&config).unwrap();
        for key in [
            "model_name_or_path",
            "finetuning_type: lora",
            "lora_rank: 64",
            "dataset: proctoring_vlm",
            "lr_scheduler_type: cosine",
            "per_device_train_batch_size: 2",
            "bf16: true",
        ] {
            assert!(yaml.contains(key), "missing {key:?} in:\n{yaml}");
        }
    }

    #[test]
    fn train_config_roundtrips_through_yaml() {
        let config = LoraTrainConfig::new(&knobs(), Path::new("out"));
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: LoraTrainConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.lora_rank, config.lora_rank);
        assert_eq!(back.learning_rate, config.learning_rate);
    }

    #[test]
    fn dataset_info_registers_sharegpt_columns() {
        let info = DatasetInfo::for_dataset(Path::new("/data/train.jsonl"));
        let entry = info.0.get(DATASET_NAME).unwrap();
        assert_eq!(entry.formatting, "sharegpt");
        assert_eq!(entry.columns.get("messages").unwrap(), "conversations");
        assert_eq!(entry.columns.get("images").unwrap(), "image");

        // transparent wire form: top-level object keyed by dataset name
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.starts_with(&format!("{{\"{DATASET_NAME}\"")));
    }

    #[test]
    fn write_config_artifacts_emits_both_trainer_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let train_jsonl = dir.path().join("train.jsonl");

        let config_path = write_config_artifacts(&knobs(), &train_jsonl, dir.path()).unwrap();
        assert!(config_path.ends_with("train_config.yaml"));
        assert!(config_path.exists());
        assert!(dir.path().join("dataset_info.json").exists());

        let registry = std::fs::read_to_string(dir.path().join("dataset_info.json")).unwrap();
        assert!(registry.contains("train.jsonl"));
        assert!(registry.contains("sharegpt"));
    }

    #[test]
    fn artifacts_land_in_output_dir() {
        let dir = tempfile::tempdir().unwrap();

        let config = LoraTrainConfig::new(&knobs(), dir.path());
        let yaml_path = config.write_yaml(dir.path()).unwrap();
        assert!(yaml_path.ends_with("train_config.yaml"));
        assert!(yaml_path.exists());

        let info = DatasetInfo::for_dataset(&dir.path().join("train.jsonl"));
        let json_path = info.write_json(dir.path()).unwrap();
        assert!(json_path.exists());

        let merge = MergeConfig::new("Qwen/Qwen-VL-Chat", dir.path(), &dir.path().join("merged"));
        let merge_path = merge.write_yaml(dir.path()).unwrap();
        let contents = std::fs::read_to_string(merge_path).unwrap();
        assert!(contents.contains("finetuning_type: lora"));
        assert!(contents.contains("template: qwen_vl"));
    }
}
