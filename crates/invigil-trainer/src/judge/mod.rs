//! Judge pipeline: LoRA fine-tuning of the vision-language proctor.
//!
//! `prepare` emits a ShareGPT-style JSONL dataset, `config` generates the
//! LLaMA-Factory YAML + dataset registry, `train` and `merge` delegate to
//! `llamafactory-cli`.

pub mod config;
pub mod dataset;
pub mod invoke;

pub use config::{DatasetInfo, LoraTrainConfig, MergeConfig};
pub use dataset::write_sample_dataset;
pub use invoke::{merge_adapter, run_training};

/// Default judge base model.
pub const BASE_MODEL: &str = "Qwen/Qwen-VL-Chat";

/// Dataset name registered with LLaMA-Factory.
pub const DATASET_NAME: &str = "proctoring_vlm";
