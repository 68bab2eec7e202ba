//! # Invigil Trainer
//!
//! Offline pipelines that prepare configuration for and invoke the external
//! training frameworks behind the Invigil proctoring system:
//!
//! - the **judge** pipeline fine-tunes a vision-language model with LoRA
//!   via LLaMA-Factory (`finetune-judge` binary), and
//! - the **watchdog** pipeline trains the object detector via the
//!   ultralytics `yolo` CLI and exports it to ONNX for browser inference
//!   (`train-watchdog` binary).
//!
//! Both pipelines are one-shot batch runs. All model math happens inside
//! the external tools; this crate owns the generated datasets, configs,
//! and process invocation.

pub mod exec;
pub mod judge;
pub mod watchdog;

use std::path::PathBuf;

/// Default root for downloaded/prepared datasets when no `--dataset` flag
/// is given.
#[must_use]
pub fn default_dataset_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invigil")
        .join("datasets")
}
