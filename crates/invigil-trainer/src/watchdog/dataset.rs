//! Dataset YAML for the detector trainer.
//!
//! The names block is rendered from [`WatchdogClass::ALL`], so the indices
//! the trainer bakes into the model are the same table the browser consumer
//! compiles against.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use invigil_core::types::WatchdogClass;

/// Detector dataset configuration, serialized to `proctoring_data.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Dataset root directory.
    pub path: String,
    /// Training images, relative to `path`.
    pub train: String,
    /// Validation images, relative to `path`.
    pub val: String,
    /// Test images, relative to `path`.
    pub test: String,
    /// Number of classes.
    pub nc: usize,
    /// Frozen index-to-name table.
    pub names: BTreeMap<usize, String>,
}

impl DatasetConfig {
    /// Builds the config for a dataset root, with the standard split layout.
    #[must_use]
    pub fn new(dataset_root: &Path) -> Self {
        let names = WatchdogClass::ALL
            .iter()
            .map(|class| (class.index(), class.name().to_string()))
            .collect();

        Self {
            path: dataset_root.display().to_string(),
            train: "images/train".to_string(),
            val: "images/val".to_string(),
            test: "images/test".to_string(),
            nc: WatchdogClass::COUNT,
            names,
        }
    }

    /// Writes `proctoring_data.yaml` under the given directory.
    pub fn write_yaml(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("creating {}", output_dir.display()))?;
        let path = output_dir.join("proctoring_data.yaml");
        let yaml = serde_yaml::to_string(self).context("serializing dataset config")?;
        fs::write(&path, yaml).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "dataset YAML written");
        println!("Dataset YAML written to: {}", path.display());
        Ok(path)
    }
}
