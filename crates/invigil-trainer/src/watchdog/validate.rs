//! Validation of a trained checkpoint against the dataset.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::exec::YOLO;

/// Renders the `yolo detect val` argument list.
#[must_use]
pub fn validation_args(model_path: &Path, dataset_yaml: &Path) -> Vec<String> {
    vec![
        "detect".to_string(),
        "val".to_string(),
        format!("model={}", model_path.display()),
        format!("data={}", dataset_yaml.display()),
    ]
}

/// Runs validation; mAP/precision/recall are printed by the tool itself.
pub fn run_validation(model_path: &Path, dataset_yaml: &Path) -> Result<()> {
    anyhow::ensure!(
        model_path.exists(),
        "trained model not found: {} (run the `train` action first)",
        model_path.display()
    );

    info!(model = %model_path.display(), "validating watchdog model");
    YOLO.run(validation_args(model_path, dataset_yaml))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_args_reference_model_and_data() {
        let args = validation_args(Path::new("best.pt"), Path::new("proctoring_data.yaml"));
        assert_eq!(args[..2], ["detect".to_string(), "val".to_string()]);
        assert!(args.contains(&"model=best.pt".to_string()));
        assert!(args.contains(&"data=proctoring_data.yaml".to_string()));
    }

    #[test]
    fn validation_requires_trained_model() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_validation(&dir.path().join("best.pt"), Path::new("data.yaml")).unwrap_err();
        assert!(err.to_string().contains("train"));
    }
}
