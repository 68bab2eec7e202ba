//! Detector training via the ultralytics `yolo` CLI.

use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use tracing::info;

use crate::exec::YOLO;

/// Detector model size. Nano is the deployment default: it is the only size
/// that keeps browser-side inference interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelSize {
    N,
    S,
    M,
    L,
    X,
}

impl ModelSize {
    /// Pretrained base weights for this size.
    #[must_use]
    pub fn base_weights(self) -> &'static str {
        match self {
            Self::N => "yolo11n.pt",
            Self::S => "yolo11s.pt",
            Self::M => "yolo11m.pt",
            Self::L => "yolo11l.pt",
            Self::X => "yolo11x.pt",
        }
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Self::N => "n",
            Self::S => "s",
            Self::M => "m",
            Self::L => "l",
            Self::X => "x",
        };
        f.write_str(letter)
    }
}

/// Hyperparameters tuned for webcam proctoring footage: strong color/flip
/// augmentation, mild rotation, mosaic on.
const HYPERPARAMETERS: &[(&str, &str)] = &[
    ("lr0", "0.01"),
    ("lrf", "0.01"),
    ("momentum", "0.937"),
    ("weight_decay", "0.0005"),
    ("warmup_epochs", "3.0"),
    ("warmup_momentum", "0.8"),
    ("box", "7.5"),
    ("cls", "0.5"),
    ("dfl", "1.5"),
    ("hsv_h", "0.015"),
    ("hsv_s", "0.7"),
    ("hsv_v", "0.4"),
    ("degrees", "10.0"),
    ("translate", "0.1"),
    ("scale", "0.5"),
    ("fliplr", "0.5"),
    ("mosaic", "1.0"),
];

/// Training run parameters.
#[derive(Debug, Clone)]
pub struct TrainParams {
    pub model_size: ModelSize,
    pub epochs: u32,
    pub imgsz: u32,
    pub batch: u32,
    /// GPU device selector, or "cpu".
    pub device: String,
    pub project: String,
    pub name: String,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            model_size: ModelSize::N,
            epochs: 50,
            imgsz: 640,
            batch: 16,
            device: "0".to_string(),
            project: "runs/proctoring".to_string(),
            name: "watchdog".to_string(),
        }
    }
}

impl TrainParams {
    /// Renders the `yolo detect train` argument list for the given dataset.
    #[must_use]
    pub fn cli_args(&self, dataset_yaml: &Path) -> Vec<String> {
        let mut args = vec![
            "detect".to_string(),
            "train".to_string(),
            format!("model={}", self.model_size.base_weights()),
            format!("data={}", dataset_yaml.display()),
            format!("epochs={}", self.epochs),
            format!("imgsz={}", self.imgsz),
            format!("batch={}", self.batch),
            format!("device={}", self.device),
            format!("project={}", self.project),
            format!("name={}", self.name),
        ];
        args.extend(
            HYPERPARAMETERS
                .iter()
                .map(|(key, value)| format!("{key}={value}")),
        );
        args
    }

    /// Where the trainer leaves the best checkpoint.
    #[must_use]
    pub fn best_weights(&self) -> String {
        format!("{}/{}/weights/best.pt", self.project, self.name)
    }

    /// Runs the training to completion.
    pub fn run(&self, dataset_yaml: &Path) -> Result<()> {
        info!(
            model = self.model_size.base_weights(),
            epochs = self.epochs,
            imgsz = self.imgsz,
            "starting watchdog training"
        );
        println!(
            "Starting training: {} epochs, image size {}",
            self.epochs, self.imgsz
        );
        YOLO.run(self.cli_args(dataset_yaml))?;

        println!("\nTraining complete!");
        println!("Best model saved to: {}", self.best_weights());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nano_is_the_default_size() {
        let params = TrainParams::default();
        assert_eq!(params.model_size, ModelSize::N);
        assert_eq!(params.model_size.base_weights(), "yolo11n.pt");
        assert_eq!(params.epochs, 50);
        assert_eq!(params.imgsz, 640);
    }

    #[test]
    fn cli_args_carry_run_settings() {
        let mut params = TrainParams::default();
        params.model_size = ModelSize::S;
        params.device = "cpu".to_string();
        let args = params.cli_args(Path::new("proctoring_data.yaml"));

        assert_eq!(args[0], "detect");
        assert_eq!(args[1], "train");
        assert!(args.contains(&"model=yolo11s.pt".to_string()));
        assert!(args.contains(&"data=proctoring_data.yaml".to_string()));
        assert!(args.contains(&"device=cpu".to_string()));
    }

    #[test]
    fn cli_args_include_webcam_hyperparameters() {
        let args = TrainParams::default().cli_args(Path::new("data.yaml"));
        for pinned in ["lr0=0.01", "mosaic=1.0", "fliplr=0.5", "degrees=10.0", "dfl=1.5"] {
            assert!(args.contains(&pinned.to_string()), "missing {pinned}");
        }
    }

    #[test]
    fn best_weights_follows_project_layout() {
        let params = TrainParams::default();
        assert_eq!(params.best_weights(), "runs/proctoring/watchdog/weights/best.pt");
    }
}
