//! ONNX export for browser-side inference.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::exec::YOLO;

/// Fixed artifact name the web app loads from `/models/`.
pub const ONNX_ARTIFACT: &str = "proctor-yolo.onnx";

/// ONNX opset supported by onnxruntime-web.
const ONNX_OPSET: u32 = 12;

/// Renders the `yolo export` argument list. Static shapes and opset 12 are
/// required by the onnxruntime-web consumer.
#[must_use]
pub fn export_args(model_path: &Path, imgsz: u32) -> Vec<String> {
    vec![
        "export".to_string(),
        format!("model={}", model_path.display()),
        "format=onnx".to_string(),
        format!("imgsz={imgsz}"),
        "simplify=True".to_string(),
        format!("opset={ONNX_OPSET}"),
        "dynamic=False".to_string(),
    ]
}

/// Exports the trained checkpoint to ONNX and copies the artifact to the
/// web app's model directory under its fixed name.
pub fn export_to_onnx(model_path: &Path, imgsz: u32, output_dir: &Path) -> Result<PathBuf> {
    anyhow::ensure!(
        model_path.exists(),
        "trained model not found: {} (run the `train` action first)",
        model_path.display()
    );

    println!("Exporting to ONNX format...");
    YOLO.run(export_args(model_path, imgsz))?;

    // ultralytics writes the .onnx next to the checkpoint
    let exported = model_path.with_extension("onnx");
    anyhow::ensure!(
        exported.exists(),
        "expected exported model at {}",
        exported.display()
    );

    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;
    let artifact = output_dir.join(ONNX_ARTIFACT);
    fs::copy(&exported, &artifact)
        .with_context(|| format!("copying {} to {}", exported.display(), artifact.display()))?;

    let size_mb = fs::metadata(&artifact)?.len() as f64 / 1024.0 / 1024.0;
    info!(path = %artifact.display(), size_mb, "ONNX artifact exported");
    println!("\nONNX model exported to: {}", artifact.display());
    println!("File size: {size_mb:.1} MB");
    println!("\nTo use in the app, the model is available at /models/{ONNX_ARTIFACT}");

    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_args_pin_browser_constraints() {
        let args = export_args(Path::new("best.pt"), 640);
        assert!(args.contains(&"format=onnx".to_string()));
        assert!(args.contains(&"opset=12".to_string()));
        assert!(args.contains(&"dynamic=False".to_string()));
        assert!(args.contains(&"simplify=True".to_string()));
        assert!(args.contains(&"imgsz=640".to_string()));
    }

    #[test]
    fn export_requires_trained_model() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_to_onnx(&dir.path().join("best.pt"), 640, dir.path()).unwrap_err();
        assert!(err.to_string().contains("train"));
    }

    #[test]
    fn artifact_name_is_fixed() {
        assert_eq!(ONNX_ARTIFACT, "proctor-yolo.onnx");
    }
}
