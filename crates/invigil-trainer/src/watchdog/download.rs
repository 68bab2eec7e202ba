//! Dataset download from Roboflow Universe.
//!
//! Uses the Roboflow HTTP export API directly: resolve the export link for
//! the requested project version, stream the zip to disk, and unpack with
//! the system `unzip`.

use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::info;

const ROBOFLOW_API: &str = "https://api.roboflow.com";

/// Export format requested from Roboflow (matches the dataset layout the
/// detector trainer expects).
const EXPORT_FORMAT: &str = "yolov8";

/// A Roboflow Universe dataset version.
#[derive(Debug, Clone)]
pub struct RoboflowSource {
    pub api_key: String,
    pub workspace: String,
    pub project: String,
    pub version: u32,
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
    export: ExportLink,
}

#[derive(Debug, Deserialize)]
struct ExportLink {
    link: String,
}

impl RoboflowSource {
    /// URL that resolves the export link for this dataset version.
    #[must_use]
    pub fn export_url(&self) -> String {
        format!(
            "{ROBOFLOW_API}/{}/{}/{}/{EXPORT_FORMAT}?api_key={}",
            self.workspace, self.project, self.version, self.api_key
        )
    }

    /// Downloads and unpacks the dataset into `output_dir`.
    pub async fn download(&self, output_dir: &Path) -> Result<()> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("creating {}", output_dir.display()))?;

        let client = reqwest::Client::new();

        info!(
            workspace = %self.workspace,
            project = %self.project,
            version = self.version,
            "resolving Roboflow export link"
        );
        let response = client
            .get(self.export_url())
            .send()
            .await
            .context("requesting Roboflow export")?;
        if !response.status().is_success() {
            bail!(
                "Roboflow export request failed with HTTP {} (check workspace/project/version and API key)",
                response.status()
            );
        }
        let export: ExportResponse = response
            .json()
            .await
            .context("decoding Roboflow export response")?;

        info!(link = %export.export.link, "downloading dataset archive");
        let mut response = client
            .get(&export.export.link)
            .send()
            .await
            .context("downloading dataset archive")?
            .error_for_status()
            .context("dataset archive request rejected")?;

        // Exports run to hundreds of MB; write chunk by chunk instead of
        // buffering the whole body.
        let zip_path = output_dir.join("roboflow_export.zip");
        let mut writer = ArchiveWriter::create(&zip_path)?;
        while let Some(chunk) = response
            .chunk()
            .await
            .context("reading dataset archive body")?
        {
            writer.write_chunk(&chunk)?;
        }
        writer.finish()?;

        let status = Command::new("unzip")
            .arg("-o")
            .arg(&zip_path)
            .arg("-d")
            .arg(output_dir)
            .status()
            .context("failed to spawn `unzip` (is it installed?)")?;
        if !status.success() {
            bail!("`unzip` exited with status {:?}", status.code());
        }
        fs::remove_file(&zip_path).ok();

        println!("Dataset downloaded to: {}", output_dir.display());
        Ok(())
    }
}

/// Incremental writer for the dataset archive. Keeps peak memory at one
/// chunk regardless of archive size.
struct ArchiveWriter {
    file: File,
    path: PathBuf,
    written: u64,
}

impl ArchiveWriter {
    fn create(path: &Path) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            written: 0,
        })
    }

    fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.file
            .write_all(chunk)
            .with_context(|| format!("writing {}", self.path.display()))?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.file
            .flush()
            .with_context(|| format!("flushing {}", self.path.display()))?;
        info!(path = %self.path.display(), bytes = self.written, "archive written");
        Ok(())
    }
}
