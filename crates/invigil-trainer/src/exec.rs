//! External-tool invocation shared by both pipelines.

use std::io::ErrorKind;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::info;

/// An external trainer CLI this crate delegates to.
#[derive(Debug, Clone, Copy)]
pub struct ExternalTool {
    /// Executable name looked up on `PATH`.
    pub program: &'static str,
    /// One-line install hint shown when the executable is missing.
    pub install_hint: &'static str,
}

/// LLaMA-Factory command line (judge fine-tuning and adapter merge).
pub const LLAMAFACTORY: ExternalTool = ExternalTool {
    program: "llamafactory-cli",
    install_hint: "pip install llamafactory",
};

/// Ultralytics command line (watchdog training, validation, ONNX export).
pub const YOLO: ExternalTool = ExternalTool {
    program: "yolo",
    install_hint: "pip install ultralytics",
};

impl ExternalTool {
    /// Runs the tool with the given arguments, inheriting stdio so the
    /// trainer's own progress output reaches the operator.
    ///
    /// A missing executable is the one failure handled specially: it is
    /// reported with the install hint instead of a raw OS error. Everything
    /// else (training crashes, bad datasets, no GPU) propagates as the
    /// tool's nonzero exit status.
    pub fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        info!(program = self.program, ?args, "invoking external tool");

        let status = match Command::new(self.program).args(&args).status() {
            Ok(status) => status,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                bail!(
                    "`{}` not found on PATH. Install it first: {}",
                    self.program,
                    self.install_hint
                );
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to spawn `{}`", self.program));
            }
        };

        if !status.success() {
            bail!(
                "`{}` exited with status {:?}",
                self.program,
                status.code()
            );
        }

        Ok(())
    }
}
