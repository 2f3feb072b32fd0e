// ============================================================
// Layer 5 — Backend Bridge
// ============================================================
// The neural model is a separate program. This bridge spawns it
// with two fixed entry points:
//
//   <backend> train   --data-dir <dir> --output <dir> [flags]
//   <backend> predict --model <dir> --image <path>
//
// `train` inherits stdio so the backend's own progress output
// reaches the terminal; `predict` captures stdout and returns
// the trimmed text. A non-zero exit from either surfaces the
// backend's stderr in the error.
//
// Training hyperparameters are opaque to this crate: the config
// map is flattened into `--key value` flags in sorted key order,
// so the spawned command line is reproducible run to run.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::traits::{ModelTrainer, Transcriber};

/// Child-process bridge to the external training backend.
#[derive(Debug, Clone)]
pub struct BackendBridge {
    program:   PathBuf,
    model_dir: PathBuf,
    training:  BTreeMap<String, serde_json::Value>,
}

impl BackendBridge {
    pub fn new(program: impl Into<PathBuf>, model_dir: impl Into<PathBuf>) -> Self {
        Self {
            program:   program.into(),
            model_dir: model_dir.into(),
            training:  BTreeMap::new(),
        }
    }

    /// Attach the opaque training map forwarded to `train`.
    pub fn with_training_options(
        mut self,
        options: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        self.training = options;
        self
    }
}

impl ModelTrainer for BackendBridge {
    fn train(&self, data_dir: &Path) -> Result<()> {
        let args = train_command_args(data_dir, &self.model_dir, &self.training);
        tracing::info!(
            "spawning {} {}",
            self.program.display(),
            args.iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .with_context(|| {
                format!("failed to invoke training backend {}", self.program.display())
            })?;

        if !status.success() {
            anyhow::bail!("training backend exited with {status}");
        }
        Ok(())
    }
}

impl Transcriber for BackendBridge {
    fn transcribe(&self, image: &Path) -> Result<String> {
        let output = Command::new(&self.program)
            .args(predict_command_args(&self.model_dir, image))
            .output()
            .with_context(|| {
                format!(
                    "failed to invoke prediction backend {}",
                    self.program.display()
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("prediction backend failed: {stderr}");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.trim().to_string())
    }
}

// ─── Command assembly ─────────────────────────────────────────────────────────
// Kept as pure functions so the wire contract is testable
// without spawning anything.

fn train_command_args(
    data_dir: &Path,
    model_dir: &Path,
    training: &BTreeMap<String, serde_json::Value>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "train".into(),
        "--data-dir".into(),
        data_dir.as_os_str().into(),
        "--output".into(),
        model_dir.as_os_str().into(),
    ];
    for (key, value) in training {
        args.push(format!("--{key}").into());
        args.push(flag_value(value).into());
    }
    args
}

fn predict_command_args(model_dir: &Path, image: &Path) -> Vec<OsString> {
    vec![
        "predict".into(),
        "--model".into(),
        model_dir.as_os_str().into(),
        "--image".into(),
        image.as_os_str().into(),
    ]
}

/// Strings pass through bare; everything else keeps its JSON form.
fn flag_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
