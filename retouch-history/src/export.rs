//! Download boundary: write the current artifact to disk.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use retouch_core::Artifact;

use crate::History;

/// Downloads are named `edited-<artifact name>`.
pub fn download_name(artifact: &Artifact) -> String {
    format!("edited-{}", artifact.name())
}

/// Write `artifact` into `dir` under its download name. Returns the written path.
pub fn export_artifact(dir: impl AsRef<Path>, artifact: &Artifact) -> anyhow::Result<PathBuf> {
    let dir = dir.as_ref();
    // fs::write does NOT create directories
    fs::create_dir_all(dir).with_context(|| format!("create output dir: {}", dir.display()))?;

    let path = dir.join(download_name(artifact));
    fs::write(&path, artifact.bytes())
        .with_context(|| format!("write image file: {}", path.display()))?;
    info!("Exported {} ({} bytes)", path.display(), artifact.len());
    Ok(path)
}

/// Export whatever the history cursor points at.
pub fn export_current(dir: impl AsRef<Path>, history: &History) -> anyhow::Result<PathBuf> {
    let current = history.current().context("no image loaded to download")?;
    export_artifact(dir, current)
}
