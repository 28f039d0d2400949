// Sample images offered on the start screen.

use anyhow::{bail, Context};
use reqwest::blocking::Client as HttpClient;
use retouch_core::Artifact;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleImage {
    pub label: &'static str,
    pub url: &'static str,
}

impl SampleImage {
    /// Uploaded samples are named `sample-<label>.jpg`.
    pub fn file_name(&self) -> String {
        format!("sample-{}.jpg", self.label.to_lowercase())
    }
}

pub static SAMPLES: [SampleImage; 4] = [
    SampleImage {
        label: "Portrait",
        url: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?auto=format&fit=crop&w=400&h=300",
    },
    SampleImage {
        label: "Landscape",
        url: "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?auto=format&fit=crop&w=400&h=300",
    },
    SampleImage {
        label: "Product",
        url: "https://images.unsplash.com/photo-1542291026-7eec264c27ff?auto=format&fit=crop&w=400&h=300",
    },
    SampleImage {
        label: "Architecture",
        url: "https://images.unsplash.com/photo-1518780664697-55e3ad937233?auto=format&fit=crop&w=400&h=300",
    },
];

pub fn find_sample(label: &str) -> Option<&'static SampleImage> {
    SAMPLES.iter().find(|s| s.label.eq_ignore_ascii_case(label))
}

/// Download a sample and turn it into an upload.
pub fn fetch_sample(sample: &SampleImage, timeout: Duration) -> anyhow::Result<Artifact> {
    let client = HttpClient::builder()
        .timeout(timeout)
        .build()
        .context("build http client")?;
    let response = client
        .get(sample.url)
        .header("User-Agent", "retouch-sample-loader")
        .send()
        .with_context(|| format!("fetch sample {}", sample.label))?;

    let status = response.status();
    if !status.is_success() {
        bail!("Failed to load sample image {}: HTTP {}", sample.label, status.as_u16());
    }

    let bytes = response
        .bytes()
        .with_context(|| format!("read sample {}", sample.label))?;
    let artifact = Artifact::from_bytes(sample.file_name(), bytes.to_vec())?;
    info!("Loaded sample {} ({} bytes)", artifact.name(), artifact.len());
    Ok(artifact)
}
