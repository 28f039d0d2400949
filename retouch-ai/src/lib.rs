//! retouch-ai: the seam between the editor and the generative image service.
//!
//! The editor only ever sees [`EditService`]; [`gemini::GeminiClient`] is the
//! production implementation.

use retouch_core::{Artifact, Hotspot};
use thiserror::Error;

pub mod gemini;
pub mod prompts;
pub mod response;

pub use gemini::{GeminiClient, GeminiConfig};

/// Which service operation a request maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Edit,
    Filter,
    Adjustment,
}

impl EditKind {
    /// Noun used in messages ("the filter", "the adjustment").
    pub fn noun(&self) -> &'static str {
        match self {
            EditKind::Edit => "edit",
            EditKind::Filter => "filter",
            EditKind::Adjustment => "adjustment",
        }
    }

    /// Prefix for names of artifacts this operation produces.
    pub fn artifact_prefix(&self) -> &'static str {
        match self {
            EditKind::Edit => "edited",
            EditKind::Filter => "filtered",
            EditKind::Adjustment => "adjusted",
        }
    }
}

/// One call to the external service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRequest {
    Edit { instruction: String, hotspot: Hotspot },
    Filter { instruction: String },
    Adjustment { instruction: String },
}

impl EditRequest {
    pub fn kind(&self) -> EditKind {
        match self {
            EditRequest::Edit { .. } => EditKind::Edit,
            EditRequest::Filter { .. } => EditKind::Filter,
            EditRequest::Adjustment { .. } => EditKind::Adjustment,
        }
    }

    pub fn instruction(&self) -> &str {
        match self {
            EditRequest::Edit { instruction, .. }
            | EditRequest::Filter { instruction }
            | EditRequest::Adjustment { instruction } => instruction,
        }
    }

    pub fn execute(
        &self,
        service: &dyn EditService,
        image: &Artifact,
    ) -> Result<Artifact, ServiceError> {
        match self {
            EditRequest::Edit {
                instruction,
                hotspot,
            } => service.edit(image, instruction, *hotspot),
            EditRequest::Filter { instruction } => service.filter(image, instruction),
            EditRequest::Adjustment { instruction } => service.adjust(image, instruction),
        }
    }
}

/// The external generative edit service.
pub trait EditService: Send + Sync {
    fn edit(
        &self,
        image: &Artifact,
        instruction: &str,
        hotspot: Hotspot,
    ) -> Result<Artifact, ServiceError>;

    fn filter(&self, image: &Artifact, instruction: &str) -> Result<Artifact, ServiceError>;

    fn adjust(&self, image: &Artifact, instruction: &str) -> Result<Artifact, ServiceError>;
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request was blocked. Reason: {reason}. {message}")]
    Blocked { reason: String, message: String },

    #[error("Image generation for the {} stopped unexpectedly. Reason: {reason}.", .kind.noun())]
    Stopped { kind: EditKind, reason: String },

    #[error("The AI model did not return an image for the {}. {detail}", .kind.noun())]
    NoImage { kind: EditKind, detail: String },

    #[error("could not decode the returned image: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}
