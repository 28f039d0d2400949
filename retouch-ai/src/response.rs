// This defines the JSON we exchange with the image model
// Parse and validate the reply
// Convert it into an image the rest of Retouch can put in history

use retouch_core::{decode_inline, encode_inline, Artifact};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{EditKind, ServiceError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn image(artifact: &Artifact) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: artifact.mime().as_str().to_string(),
                data: encode_inline(artifact),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Body of a `generateContent` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    /// Image first, then the instruction text.
    pub fn image_with_prompt(image: &Artifact, prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::image(image), Part::text(prompt)],
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
    pub block_reason_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateResponse {
    /// Pull the first returned image out of the reply, or explain why there is none.
    pub fn into_artifact(self, kind: EditKind) -> Result<Artifact, ServiceError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            let message = self
                .prompt_feedback
                .and_then(|f| f.block_reason_message)
                .unwrap_or_default();
            warn!("{} request blocked: {}", kind.noun(), reason);
            return Err(ServiceError::Blocked { reason, message });
        }

        let candidate = self.candidates.into_iter().next();
        let parts = candidate
            .as_ref()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default();

        if let Some(inline) = parts.iter().find_map(|p| p.inline_data.as_ref()) {
            let (mime, bytes) = decode_inline(&inline.mime_type, &inline.data)
                .map_err(|e| ServiceError::Decode(e.to_string()))?;
            debug!("Received {} image ({} bytes)", mime, bytes.len());
            return Ok(Artifact::generated(kind.artifact_prefix(), mime, bytes));
        }

        let finish_reason = candidate.as_ref().and_then(|c| c.finish_reason.clone());
        if let Some(reason) = finish_reason.filter(|r| r != "STOP") {
            return Err(ServiceError::Stopped { kind, reason });
        }

        let text: String = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ");
        let detail = if text.trim().is_empty() {
            "This can happen due to safety filters or if the request is too complex. Please try rephrasing your prompt to be more direct.".to_string()
        } else {
            format!("The model responded with text: \"{}\"", text.trim())
        };
        Err(ServiceError::NoImage { kind, detail })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_core::ImageMime;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_puts_image_before_text() {
        let image = Artifact::new("a.png", ImageMime::Png, vec![1u8, 2, 3]);
        let body = serde_json::to_value(GenerateRequest::image_with_prompt(&image, "brighter")).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"inlineData": {"mimeType": "image/png", "data": "AQID"}},
                        {"text": "brighter"}
                    ]
                }]
            })
        );
    }

    #[test]
    fn extracts_inline_image() {
        let response = parse(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "here you go"},
                    {"inlineData": {"mimeType": "image/png", "data": "AQID"}}
                ]},
                "finishReason": "STOP"
            }]
        }));
        let artifact = response.into_artifact(EditKind::Filter).unwrap();
        assert_eq!(artifact.bytes(), &[1, 2, 3]);
        assert_eq!(artifact.mime(), ImageMime::Png);
        assert!(artifact.name().starts_with("filtered-"));
    }

    #[test]
    fn blocked_prompt() {
        let response = parse(json!({
            "promptFeedback": {"blockReason": "SAFETY", "blockReasonMessage": "nope"}
        }));
        let err = response.into_artifact(EditKind::Edit).unwrap_err();
        assert!(matches!(err, ServiceError::Blocked { ref reason, .. } if reason == "SAFETY"));
        assert_eq!(err.to_string(), "Request was blocked. Reason: SAFETY. nope");
    }

    #[test]
    fn unexpected_finish_reason() {
        let response = parse(json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "IMAGE_SAFETY"}]
        }));
        let err = response.into_artifact(EditKind::Adjustment).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Image generation for the adjustment stopped unexpectedly. Reason: IMAGE_SAFETY."
        );
    }

    #[test]
    fn text_only_reply() {
        let response = parse(json!({
            "candidates": [{"content": {"parts": [{"text": "I cannot do that"}]}, "finishReason": "STOP"}]
        }));
        let err = response.into_artifact(EditKind::Edit).unwrap_err();
        assert!(err.to_string().contains("I cannot do that"));
    }

    #[test]
    fn undecodable_image_is_a_decode_error() {
        let response = parse(json!({
            "candidates": [{
                "content": {"parts": [{"inlineData": {"mimeType": "image/gif", "data": "R0lG"}}]},
                "finishReason": "STOP"
            }]
        }));
        let err = response.into_artifact(EditKind::Filter).unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
        assert!(err.to_string().contains("image/gif"));
    }

    #[test]
    fn empty_reply() {
        let err = parse(json!({})).into_artifact(EditKind::Filter).unwrap_err();
        assert!(matches!(err, ServiceError::NoImage { kind: EditKind::Filter, .. }));
    }
}
