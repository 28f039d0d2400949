// Inline image payloads: a MIME type plus base64 data, as image models exchange them.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::{Artifact, CoreError, ImageMime};

/// Base64 body of `artifact`, ready to send next to its MIME type.
pub fn encode_inline(artifact: &Artifact) -> String {
    BASE64.encode(artifact.bytes())
}

/// Decode an inline payload, rejecting encodings the editor cannot hold.
pub fn decode_inline(mime_type: &str, data: &str) -> Result<(ImageMime, Vec<u8>), CoreError> {
    let mime = ImageMime::from_mime_str(mime_type).ok_or_else(|| CoreError::UnsupportedFormat {
        name: mime_type.to_string(),
    })?;
    let bytes = BASE64
        .decode(data.trim())
        .map_err(|e| CoreError::InvalidPayload {
            reason: e.to_string(),
        })?;
    if bytes.is_empty() {
        return Err(CoreError::EmptyImage {
            name: format!("inline {mime}"),
        });
    }
    Ok((mime, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_and_decodes() {
        let artifact = Artifact::new("a.png", ImageMime::Png, vec![1u8, 2, 3, 250]);
        let data = encode_inline(&artifact);
        assert_eq!(data, "AQID+g==");

        let (mime, bytes) = decode_inline("image/png", &data).unwrap();
        assert_eq!(mime, ImageMime::Png);
        assert_eq!(bytes, vec![1, 2, 3, 250]);
    }

    #[test]
    fn rejects_bad_payloads() {
        assert!(matches!(
            decode_inline("image/png", "@@@"),
            Err(CoreError::InvalidPayload { .. })
        ));
        assert!(matches!(
            decode_inline("image/png", "  "),
            Err(CoreError::EmptyImage { .. })
        ));
    }

    #[test]
    fn rejects_unsupported_mime() {
        let err = decode_inline("image/gif", "R0lG").unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat { .. }));
    }
}
