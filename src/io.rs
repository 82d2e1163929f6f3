use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::fmt;

/// Upload cap, matching the file-picker limit the UI advertises.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ACCEPTED_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// A user-supplied source image: raw bytes plus the declared media type.
/// Read-only once constructed; the pipeline never mutates it.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum InputError {
    NoImage,
    TooLarge { size: usize, limit: usize },
    UnsupportedMediaType(String),
    BadEncoding(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NoImage => write!(f, "no image selected"),
            InputError::TooLarge { size, limit } => {
                write!(f, "image is {size} bytes, over the {limit} byte limit")
            }
            InputError::UnsupportedMediaType(mime) => {
                write!(f, "unsupported media type: {mime}")
            }
            InputError::BadEncoding(msg) => {
                write!(f, "image data is not valid base64: {msg}")
            }
        }
    }
}

impl std::error::Error for InputError {}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Decode the inline representation the browser sends.
    pub fn from_base64(data: &str, mime_type: &str) -> Result<Self, InputError> {
        let bytes = BASE64
            .decode(data.trim().as_bytes())
            .map_err(|e| InputError::BadEncoding(e.to_string()))?;
        Ok(Self::new(bytes, mime_type))
    }

    /// Pre-flight checks, run before any remote call is issued.
    pub fn validate(&self, max_bytes: usize) -> Result<(), InputError> {
        if self.bytes.is_empty() {
            return Err(InputError::NoImage);
        }
        if self.bytes.len() > max_bytes {
            return Err(InputError::TooLarge {
                size: self.bytes.len(),
                limit: max_bytes,
            });
        }
        if !ACCEPTED_TYPES
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&self.mime_type))
        {
            return Err(InputError::UnsupportedMediaType(self.mime_type.clone()));
        }
        Ok(())
    }

    /// The inline payload representation the remote wire format requires.
    pub fn to_inline_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(bytes: Vec<u8>) -> ImagePayload {
        ImagePayload::new(bytes, "image/png")
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert_eq!(
            png(vec![]).validate(MAX_IMAGE_BYTES),
            Err(InputError::NoImage)
        );
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = png(vec![0u8; MAX_IMAGE_BYTES + 1]);
        assert!(matches!(
            payload.validate(MAX_IMAGE_BYTES),
            Err(InputError::TooLarge { .. })
        ));
    }

    #[test]
    fn payload_at_the_limit_passes() {
        assert_eq!(png(vec![0u8; MAX_IMAGE_BYTES]).validate(MAX_IMAGE_BYTES), Ok(()));
    }

    #[test]
    fn unknown_media_type_is_rejected() {
        let payload = ImagePayload::new(vec![1, 2, 3], "application/pdf");
        assert_eq!(
            payload.validate(MAX_IMAGE_BYTES),
            Err(InputError::UnsupportedMediaType("application/pdf".into()))
        );
    }

    #[test]
    fn media_type_check_ignores_case() {
        assert_eq!(
            ImagePayload::new(vec![1], "IMAGE/JPEG").validate(MAX_IMAGE_BYTES),
            Ok(())
        );
    }

    #[test]
    fn base64_round_trip() {
        let payload = ImagePayload::from_base64("AQID", "image/png").unwrap();
        assert_eq!(payload.bytes, vec![1, 2, 3]);
        assert_eq!(payload.to_inline_base64(), "AQID");
    }

    #[test]
    fn garbage_base64_is_a_bad_encoding_error() {
        assert!(matches!(
            ImagePayload::from_base64("not base64!!", "image/png"),
            Err(InputError::BadEncoding(_))
        ));
    }
}
