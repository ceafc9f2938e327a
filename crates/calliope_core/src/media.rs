//! User-supplied reference images.

use base64::Engine;
use derive_getters::Getters;

/// A user-supplied reference image for visual style matching.
///
/// Carried as raw bytes plus a mime type; encoded to base64 only when
/// embedded in an image-generation request.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ReferenceImage {
    /// Raw image bytes
    bytes: Vec<u8>,
    /// MIME type, e.g. "image/png"
    mime: String,
}

impl ReferenceImage {
    /// Create a reference image from raw bytes and a mime type.
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    /// Base64 encoding of the image bytes for inline wire transfer.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_bytes_for_the_wire() {
        let image = ReferenceImage::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg");
        assert_eq!(image.to_base64(), "/9j/");
        assert_eq!(image.mime(), "image/jpeg");
    }
}
