//! Reference image sniffing.
//!
//! Reference images are checked locally and never uploaded, so only the
//! container magic bytes matter here.

use crate::{Error, Result};

/// Largest reference image accepted, in bytes.
pub const MAX_REFERENCE_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?})",
                &bytes[..bytes.len().min(4)]
            );
            None
        }
    }
}

/// Check that a reference image is a PNG or JPEG no larger than 10 MiB.
///
/// Returns the detected MIME type on success.
pub fn validate_reference_image(bytes: &[u8]) -> Result<&'static str> {
    if bytes.len() > MAX_REFERENCE_IMAGE_BYTES {
        return Err(Error::Validation(format!(
            "Reference image is {} bytes; it must be less than 10MB",
            bytes.len()
        )));
    }

    match detect_image_mime(bytes) {
        Some(mime @ ("image/png" | "image/jpeg")) => Ok(mime),
        Some(other) => Err(Error::Validation(format!(
            "Reference image must be PNG or JPEG, got {}",
            other
        ))),
        None => Err(Error::Validation(
            "Reference image must be PNG or JPEG".to_string(),
        )),
    }
}
