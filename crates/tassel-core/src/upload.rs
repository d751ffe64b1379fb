//! Upload payload validation.
//!
//! Checked before any blob or record write: size against
//! [`MAX_UPLOAD_BYTES`], extension against the fixed accept list, and — when
//! the transport declared one — the MIME type against the extension. There
//! is deliberately no content inspection beyond type and size.

use crate::error::ValidationError;

/// 10 MiB, the hard per-document size limit.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted extensions (lower-case) and their canonical media types.
const ACCEPTED: [(&str, &str); 4] = [
  ("jpg", "image/jpeg"),
  ("jpeg", "image/jpeg"),
  ("png", "image/png"),
  ("pdf", "application/pdf"),
];

// ─── Payload ─────────────────────────────────────────────────────────────────

/// An inbound document as handed over by the transport layer.
#[derive(Debug, Clone)]
pub struct UploadPayload {
  /// Client-supplied name; only the extension is consulted.
  pub filename:     String,
  /// Declared MIME type, if the transport carried one.
  pub content_type: Option<String>,
  pub bytes:        Vec<u8>,
}

impl UploadPayload {
  /// Validate and return the normalised (lower-case) extension.
  pub fn validate(&self) -> Result<String, ValidationError> {
    let size = self.bytes.len() as u64;
    if size > MAX_UPLOAD_BYTES {
      return Err(ValidationError::TooLarge { size, max: MAX_UPLOAD_BYTES });
    }

    let extension = self
      .filename
      .rsplit_once('.')
      .map(|(_, ext)| ext.to_ascii_lowercase())
      .ok_or_else(|| ValidationError::UnsupportedType(self.filename.clone()))?;

    let canonical_mime = ACCEPTED
      .iter()
      .find(|(ext, _)| *ext == extension)
      .map(|(_, mime)| *mime)
      .ok_or_else(|| ValidationError::UnsupportedType(extension.clone()))?;

    if let Some(declared) = &self.content_type
      && declared != canonical_mime
    {
      return Err(ValidationError::MimeMismatch {
        mime:      declared.clone(),
        extension,
      });
    }

    Ok(extension)
  }
}

/// The media type served back for a stored extension; falls back to a plain
/// octet stream for anything the accept list does not know (only reachable
/// for blobs written outside the portal).
pub fn media_type_for(extension: &str) -> &'static str {
  ACCEPTED
    .iter()
    .find(|(ext, _)| *ext == extension)
    .map(|(_, mime)| *mime)
    .unwrap_or("application/octet-stream")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn payload(filename: &str, content_type: Option<&str>, len: usize) -> UploadPayload {
    UploadPayload {
      filename:     filename.to_string(),
      content_type: content_type.map(str::to_string),
      bytes:        vec![0u8; len],
    }
  }

  #[test]
  fn accepts_each_listed_extension() {
    for name in ["scan.jpg", "scan.JPEG", "scan.png", "receipt.pdf"] {
      let ext = payload(name, None, 1024).validate().unwrap();
      assert!(["jpg", "jpeg", "png", "pdf"].contains(&ext.as_str()));
    }
  }

  #[test]
  fn rejects_oversized_file_before_anything_else() {
    let err = payload("receipt.pdf", None, (MAX_UPLOAD_BYTES + 1) as usize)
      .validate()
      .unwrap_err();
    assert!(matches!(err, ValidationError::TooLarge { .. }));
  }

  #[test]
  fn a_file_of_exactly_the_limit_passes() {
    assert!(
      payload("receipt.pdf", None, MAX_UPLOAD_BYTES as usize)
        .validate()
        .is_ok()
    );
  }

  #[test]
  fn rejects_unlisted_extensions_and_missing_ones() {
    for name in ["virus.exe", "notes.docx", "archive.tar.gz", "noextension"] {
      let err = payload(name, None, 16).validate().unwrap_err();
      assert!(
        matches!(err, ValidationError::UnsupportedType(_)),
        "{name} should be refused"
      );
    }
  }

  #[test]
  fn declared_mime_must_match_extension() {
    let err = payload("receipt.pdf", Some("image/png"), 16)
      .validate()
      .unwrap_err();
    assert!(matches!(err, ValidationError::MimeMismatch { .. }));

    assert!(
      payload("receipt.pdf", Some("application/pdf"), 16)
        .validate()
        .is_ok()
    );
    // jpg and jpeg share a media type.
    assert!(payload("card.jpg", Some("image/jpeg"), 16).validate().is_ok());
  }

  #[test]
  fn media_type_round_trip() {
    assert_eq!(media_type_for("pdf"), "application/pdf");
    assert_eq!(media_type_for("jpeg"), "image/jpeg");
    assert_eq!(media_type_for("bin"), "application/octet-stream");
  }
}
