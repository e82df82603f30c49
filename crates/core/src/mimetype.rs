//! Content type inference for uploads.

/// Fallback for binary content with an unknown extension.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Infer the content type of an upload.
///
/// The path extension wins; otherwise UTF-8 content is `text/plain` and
/// anything else is `application/octet-stream`.
#[must_use]
pub fn infer(path: &str, contents: &[u8]) -> String {
    if let Some(guess) = mime_guess::from_path(path).first() {
        return guess.essence_str().to_string();
    }
    if std::str::from_utf8(contents).is_ok() {
        "text/plain".to_string()
    } else {
        OCTET_STREAM.to_string()
    }
}
