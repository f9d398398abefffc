//! Uploaded resume → plain text.

use std::panic;
use std::path::Path;

use tracing::warn;

/// Extracts the text of every page, concatenated. Returns an empty string when the
/// document has no text layer or cannot be parsed; the caller still analyzes it.
pub fn extract_text(data: &[u8]) -> String {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let outcome = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data));

    match outcome {
        Ok(Ok(text)) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                warn!("PDF contains no extractable text ({} bytes)", data.len());
            }
            text
        }
        Ok(Err(e)) => {
            warn!("Failed to extract text from PDF: {e}");
            String::new()
        }
        Err(_) => {
            warn!("PDF parser aborted on malformed input ({} bytes)", data.len());
            String::new()
        }
    }
}

/// Plain-text uploads are taken as-is; everything else is treated as a PDF.
pub fn extract_upload_text(file_name: &str, content_type: Option<&str>, data: &[u8]) -> String {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let is_plain_text = extension == "txt"
        || content_type.is_some_and(|ct| ct.starts_with("text/plain"));

    if is_plain_text {
        String::from_utf8_lossy(data).trim().to_string()
    } else {
        extract_text(data)
    }
}
