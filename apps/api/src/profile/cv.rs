//! CV upload parsing: PDF bytes → plain text stored as `cv_content`.

use thiserror::Error;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum CvParseError {
    #[error("No file uploaded")]
    Missing,

    #[error("Uploaded file is not a PDF")]
    NotPdf,

    #[error("Failed to parse PDF: {0}")]
    Extraction(String),

    #[error("PDF contains no extractable text")]
    NoText,
}

/// Extracts the text layer of a PDF. Scanned PDFs without text fail with `NoText`.
pub fn extract_cv_text(bytes: &[u8]) -> Result<String, CvParseError> {
    if bytes.is_empty() {
        return Err(CvParseError::Missing);
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(CvParseError::NotPdf);
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| CvParseError::Extraction(e.to_string()))?;

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(CvParseError::NoText);
    }
    Ok(text)
}

/// Trims each line and collapses runs of blank lines into one.
fn normalize_whitespace(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() && out.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        out.push(if line.trim().is_empty() { "" } else { line });
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_upload_is_missing() {
        assert!(matches!(extract_cv_text(b""), Err(CvParseError::Missing)));
    }

    #[test]
    fn test_non_pdf_is_rejected_before_parsing() {
        assert!(matches!(
            extract_cv_text(b"PK\x03\x04 not a pdf"),
            Err(CvParseError::NotPdf)
        ));
    }

    #[test]
    fn test_normalize_whitespace_collapses_blank_runs() {
        let raw = "\n\nJane Doe  \n\n\n\nExpérience\nRust   \n\n";
        assert_eq!(normalize_whitespace(raw), "Jane Doe\n\nExpérience\nRust");
    }
}
