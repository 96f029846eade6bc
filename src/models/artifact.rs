use std::borrow::Cow;

/// A scanner output file recognized by name, carrying its category label.
///
/// Immutable once collected; the analyzer is the only consumer.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub file_name: String,
    pub category: String,
    pub raw_content: Vec<u8>,
    /// Set when the raw content was cut to the configured byte budget.
    pub truncated: bool,
}

impl ReportArtifact {
    pub fn new(file_name: &str, category: &str, raw_content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            category: category.to_string(),
            raw_content,
            truncated: false,
        }
    }

    /// Report content as text. Scanner reports are JSON or markdown, but a
    /// corrupt file must still be representable in a prompt.
    pub fn content_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw_content)
    }
}
