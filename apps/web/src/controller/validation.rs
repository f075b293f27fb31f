use bytes::Bytes;
use thiserror::Error;

/// File types the analysis service can read.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc"];

/// A resume chosen by the user, held in memory for a single submission.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Lower-cased extension, empty when the name has none.
    pub fn extension(&self) -> String {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a resume file")]
    NoFileSelected,

    #[error("Unsupported file type. Please upload a PDF, DOCX, or DOC file")]
    UnsupportedExtension { extension: String },
}

/// Checks the selection locally, before anything is sent.
pub fn validate_upload(file: Option<&ResumeFile>) -> Result<&ResumeFile, ValidationError> {
    let file = match file {
        Some(f) if !f.file_name.trim().is_empty() => f,
        _ => return Err(ValidationError::NoFileSelected),
    };

    let extension = file.extension();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::UnsupportedExtension { extension });
    }

    Ok(file)
}
