use thiserror::Error;

/// Failures raised while tagging URLs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaggingError {
    #[error("{label} is too long: {actual} characters, at most {max} allowed")]
    Validation {
        label: String,
        actual: usize,
        max: usize,
    },
    #[error("invalid URL '{0}': a scheme and host are required")]
    InvalidUrl(String),
    #[error("missing required field: {0}")]
    MissingRequiredField(String),
}

pub type TaggingResult<T> = Result<T, TaggingError>;
