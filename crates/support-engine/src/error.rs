//! Error taxonomy for the analysis engine

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Malformed or out-of-range input: negative amounts, missing income declaration
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Missing or invalid statutory parameters
    #[error("statutory configuration error in {field}: {message}")]
    Configuration { field: String, message: String },

    /// A document record lacks the fields needed to identify or compare it
    #[error("document {document} is missing required data: {message}")]
    MissingData { document: String, message: String },
}

impl AnalysisError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AnalysisError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        AnalysisError::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing_data(document: impl Into<String>, message: impl Into<String>) -> Self {
        AnalysisError::MissingData {
            document: document.into(),
            message: message.into(),
        }
    }

    /// A sum or product of declared amounts left the representable range
    pub fn overflow(field: impl Into<String>) -> Self {
        Self::validation(field, "amount overflows")
    }

    /// Field or document the error points at
    pub fn subject(&self) -> &str {
        match self {
            AnalysisError::Validation { field, .. } => field,
            AnalysisError::Configuration { field, .. } => field,
            AnalysisError::MissingData { document, .. } => document,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
