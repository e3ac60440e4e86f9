//! Error types for layerfont

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayerfontError>;

/// Main error type for layerfont
#[derive(Debug, Error)]
pub enum LayerfontError {
    #[error("Resource unavailable: {0}")]
    Resource(#[from] ResourceError),

    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    /// Every requested layer was skipped, so there is nothing to draw
    #[error("Nothing to render: no layer produced any glyph")]
    EmptyRender,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

/// Outline-table resource lookup errors
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("No outline table for {style} ({orientation})")]
    NotFound { style: String, orientation: String },

    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Outline-table and substitution-table parsing errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed outline table: {0}")]
    Xml(String),

    #[error("Invalid {attribute}=\"{value}\" on <{element}>")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("Malformed substitution table: {0}")]
    Substitution(String),
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Format not supported: {0}")]
    FormatNotSupported(String),

    #[error("No converter configured for {0} output")]
    ConverterNotConfigured(String),

    #[error("Converter {program} failed ({status}): {stderr}")]
    ConverterFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}
