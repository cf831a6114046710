//! Error types for explorer generation

use thiserror::Error;

/// Errors raised while loading sheets or expanding an explorer
#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Sheet not found: {0}")]
    MissingSheet(String),

    #[error("Column '{column}' not found in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Invalid rows in sheet '{sheet}': {message}")]
    Facet { sheet: String, message: String },

    #[error("No row in sheet '{sheet}' has {column} = '{value}'")]
    NoMatch {
        sheet: String,
        column: String,
        value: String,
    },

    #[error("{count} rows in sheet '{sheet}' have {column} = '{value}', expected exactly one")]
    AmbiguousMatch {
        sheet: String,
        column: String,
        value: String,
        count: usize,
    },

    #[error("No grapher view matches the default view selection: {0}")]
    NoDefaultView(String),

    #[error("Unknown explorer: {0}")]
    UnknownExplorer(String),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
