use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PantherError {
    #[error("panther request failed: {0}")]
    PantherHttp(String),

    #[error("panther returned status {status}: {message}")]
    PantherStatus { status: u16, message: String },

    #[error("panther response missing {0}")]
    MissingField(String),

    #[error("panther response field {field} is not an integer: {value}")]
    MalformedField { field: String, value: String },
}
