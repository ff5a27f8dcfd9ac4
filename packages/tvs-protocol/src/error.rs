use thiserror::Error;

/// Errors raised while encoding parameters or decoding response bodies.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// A comma-separated identifier list contained a non-numeric item.
    #[error("invalid series id list item: {0:?}")]
    InvalidSeriesId(String),

    /// A body that should be JSON could not be decoded into the expected schema.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A POST result did not have the form the operation defines.
    #[error("unexpected {expected} result: {body:?}")]
    UnexpectedResult { expected: &'static str, body: String },
}
