use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("duration `{0}` is not MM:SS or H:MM:SS")]
    Shape(String),
    #[error("duration `{input}` has a non-numeric component `{part}`")]
    NotANumber { input: String, part: String },
    #[error("duration `{0}` has a minutes or seconds field of 60 or more")]
    OutOfRange(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefsError {
    #[error("folder path is empty")]
    EmptyPath,
    #[error("{0} is already in the list")]
    DuplicateRoot(String),
    #[error("could not encode `{key}`: {reason}")]
    Encode { key: &'static str, reason: String },
    #[error("storage rejected `{key}`: {reason}")]
    Storage { key: &'static str, reason: String },
}

/// Failure of a single backend call. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("{url} answered {status}")]
    Status { status: u16, url: String },
    #[error("unexpected payload: {0}")]
    Decode(String),
}

