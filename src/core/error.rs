use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidQuery,
    UnsupportedQuery,
    InvalidArgument,
    Parse,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    /// Query tree that violates a structural rule (e.g. an `and` with one child)
    pub fn invalid_query(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::InvalidQuery, context.into())
    }

    /// An index was asked to answer a query it does not support.
    /// Signals a dispatch bug in the caller, never retried.
    pub fn unsupported_query(query: impl fmt::Display) -> Self {
        Error::new(ErrorKind::UnsupportedQuery, format!("Unsupported query: {}", query))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Parse,
            context: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
