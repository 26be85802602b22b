use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    InvalidInput,
    Internal,
    /// Operator is not meaningful for the predicate shape
    UnsupportedOperator,
    /// Property type has no index encoding for the requested predicate
    UnsupportedValueType,
    /// Range predicate without any bound
    MissingBound,
    /// Wildcard pattern without metacharacters (or a forbidden leading wildcard)
    InvalidPattern,
    InvalidPrivilegeConfiguration,
    UnknownVocabulary,
    /// A negation was compiled but no liveness filter could be obtained
    MissingLiveness,
    /// Liveness filter taken from a different index generation than the one searched
    StaleLiveness,
    QueryTooComplex,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error { kind, context: context.into() }
    }

    pub fn unsupported_operator(op: impl fmt::Display, shape: &str) -> Self {
        Error::new(
            ErrorKind::UnsupportedOperator,
            format!("operator {} is not supported for {} predicates", op, shape),
        )
    }

    pub fn unsupported_value_type(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::UnsupportedValueType, context)
    }

    /// True when the error stems from a malformed query rather than a system fault.
    /// Callers surface these as "invalid query" to the user.
    pub fn is_invalid_query(&self) -> bool {
        !matches!(
            self.kind,
            ErrorKind::Io | ErrorKind::Internal | ErrorKind::MissingLiveness | ErrorKind::StaleLiveness
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            context: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Parse,
            context: err.to_string(),
        }
    }
}

impl From<fst::Error> for Error {
    fn from(err: fst::Error) -> Self {
        Error {
            kind: ErrorKind::Internal,
            context: format!("FST error: {}", err),
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error {
            kind: ErrorKind::InvalidPattern,
            context: format!("Invalid wildcard: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
