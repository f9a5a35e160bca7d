//! Error types for sqldal

use std::fmt;
use thiserror::Error;

/// Result type alias for sqldal operations
pub type DalResult<T> = Result<T, DalError>;

/// Error types for data-access operations
#[derive(Debug, Error)]
pub enum DalError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error reported by the driver while preparing, binding or executing
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// A single-row fetch matched more than one row
    #[error("{operation} should return only one row, {rows} rows returned")]
    Cardinality { operation: &'static str, rows: usize },

    /// A single-row fetch matched no rows
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid statement input (identifiers, empty mappings)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A value could not be bound to the statement
    #[error("Bind error: {0}")]
    Bind(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DalError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a bind error
    pub fn bind(message: impl Into<String>) -> Self {
        Self::Bind(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if a single-row fetch matched several rows
    pub fn is_cardinality(&self) -> bool {
        matches!(self, Self::Cardinality { .. })
    }

    /// Check if the driver rejected the statement because of a constraint
    pub fn is_constraint_violation(&self) -> bool {
        self.driver_error()
            .is_some_and(|e| e.kind().is_constraint_violation())
    }

    /// The underlying driver error, if any
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            Self::Driver(err) => Some(err),
            _ => None,
        }
    }
}

/// Classification of a driver-reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverErrorKind {
    UniqueViolation,
    ForeignKeyViolation,
    CheckViolation,
    NotNullViolation,
    Syntax,
    Connection,
    Other,
}

impl DriverErrorKind {
    /// Classify a SQLSTATE code.
    pub fn from_sqlstate(code: &str) -> Self {
        match code {
            "23505" => Self::UniqueViolation,
            "23503" => Self::ForeignKeyViolation,
            "23514" => Self::CheckViolation,
            "23502" => Self::NotNullViolation,
            "42601" => Self::Syntax,
            c if c.starts_with("08") => Self::Connection,
            _ => Self::Other,
        }
    }

    pub fn is_constraint_violation(self) -> bool {
        matches!(
            self,
            Self::UniqueViolation
                | Self::ForeignKeyViolation
                | Self::CheckViolation
                | Self::NotNullViolation
        )
    }
}

/// A failure reported by the database driver, carrying its message.
///
/// The core never retries on these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    kind: DriverErrorKind,
    code: Option<String>,
    message: String,
}

impl DriverError {
    pub fn new(kind: DriverErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    /// Build from a SQLSTATE code and the server message.
    pub fn from_sqlstate(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            kind: DriverErrorKind::from_sqlstate(&code),
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::Other, message)
    }

    pub fn kind(&self) -> DriverErrorKind {
        self.kind
    }

    /// SQLSTATE code, when the driver reported one.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for DriverError {}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for DriverError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let message = match db_err.constraint() {
                Some(constraint) => format!("{}: {}", constraint, db_err.message()),
                None => db_err.message().to_string(),
            };
            return Self::from_sqlstate(db_err.code().code(), message);
        }
        let kind = if err.is_closed() {
            DriverErrorKind::Connection
        } else {
            DriverErrorKind::Other
        };
        Self::new(kind, err.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for DalError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::Driver(err.into())
    }
}
