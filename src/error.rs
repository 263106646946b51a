use thiserror::Error;

/// Errors produced by the middleware.
#[derive(Debug, Error)]
pub enum MysqlMiddlewareError {
    #[error(transparent)]
    MysqlError(#[from] mysql::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Other database error: {0}")]
    Other(String),
}

/// Semantic category of an error, used by the retry policy.
///
/// The reconnect-and-retry path keys off `ConnectionLost` rather than a raw
/// driver error code, so the magic numbers live here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server closed or dropped the connection (retryable once).
    ConnectionLost,
    /// Anything else: syntax errors, constraint violations, permissions, ...
    Other,
}

// MySQL client error codes for a dead connection.
const CR_SERVER_GONE_ERROR: u16 = 2006;
const CR_SERVER_LOST: u16 = 2013;

/// Classify an error at the driver boundary.
#[must_use]
pub fn error_kind(err: &MysqlMiddlewareError) -> ErrorKind {
    match err {
        MysqlMiddlewareError::MysqlError(mysql::Error::MySqlError(e))
            if e.code == CR_SERVER_GONE_ERROR || e.code == CR_SERVER_LOST =>
        {
            ErrorKind::ConnectionLost
        }
        MysqlMiddlewareError::MysqlError(mysql::Error::IoError(_)) => ErrorKind::ConnectionLost,
        _ => ErrorKind::Other,
    }
}
