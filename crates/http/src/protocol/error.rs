use http::StatusCode;
use thiserror::Error;
use tracing::error;

/// Which class of violation a [`ProtocolError`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A line or field does not parse structurally.
    Malformed,
    /// A line, field count, field size or entity size cap was breached.
    LimitExceeded,
    /// Length headers are contradictory or unparsable.
    FramingConflict,
}

/// The single failure signal of the framing layer.
///
/// Carries the status code the connection layer should answer with and a fixed
/// diagnostic. Building one has no side effects; call [`ProtocolError::log`] at
/// the catch site to emit the error record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} {message}", .status.as_u16())]
pub struct ProtocolError {
    kind: ErrorKind,
    status: StatusCode,
    message: &'static str,
}

impl ProtocolError {
    pub fn new(kind: ErrorKind, status: StatusCode, message: &'static str) -> Self {
        Self { kind, status, message }
    }

    /// Structural violation, answered with `400 Bad Request`.
    pub fn malformed(message: &'static str) -> Self {
        Self::new(ErrorKind::Malformed, StatusCode::BAD_REQUEST, message)
    }

    /// Size cap breached, answered with `413`.
    pub fn too_large(message: &'static str) -> Self {
        Self::new(ErrorKind::LimitExceeded, StatusCode::PAYLOAD_TOO_LARGE, message)
    }

    /// Count cap breached, answered with `400 Bad Request`.
    pub fn too_many(message: &'static str) -> Self {
        Self::new(ErrorKind::LimitExceeded, StatusCode::BAD_REQUEST, message)
    }

    /// Contradictory or unusable length headers, answered with `400 Bad Request`.
    pub fn conflict(message: &'static str) -> Self {
        Self::new(ErrorKind::FramingConflict, StatusCode::BAD_REQUEST, message)
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Canonical reason phrase of [`status`](Self::status), for the response line.
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("<unknown status code>")
    }

    /// Emits the error-level record for this failure.
    pub fn log(&self) {
        error!(status = self.status.as_u16(), kind = ?self.kind, "{}", self.message);
    }
}

/// Failure of the unsigned decimal parser.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    #[error("empty number")]
    Empty,

    #[error("invalid digit in number")]
    InvalidDigit,

    #[error("number too large")]
    Overflow,
}

/// Rejected [`LimitsConfig`](crate::protocol::LimitsConfig).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("limit `{name}` must be greater than zero")]
    ZeroLimit { name: &'static str },
}

impl ConfigError {
    pub fn zero_limit(name: &'static str) -> Self {
        Self::ZeroLimit { name }
    }
}
