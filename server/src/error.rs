use std::fmt;
use std::error::Error as StdError;
use anyhow::Error as AnyError;
use displaydoc::Display;
use serde::Serialize;
use tracing_error::SpanTrace;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub type ServerResult<T> = Result<T, ServerError>;

/// The kind of an error.
#[derive(Debug, Display)]
pub enum ErrorKind {
    /// The URL you requested was not found.
    NotFound,
    /// Failed to read the uploaded file.
    UploadUnreadable,
    /// Read error: {0}
    ReadError(AnyError),
}
impl ErrorKind {
    /// Returns a version of this error for clients.
    fn into_clients(self) -> Self {
        match self {
            Self::NotFound => self,
            Self::UploadUnreadable => self,
            Self::ReadError(_) => Self::UploadUnreadable,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::UploadUnreadable => "UploadUnreadable",
            Self::ReadError(_) => "ReadError",
        }
    }
    fn http_status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::UploadUnreadable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ReadError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    code: u16,
    error: String,
    message: String,
}

/// A server error.
#[derive(Debug)]
pub struct ServerError {
    /// The kind of the error.
    kind: ErrorKind,
    /// Context of where the error occurred.
    context: SpanTrace,
}
impl ServerError {
    pub fn read_error(error: impl StdError + Send + Sync + 'static) -> Self {
        ErrorKind::ReadError(AnyError::new(error)).into()
    }
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}
impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        self.context.fmt(f)?;
        Ok(())
    }
}
impl StdError for ServerError {}
impl From<ErrorKind> for ServerError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: SpanTrace::capture(),
        }
    }
}
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if matches!(self.kind, ErrorKind::ReadError(_)) {
            tracing::error!("{}", self);
        }

        let sanitized = self.kind.into_clients();

        let status_code = sanitized.http_status_code();
        let error_response = ErrorResponse {
            code: status_code.as_u16(),
            message: sanitized.to_string(),
            error: sanitized.name().to_string(),
        };

        (status_code, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_read_error_is_sanitized() {
        let error = ServerError::read_error(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "/tmp/.tmpAbC123",
        ));
        assert!(error.to_string().contains("/tmp/.tmpAbC123"));

        let sanitized = error.kind.into_clients();
        assert_eq!("UploadUnreadable", sanitized.name());
        assert_eq!("Failed to read the uploaded file.", sanitized.to_string());
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, sanitized.http_status_code());
    }
}
