//! Mappls client error types.

use std::fmt;

use crate::domain::AuthError;

/// Errors from the Mappls HTTP client.
#[derive(Debug)]
pub enum MapplsError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    ApiError { status: u16, message: String },

    /// Invalid API key or expired token
    Unauthorized,

    /// Bearer token could not be obtained
    Auth(AuthError),

    /// The call did not complete within its deadline
    Timeout,
}

impl fmt::Display for MapplsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapplsError::Http(e) => write!(f, "HTTP error: {e}"),
            MapplsError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            MapplsError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            MapplsError::Unauthorized => write!(f, "unauthorized (invalid API key or token)"),
            MapplsError::Auth(e) => write!(f, "{e}"),
            MapplsError::Timeout => write!(f, "request timed out"),
        }
    }
}

impl std::error::Error for MapplsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapplsError::Http(e) => Some(e),
            MapplsError::Auth(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MapplsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MapplsError::Timeout
        } else {
            MapplsError::Http(err)
        }
    }
}

impl From<AuthError> for MapplsError {
    fn from(err: AuthError) -> Self {
        MapplsError::Auth(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MapplsError::Unauthorized;
        assert_eq!(err.to_string(), "unauthorized (invalid API key or token)");

        let err = MapplsError::ApiError {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = MapplsError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("<html>"));

        let err = MapplsError::from(AuthError::new("HTTP 401"));
        assert_eq!(err.to_string(), "token request failed: HTTP 401");
    }
}
