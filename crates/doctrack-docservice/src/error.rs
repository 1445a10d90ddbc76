//! Error type for conversion requests.
//!
//! Maps the negative codes of the conversion service and the transport
//! failures of the HTTP client onto one enum that converts cleanly into
//! `doctrack_core::error::AppError`.

use doctrack_core::error::AppError;
use thiserror::Error;

/// Everything that can go wrong during one conversion attempt.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The request or the service itself ran out of time.
    #[error("Conversion timed out: {0}")]
    Timeout(String),

    /// The service could not be reached.
    #[error("Conversion service unreachable: {0}")]
    ServiceUnreachable(String),

    /// The service answered with an error code.
    #[error("Conversion service error {code}: {message}")]
    Service {
        /// Negative service error code.
        code: i64,
        /// Description of the code.
        message: &'static str,
    },

    /// The service answered with a non-success HTTP status.
    #[error("Conversion service returned HTTP {0}")]
    Status(u16),

    /// The answer could not be understood.
    #[error("Malformed conversion response: {0}")]
    MalformedResponse(String),
}

impl ConversionError {
    /// Builds the error for a service error code.
    pub fn from_code(code: i64) -> Self {
        let message = match code {
            -1 => "Unknown error",
            -2 => "Conversion timeout",
            -3 => "Conversion error",
            -4 => "Error while downloading the document file to be converted",
            -5 => "Incorrect password",
            -6 => "Error while accessing the conversion result database",
            -7 => "Input error",
            -8 => "Invalid token",
            _ => "Error occurred in the document service",
        };
        if code == -2 {
            Self::Timeout(message.to_string())
        } else {
            Self::Service { code, message }
        }
    }

    /// Classifies a transport error.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnreachable(err.to_string())
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::ServiceUnreachable(err.to_string())
        }
    }
}

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        match &err {
            ConversionError::Timeout(_) => AppError::timeout(err.to_string()),
            ConversionError::ServiceUnreachable(_) => {
                AppError::service_unavailable(err.to_string())
            }
            ConversionError::Service { .. } => AppError::conversion(err.to_string()),
            ConversionError::Status(_) | ConversionError::MalformedResponse(_) => {
                AppError::external_service(err.to_string())
            }
        }
    }
}
