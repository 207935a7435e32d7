//! Error types

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::request::Headers;
use crate::response::Body;

/// Errors surfaced by a settled request handle
#[derive(Debug, Error)]
pub enum Error {
    /// Transport completed but the status is outside the success range
    #[error("HTTP error ({})", .0.status)]
    Status(ErrorResponse),
    /// The configured timeout elapsed before the transport settled
    #[error("request timed out")]
    Timeout,
    /// The handle was cancelled before the request settled
    #[error("request cancelled")]
    Cancelled,
    /// Network-level failure reported by the transport
    #[error("transport error: {0}")]
    Transport(String),
    /// The response body could not be decoded
    #[error("decode error: {0}")]
    Decode(String),
    /// The request body or query string could not be serialized
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Response-shaped error value carried by [`Error::Status`]
///
/// Built for any completed exchange whose status falls outside `200..300`
/// and handed to every registered error interceptor before rejection.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    /// HTTP status code, always outside `200..300`
    pub status: u16,
    /// Response header multi-map
    pub headers: Headers,
    /// Decoded body
    pub data: Body,
}

impl ErrorResponse {
    /// Whether the status is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Whether the status is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Deserializes the JSON body into `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        match &self.data {
            Body::Json(value) => serde_json::from_value(value.clone())
                .map_err(|err| Error::Decode(err.to_string())),
            _ => Err(Error::Decode("response body is not JSON".to_string())),
        }
    }

    /// Text content, when the body was decoded as text
    pub fn text(&self) -> Option<&str> {
        self.data.as_text()
    }
}
