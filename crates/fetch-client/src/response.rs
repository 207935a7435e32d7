//! Response types and body decoding

use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::request::Headers;

/// Explicit body-decoding override
///
/// When absent, the body is decoded as JSON if the `Content-Type` header
/// contains `json`, and as text otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Decode the body as JSON
    Json,
    /// Decode the body as URL-encoded form pairs
    FormData,
    /// Decode the body as UTF-8 text
    Text,
    /// Keep the raw bytes
    Blob,
    /// Keep the raw bytes
    ArrayBuffer,
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// JSON document
    Json(serde_json::Value),
    /// URL-encoded form pairs
    Form(Vec<(String, String)>),
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl Body {
    /// JSON document, when decoded as JSON
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Text content, when decoded as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Raw bytes, when kept undecoded
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Form pairs, when decoded as form data
    pub fn as_form(&self) -> Option<&[(String, String)]> {
        match self {
            Body::Form(pairs) => Some(pairs),
            _ => None,
        }
    }
}

/// Raw transport response: status, headers and undecoded body bytes
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response header multi-map
    pub headers: Headers,
    /// Undecoded body bytes
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a raw response
    pub fn new(status: u16, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Whether the status is a success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the status is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Whether the status is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// The `Content-Type` header, when present
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }

    /// Consumes the response, decoding the body as UTF-8 text
    pub fn text(self) -> Result<String, Error> {
        String::from_utf8(self.body).map_err(|err| decode_error("text", &err))
    }

    /// Consumes the response, deserializing the body as JSON
    pub fn json<T: DeserializeOwned>(self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|err| decode_error("JSON", &err))
    }

    /// Consumes the response, decoding the body as URL-encoded form pairs
    pub fn form(self) -> Result<Vec<(String, String)>, Error> {
        serde_urlencoded::from_bytes(&self.body).map_err(|err| decode_error("form", &err))
    }

    /// Consumes the response, returning the raw body bytes
    pub fn bytes(self) -> Vec<u8> {
        self.body
    }

    /// Decodes the body bytes
    ///
    /// An explicit `response_type` wins; otherwise the `Content-Type`
    /// header negotiates between JSON and text.
    pub fn decode(self, response_type: Option<ResponseType>) -> Result<Body, Error> {
        let kind = match response_type {
            Some(kind) => kind,
            None => {
                if self.content_type().is_some_and(|ct| ct.contains("json")) {
                    ResponseType::Json
                } else {
                    ResponseType::Text
                }
            }
        };

        match kind {
            ResponseType::Json => serde_json::from_slice(&self.body)
                .map(Body::Json)
                .map_err(|err| decode_error("JSON", &err)),
            ResponseType::FormData => serde_urlencoded::from_bytes(&self.body)
                .map(Body::Form)
                .map_err(|err| decode_error("form", &err)),
            ResponseType::Text => String::from_utf8(self.body)
                .map(Body::Text)
                .map_err(|err| decode_error("text", &err)),
            ResponseType::Blob | ResponseType::ArrayBuffer => Ok(Body::Bytes(self.body)),
        }
    }
}

fn decode_error(kind: &str, err: &dyn std::fmt::Display) -> Error {
    tracing::warn!("Failed to decode {} response body: {}", kind, err);
    Error::Decode(format!("{}: {}", kind, err))
}

/// Successful HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code, always within `200..300`
    pub status: u16,
    /// Response header multi-map
    pub headers: Headers,
    /// Decoded body
    pub data: Body,
}

impl Response {
    /// Deserializes the JSON body into `T`
    ///
    /// Fails when the body was not decoded as JSON or does not match `T`.
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
