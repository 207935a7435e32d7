//! Transport seam and the reqwest-backed default implementation

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::request::Method;
use crate::request::Request;
use crate::response::RawResponse;

#[cfg(feature = "reqwest")]
use crate::request::Headers;

/// Underlying network primitive
///
/// Performs one HTTP exchange per call. Implementations observe `cancel`
/// to stop reading or writing early; a cancelled exchange settles with
/// [`Error::Cancelled`].
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    /// Issues the request and returns the raw response
    async fn send(
        &self,
        method: Method,
        request: &Request,
        cancel: CancellationToken,
    ) -> Result<RawResponse, Error>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(
        &self,
        method: Method,
        request: &Request,
        cancel: CancellationToken,
    ) -> Result<RawResponse, Error> {
        (**self).send(method, request, cancel).await
    }
}

/// reqwest-backed [`Transport`]
#[cfg(feature = "reqwest")]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(feature = "reqwest")]
impl ReqwestTransport {
    /// Creates a transport with default reqwest settings
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Creates a transport from a configured `reqwest::Client`
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "reqwest")]
impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Trace => reqwest::Method::TRACE,
        }
    }
}

#[cfg(feature = "reqwest")]
#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        method: Method,
        request: &Request,
        cancel: CancellationToken,
    ) -> Result<RawResponse, Error> {
        let mut builder = self.client.request(method.into(), &request.url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            response = builder.send() => {
                response.map_err(|err| Error::Transport(err.to_string()))?
            }
        };

        let status = response.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in response.headers().iter() {
            headers.append(name.as_str(), value.to_str().unwrap_or_default());
        }

        let bytes = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            bytes = response.bytes() => {
                bytes.map_err(|err| Error::Transport(err.to_string()))?
            }
        };

        Ok(RawResponse::new(status, headers, bytes.to_vec()))
    }
}
