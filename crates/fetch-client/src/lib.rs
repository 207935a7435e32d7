//! Ergonomic HTTP client wrapper
//!
//! This crate provides a thin client layer over a pluggable [`Transport`],
//! adding base-URL composition, query-parameter serialization,
//! timeout-based cancellation and ordered request/response/error
//! interceptor hooks. It performs no retries, pooling, caching or
//! streaming; every call is a single cancellable exchange.
//!
//! # Example
//!
//! ```no_run
//! use fetch_client::{Client, Params, RequestOptions};
//!
//! #[derive(serde::Deserialize)]
//! struct Item {
//!     name: String,
//! }
//!
//! async fn example() -> Result<(), fetch_client::Error> {
//!     let client = Client::new("https://api.example.com");
//!     let response = client
//!         .get("/v1/items", Params::new().with("page", 2), RequestOptions::default())
//!         .await?;
//!     let items: Vec<Item> = response.json()?;
//!     println!("{} items", items.len());
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod handle;
mod interceptor;
mod params;
mod request;
mod response;
mod transport;

pub use client::{Client, ClientBuilder};
pub use error::{Error, ErrorResponse};
pub use handle::RequestHandle;
pub use interceptor::{ErrorInterceptor, RequestInterceptor, ResponseInterceptor};
pub use params::{ParamValue, Params, ParamsSerializer, UrlEncodedSerializer};
pub use request::{HeaderValue, Headers, Method, Request, RequestOptions, Timeout};
pub use response::{Body, RawResponse, Response, ResponseType};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
// Cancellation primitive shared with the transport seam.
pub use tokio_util::sync::CancellationToken;
