//! Interceptor hooks for the request lifecycle
//!
//! Interceptors are registered on a [`Client`] and run strictly in
//! registration order. The request chain folds its value (each
//! interceptor's output feeds the next); the response and error chains are
//! observe-only. Plain closures implement all three traits.
//!
//! [`Client`]: crate::Client

use crate::error::ErrorResponse;
use crate::request::Request;
use crate::response::Response;

/// Transforms the outgoing request before dispatch
pub trait RequestInterceptor: Send + Sync {
    /// Returns the replacement request handed to the next interceptor
    fn intercept(&self, request: Request) -> Request;
}

/// Observes a successful response before the handle resolves
pub trait ResponseInterceptor: Send + Sync {
    /// Invoked for side effects; cannot alter or suppress the response
    fn on_response(&self, response: &Response);
}

/// Observes an HTTP error response before the handle rejects
///
/// Not invoked for transport or decode faults, which reject the handle
/// directly.
pub trait ErrorInterceptor: Send + Sync {
    /// Invoked for side effects; cannot alter or suppress the error
    fn on_error(&self, error: &ErrorResponse);
}

impl<F> RequestInterceptor for F
where
    F: Fn(Request) -> Request + Send + Sync,
{
    fn intercept(&self, request: Request) -> Request {
        self(request)
    }
}

impl<F> ResponseInterceptor for F
where
    F: Fn(&Response) + Send + Sync,
{
    fn on_response(&self, response: &Response) {
        self(response)
    }
}

impl<F> ErrorInterceptor for F
where
    F: Fn(&ErrorResponse) + Send + Sync,
{
    fn on_error(&self, error: &ErrorResponse) {
        self(error)
    }
}
