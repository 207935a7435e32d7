//! Cancellable request handle

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::response::Response;

/// Future for an in-flight request that can be cancelled out of band
///
/// Awaiting the handle drives the request to settlement. [`cancel`] (or
/// cancelling a token obtained from [`cancellation_token`] beforehand)
/// triggers the abort signal shared with the transport and settles the
/// handle with [`Error::Cancelled`]; any pending timeout timer is dropped
/// with the settled future.
///
/// [`cancel`]: RequestHandle::cancel
/// [`cancellation_token`]: RequestHandle::cancellation_token
pub struct RequestHandle {
    token: CancellationToken,
    future: BoxFuture<'static, Result<Response, Error>>,
}

impl RequestHandle {
    pub(crate) fn new(
        token: CancellationToken,
        future: BoxFuture<'static, Result<Response, Error>>,
    ) -> Self {
        Self { token, future }
    }

    /// A handle that settles immediately with `error`, issuing no network
    /// call
    pub(crate) fn settled(error: Error) -> Self {
        Self {
            token: CancellationToken::new(),
            future: Box::pin(async move { Err(error) }),
        }
    }

    /// Cancels the request
    ///
    /// Idempotent; has no effect once the handle has settled.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The abort signal shared with the transport
    ///
    /// Cancelling the returned token is equivalent to calling
    /// [`cancel`](RequestHandle::cancel).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Whether the handle has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl fmt::Debug for RequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandle")
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Future for RequestHandle {
    type Output = Result<Response, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().future.as_mut().poll(cx)
    }
}
