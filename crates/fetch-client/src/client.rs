//! HTTP client wrapper

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, ErrorResponse};
use crate::handle::RequestHandle;
use crate::interceptor::{ErrorInterceptor, RequestInterceptor, ResponseInterceptor};
use crate::params::{Params, ParamsSerializer, UrlEncodedSerializer};
use crate::request::{expand_headers, Method, Request, RequestOptions, Timeout};
use crate::response::{Response, ResponseType};
#[cfg(feature = "reqwest")]
use crate::transport::ReqwestTransport;
use crate::transport::Transport;

/// HTTP client wrapper
///
/// Holds the base URL, default timeout, query serializer and the three
/// interceptor chains, and dispatches requests through the configured
/// [`Transport`]. Interceptors are appended with the `add_*` methods and
/// run in registration order.
#[derive(Clone)]
pub struct Client {
    base_url: Option<String>,
    timeout: Timeout,
    params_serializer: Arc<dyn ParamsSerializer>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    error_interceptors: Vec<Arc<dyn ErrorInterceptor>>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("request_interceptors", &self.request_interceptors.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .field("error_interceptors", &self.error_interceptors.len())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "reqwest")]
impl Default for Client {
    fn default() -> Self {
        ClientBuilder::default().build()
    }
}

impl Client {
    /// Creates a client for `base_url` with default settings
    #[cfg(feature = "reqwest")]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::builder().base_url(base_url).build()
    }

    /// Creates a client builder backed by the default transport
    #[cfg(feature = "reqwest")]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Appends a request interceptor
    pub fn add_request_interceptor(&mut self, interceptor: impl RequestInterceptor + 'static) {
        self.request_interceptors.push(Arc::new(interceptor));
    }

    /// Appends a response interceptor
    pub fn add_response_interceptor(&mut self, interceptor: impl ResponseInterceptor + 'static) {
        self.response_interceptors.push(Arc::new(interceptor));
    }

    /// Appends an error interceptor
    pub fn add_error_interceptor(&mut self, interceptor: impl ErrorInterceptor + 'static) {
        self.error_interceptors.push(Arc::new(interceptor));
    }

    /// GET request
    pub fn get(&self, path: &str, params: Params, options: RequestOptions) -> RequestHandle {
        self.execute(Method::Get, path, params, None, options)
    }

    /// HEAD request
    pub fn head(&self, path: &str, params: Params, options: RequestOptions) -> RequestHandle {
        self.execute(Method::Head, path, params, None, options)
    }

    /// DELETE request
    pub fn delete(&self, path: &str, params: Params, options: RequestOptions) -> RequestHandle {
        self.execute(Method::Delete, path, params, None, options)
    }

    /// OPTIONS request
    pub fn options(&self, path: &str, params: Params, options: RequestOptions) -> RequestHandle {
        self.execute(Method::Options, path, params, None, options)
    }

    /// TRACE request
    pub fn trace(&self, path: &str, params: Params, options: RequestOptions) -> RequestHandle {
        self.execute(Method::Trace, path, params, None, options)
    }

    /// POST request with an optional JSON body
    pub fn post<B>(
        &self,
        path: &str,
        params: Params,
        body: Option<&B>,
        options: RequestOptions,
    ) -> RequestHandle
    where
        B: Serialize + ?Sized,
    {
        self.execute_with_body(Method::Post, path, params, body, options)
    }

    /// PUT request with an optional JSON body
    pub fn put<B>(
        &self,
        path: &str,
        params: Params,
        body: Option<&B>,
        options: RequestOptions,
    ) -> RequestHandle
    where
        B: Serialize + ?Sized,
    {
        self.execute_with_body(Method::Put, path, params, body, options)
    }

    /// PATCH request with an optional JSON body
    pub fn patch<B>(
        &self,
        path: &str,
        params: Params,
        body: Option<&B>,
        options: RequestOptions,
    ) -> RequestHandle
    where
        B: Serialize + ?Sized,
    {
        self.execute_with_body(Method::Patch, path, params, body, options)
    }

    fn execute_with_body<B>(
        &self,
        method: Method,
        path: &str,
        params: Params,
        body: Option<&B>,
        options: RequestOptions,
    ) -> RequestHandle
    where
        B: Serialize + ?Sized,
    {
        // A body that fails to serialize settles the handle before any
        // network activity.
        match body.map(serde_json::to_value).transpose() {
            Ok(body) => self.execute(method, path, params, body, options),
            Err(err) => RequestHandle::settled(Error::Serialization(err.to_string())),
        }
    }

    /// Executes a request against the composed URL
    ///
    /// Composes `<base>/<path>` with exactly one slash at the join point,
    /// appends the serialized query string when non-empty, folds the
    /// request through the registered request interceptors and issues the
    /// transport call racing the effective timeout. The returned handle
    /// settles with the classified outcome and can be cancelled at any
    /// time before settlement.
    pub fn execute(
        &self,
        method: Method,
        path: &str,
        params: Params,
        body: Option<serde_json::Value>,
        options: RequestOptions,
    ) -> RequestHandle {
        let headers = expand_headers(&options.headers);
        let timeout = options.timeout.unwrap_or(self.timeout);

        let mut url = join_url(self.base_url.as_deref(), path);
        let query = self.params_serializer.serialize(&params);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        let lifecycle = Lifecycle {
            method,
            request: Request {
                url,
                headers,
                params,
                body,
            },
            timeout,
            response_type: options.response_type,
            request_interceptors: self.request_interceptors.clone(),
            response_interceptors: self.response_interceptors.clone(),
            error_interceptors: self.error_interceptors.clone(),
            transport: Arc::clone(&self.transport),
        };

        let token = CancellationToken::new();
        RequestHandle::new(token.clone(), Box::pin(lifecycle.run(token)))
    }
}

/// Builder for [`Client`]
///
/// [`ClientBuilder::with_transport`] is the entry point when the
/// `reqwest` feature is disabled.
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Timeout,
    params_serializer: Arc<dyn ParamsSerializer>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    error_interceptors: Vec<Arc<dyn ErrorInterceptor>>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "reqwest")]
impl Default for ClientBuilder {
    fn default() -> Self {
        Self::with_transport(ReqwestTransport::new())
    }
}

impl ClientBuilder {
    /// Creates a builder around an explicit transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            base_url: None,
            timeout: Timeout::default(),
            params_serializer: Arc::new(UrlEncodedSerializer),
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
            error_interceptors: Vec::new(),
            transport: Arc::new(transport),
        }
    }

    /// Sets the base URL requests are resolved against
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the default timeout (30 seconds unless overridden)
    pub fn timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the query-string serializer
    pub fn params_serializer(mut self, serializer: impl ParamsSerializer + 'static) -> Self {
        self.params_serializer = Arc::new(serializer);
        self
    }

    /// Replaces the transport
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    /// Appends an initial request interceptor
    pub fn request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Appends an initial response interceptor
    pub fn response_interceptor(
        mut self,
        interceptor: impl ResponseInterceptor + 'static,
    ) -> Self {
        self.response_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Appends an initial error interceptor
    pub fn error_interceptor(mut self, interceptor: impl ErrorInterceptor + 'static) -> Self {
        self.error_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Builds the client
    pub fn build(self) -> Client {
        Client {
            base_url: self.base_url,
            timeout: self.timeout,
            params_serializer: self.params_serializer,
            request_interceptors: self.request_interceptors,
            response_interceptors: self.response_interceptors,
            error_interceptors: self.error_interceptors,
            transport: self.transport,
        }
    }
}

/// Joins a base URL and a path with exactly one separating slash
///
/// One trailing slash is stripped from the base and one leading slash from
/// the path; an absent base is treated as the empty string.
fn join_url(base: Option<&str>, path: &str) -> String {
    let base = base.unwrap_or("");
    let base = base.strip_suffix('/').unwrap_or(base);
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{}/{}", base, path)
}

/// One request's lifecycle state, moved into the handle's future
struct Lifecycle {
    method: Method,
    request: Request,
    timeout: Timeout,
    response_type: Option<ResponseType>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    error_interceptors: Vec<Arc<dyn ErrorInterceptor>>,
    transport: Arc<dyn Transport>,
}

impl Lifecycle {
    async fn run(self, token: CancellationToken) -> Result<Response, Error> {
        let Lifecycle {
            method,
            request,
            timeout,
            response_type,
            request_interceptors,
            response_interceptors,
            error_interceptors,
            transport,
        } = self;

        let mut request = request;
        for interceptor in &request_interceptors {
            request = interceptor.intercept(request);
        }

        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        tracing::debug!("{} {}", method, request.url);

        // The timer lives inside the select and is dropped with it on
        // every exit path.
        let raw = match timeout.duration() {
            Some(duration) => {
                tokio::select! {
                    _ = token.cancelled() => return Err(Error::Cancelled),
                    _ = tokio::time::sleep(duration) => {
                        token.cancel();
                        tracing::debug!(
                            "{} {} timed out after {} ms",
                            method,
                            request.url,
                            duration.as_millis()
                        );
                        return Err(Error::Timeout);
                    }
                    raw = transport.send(method, &request, token.clone()) => raw?,
                }
            }
            None => {
                tokio::select! {
                    _ = token.cancelled() => return Err(Error::Cancelled),
                    raw = transport.send(method, &request, token.clone()) => raw?,
                }
            }
        };

        let status = raw.status;
        let headers = raw.headers.clone();
        let success = raw.is_success();
        let data = raw.decode(response_type)?;

        if success {
            let response = Response {
                status,
                headers,
                data,
            };
            for interceptor in &response_interceptors {
                interceptor.on_response(&response);
            }
            Ok(response)
        } else {
            let error = ErrorResponse {
                status,
                headers,
                data,
            };
            for interceptor in &error_interceptors {
                interceptor.on_error(&error);
            }
            Err(Error::Status(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::request::Headers;
    use crate::response::RawResponse;

    // === join_url ===

    #[test]
    fn test_join_url_strips_to_one_slash() {
        assert_eq!(
            join_url(Some("https://api.test/"), "/v1/x"),
            "https://api.test/v1/x"
        );
        assert_eq!(
            join_url(Some("https://api.test"), "v1/x"),
            "https://api.test/v1/x"
        );
        assert_eq!(
            join_url(Some("https://api.test/"), "v1/x"),
            "https://api.test/v1/x"
        );
        assert_eq!(
            join_url(Some("https://api.test"), "/v1/x"),
            "https://api.test/v1/x"
        );
    }

    #[test]
    fn test_join_url_without_base() {
        assert_eq!(join_url(None, "/v1/x"), "/v1/x");
        assert_eq!(join_url(None, "v1/x"), "/v1/x");
    }

    #[test]
    fn test_join_url_strips_only_one_slash() {
        assert_eq!(join_url(Some("https://a//"), "p"), "https://a//p");
        assert_eq!(join_url(Some("https://a"), "//p"), "https://a//p");
    }

    // === test transports ===

    /// Records every request and answers with a canned response.
    #[derive(Debug)]
    struct CapturingTransport {
        status: u16,
        content_type: Option<&'static str>,
        body: &'static [u8],
        seen: Mutex<Vec<(Method, Request)>>,
    }

    impl CapturingTransport {
        fn json(status: u16, body: &'static [u8]) -> Arc<Self> {
            Arc::new(Self {
                status,
                content_type: Some("application/json"),
                body,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<(Method, Request)> {
            self.seen.lock().expect("mutex poisoned").clone()
        }
    }

    #[async_trait]
    impl Transport for CapturingTransport {
        async fn send(
            &self,
            method: Method,
            request: &Request,
            _cancel: CancellationToken,
        ) -> Result<RawResponse, Error> {
            self.seen
                .lock()
                .expect("mutex poisoned")
                .push((method, request.clone()));
            let mut headers = Headers::new();
            if let Some(content_type) = self.content_type {
                headers.append("content-type", content_type);
            }
            Ok(RawResponse::new(self.status, headers, self.body.to_vec()))
        }
    }

    /// Never settles; records the abort token it was handed.
    #[derive(Debug, Default)]
    struct PendingTransport {
        seen: Mutex<Option<CancellationToken>>,
    }

    impl PendingTransport {
        fn token(&self) -> Option<CancellationToken> {
            self.seen.lock().expect("mutex poisoned").clone()
        }
    }

    #[async_trait]
    impl Transport for PendingTransport {
        async fn send(
            &self,
            _method: Method,
            _request: &Request,
            cancel: CancellationToken,
        ) -> Result<RawResponse, Error> {
            *self.seen.lock().expect("mutex poisoned") = Some(cancel.clone());
            std::future::pending::<Result<RawResponse, Error>>().await
        }
    }

    fn client_with(transport: Arc<CapturingTransport>) -> Client {
        ClientBuilder::with_transport(transport)
            .base_url("http://svc")
            .build()
    }

    // === URL composition and query ===

    #[tokio::test]
    async fn test_empty_params_append_no_query_string() {
        let transport = CapturingTransport::json(200, br#"{"ok":true}"#);
        let client = client_with(Arc::clone(&transport));

        client
            .get("/v1/items", Params::new(), RequestOptions::default())
            .await
            .expect("request should succeed");

        let requests = transport.requests();
        assert_eq!(requests[0].1.url, "http://svc/v1/items");
        assert!(!requests[0].1.url.contains('?'));
    }

    #[tokio::test]
    async fn test_query_string_is_appended() {
        let transport = CapturingTransport::json(200, br#"{"ok":true}"#);
        let client = client_with(Arc::clone(&transport));

        client
            .get(
                "v1/items",
                Params::new().with("q", "rust").with("tag", vec!["a", "b"]),
                RequestOptions::default(),
            )
            .await
            .expect("request should succeed");

        let requests = transport.requests();
        assert_eq!(requests[0].1.url, "http://svc/v1/items?q=rust&tag=a&tag=b");
    }

    #[tokio::test]
    async fn test_custom_params_serializer() {
        let transport = CapturingTransport::json(200, br#"{"ok":true}"#);
        let client = ClientBuilder::with_transport(Arc::clone(&transport))
            .base_url("http://svc")
            .params_serializer(|params: &Params| format!("count={}", params.len()))
            .build();

        client
            .get("/x", Params::new().with("a", "1"), RequestOptions::default())
            .await
            .expect("request should succeed");

        assert_eq!(transport.requests()[0].1.url, "http://svc/x?count=1");
    }

    // === headers ===

    #[tokio::test]
    async fn test_sequence_header_expands_in_order() {
        let transport = CapturingTransport::json(200, br#"{"ok":true}"#);
        let client = client_with(Arc::clone(&transport));

        client
            .get(
                "/x",
                Params::new(),
                RequestOptions::new()
                    .header("x-tag", vec!["a", "b"])
                    .header("accept", "application/json"),
            )
            .await
            .expect("request should succeed");

        let request = &transport.requests()[0].1;
        assert_eq!(request.headers.get_all("x-tag"), vec!["a", "b"]);
        assert_eq!(request.headers.get("accept"), Some("application/json"));
    }

    // === interceptors ===

    #[tokio::test]
    async fn test_request_interceptors_fold_in_registration_order() {
        let transport = CapturingTransport::json(200, br#"{"ok":true}"#);
        let mut client = client_with(Arc::clone(&transport));

        client.add_request_interceptor(|mut request: Request| {
            request.headers.append("x-tag", "a");
            request
        });
        client.add_request_interceptor(|mut request: Request| {
            request.headers.append("x-tag", "b");
            request
        });

        client
            .get("/x", Params::new(), RequestOptions::default())
            .await
            .expect("request should succeed");

        let request = &transport.requests()[0].1;
        assert_eq!(request.headers.get_all("x-tag"), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_response_interceptors_observe_in_order() {
        let transport = CapturingTransport::json(200, br#"{"ok":true}"#);
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut client = client_with(Arc::clone(&transport));

        let first = Arc::clone(&order);
        client.add_response_interceptor(move |response: &Response| {
            assert_eq!(response.status, 200);
            first.lock().expect("mutex poisoned").push(1);
        });
        let second = Arc::clone(&order);
        client.add_response_interceptor(move |_: &Response| {
            second.lock().expect("mutex poisoned").push(2);
        });

        let response = client
            .get("/x", Params::new(), RequestOptions::default())
            .await
            .expect("request should succeed");

        assert_eq!(response.data.as_json(), Some(&serde_json::json!({"ok": true})));
        assert_eq!(*order.lock().expect("mutex poisoned"), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_error_interceptors_see_status_errors() {
        let transport = CapturingTransport::json(404, br#"{"reason":"missing"}"#);
        let seen = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&seen);
        let client = ClientBuilder::with_transport(Arc::clone(&transport))
            .base_url("http://svc")
            .error_interceptor(move |error: &ErrorResponse| {
                assert_eq!(error.status, 404);
                observed.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        let result = client
            .get("/missing", Params::new(), RequestOptions::default())
            .await;

        match result {
            Err(Error::Status(error)) => {
                assert_eq!(error.status, 404);
                assert!(error.is_client_error());
            }
            _ => panic!("expected a status error"),
        }
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_decode_faults_bypass_error_interceptors() {
        let transport = CapturingTransport::json(200, b"not json");
        let seen = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&seen);
        let client = ClientBuilder::with_transport(Arc::clone(&transport))
            .base_url("http://svc")
            .error_interceptor(move |_: &ErrorResponse| {
                observed.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        let result = client
            .get("/broken", Params::new(), RequestOptions::default())
            .await;

        assert!(matches!(result, Err(Error::Decode(_))));
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    // === verb wrappers ===

    #[tokio::test]
    async fn test_verb_wrappers_dispatch_fixed_methods() {
        let transport = CapturingTransport::json(200, br#"{"ok":true}"#);
        let client = client_with(Arc::clone(&transport));
        let body = serde_json::json!({"name": "x"});

        client
            .get("/r", Params::new(), RequestOptions::default())
            .await
            .expect("GET should succeed");
        client
            .head("/r", Params::new(), RequestOptions::default())
            .await
            .expect("HEAD should succeed");
        client
            .post("/r", Params::new(), Some(&body), RequestOptions::default())
            .await
            .expect("POST should succeed");
        client
            .put("/r", Params::new(), Some(&body), RequestOptions::default())
            .await
            .expect("PUT should succeed");
        client
            .patch("/r", Params::new(), Some(&body), RequestOptions::default())
            .await
            .expect("PATCH should succeed");
        client
            .delete("/r", Params::new(), RequestOptions::default())
            .await
            .expect("DELETE should succeed");
        client
            .options("/r", Params::new(), RequestOptions::default())
            .await
            .expect("OPTIONS should succeed");
        client
            .trace("/r", Params::new(), RequestOptions::default())
            .await
            .expect("TRACE should succeed");

        let requests = transport.requests();
        let methods: Vec<Method> = requests.iter().map(|(method, _)| *method).collect();
        assert_eq!(
            methods,
            vec![
                Method::Get,
                Method::Head,
                Method::Post,
                Method::Put,
                Method::Patch,
                Method::Delete,
                Method::Options,
                Method::Trace,
            ]
        );

        let post_request = &requests[2].1;
        assert_eq!(post_request.body, Some(serde_json::json!({"name": "x"})));
    }

    #[tokio::test]
    async fn test_unserializable_body_settles_without_network() {
        struct Unserializable;

        impl Serialize for Unserializable {
            fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("not serializable"))
            }
        }

        let transport = CapturingTransport::json(200, br#"{"ok":true}"#);
        let client = client_with(Arc::clone(&transport));

        let result = client
            .post(
                "/r",
                Params::new(),
                Some(&Unserializable),
                RequestOptions::default(),
            )
            .await;

        assert!(matches!(result, Err(Error::Serialization(_))));
        assert!(transport.requests().is_empty());
    }

    // === cancellation and timeout ===

    #[tokio::test]
    async fn test_preflight_cancellation_skips_the_transport() {
        let transport = CapturingTransport::json(200, br#"{"ok":true}"#);
        let client = client_with(Arc::clone(&transport));

        let handle = client.get("/x", Params::new(), RequestOptions::default());
        handle.cancel();
        let result = handle.await;

        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_rejects_and_aborts_the_transport() {
        let transport = Arc::new(PendingTransport::default());
        let client = ClientBuilder::with_transport(Arc::clone(&transport))
            .base_url("http://svc")
            .timeout(Timeout::from_millis(50))
            .build();

        let result = client
            .get("/slow", Params::new(), RequestOptions::default())
            .await;

        assert!(matches!(result, Err(Error::Timeout)));
        let token = transport.token().expect("transport should have been called");
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_in_flight_settles_cancelled_not_timeout() {
        let transport = Arc::new(PendingTransport::default());
        let client = ClientBuilder::with_transport(Arc::clone(&transport))
            .base_url("http://svc")
            .timeout(Timeout::from_millis(50))
            .build();

        let mut handle = client.get("/slow", Params::new(), RequestOptions::default());
        tokio::select! {
            _ = &mut handle => panic!("request should still be pending"),
            _ = tokio::time::sleep(Duration::from_millis(5)) => {}
        }

        handle.cancel();
        let result = handle.await;

        assert!(matches!(result, Err(Error::Cancelled)));
        let token = transport.token().expect("transport should have been called");
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_disables_the_timer() {
        let transport = Arc::new(PendingTransport::default());
        let client = ClientBuilder::with_transport(Arc::clone(&transport))
            .base_url("http://svc")
            .timeout(Timeout::from_millis(0))
            .build();

        let mut handle = client.get("/slow", Params::new(), RequestOptions::default());
        tokio::select! {
            _ = &mut handle => panic!("request should wait on the transport indefinitely"),
            _ = tokio::time::sleep(Duration::from_secs(120)) => {}
        }

        handle.cancel();
        assert!(matches!(handle.await, Err(Error::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_call_timeout_overrides_the_client_default() {
        let transport = Arc::new(PendingTransport::default());
        let client = ClientBuilder::with_transport(Arc::clone(&transport))
            .base_url("http://svc")
            .timeout(Timeout::Off)
            .build();

        let result = client
            .get(
                "/slow",
                Params::new(),
                RequestOptions::new().timeout(Timeout::from_millis(50)),
            )
            .await;

        assert!(matches!(result, Err(Error::Timeout)));
    }
}
