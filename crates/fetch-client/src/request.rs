//! Request values, header multi-map and per-call options

use std::fmt;
use std::time::Duration;

use crate::params::Params;
use crate::response::ResponseType;

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// HEAD
    Head,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// TRACE
    Trace,
}

impl Method {
    /// Uppercase method name as sent on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered header multi-map
///
/// Entries keep insertion order and names may repeat. Lookup is
/// case-insensitive, per transport convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Creates an empty map
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends one entry, keeping any existing entries with the same name
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value for `name`, matched case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// All values for `name` in insertion order
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// A header value supplied per call: one string or a sequence of strings
///
/// A sequence expands into one header entry per element, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    /// A single header entry
    One(String),
    /// One header entry per element
    Many(Vec<String>),
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::One(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::One(value)
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(values: Vec<String>) -> Self {
        HeaderValue::Many(values)
    }
}

impl From<Vec<&str>> for HeaderValue {
    fn from(values: Vec<&str>) -> Self {
        HeaderValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Expands per-call header entries into the outgoing multi-map
pub(crate) fn expand_headers(entries: &[(String, HeaderValue)]) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in entries {
        match value {
            HeaderValue::One(value) => headers.append(name.clone(), value.clone()),
            HeaderValue::Many(values) => {
                for value in values {
                    headers.append(name.clone(), value.clone());
                }
            }
        }
    }
    headers
}

/// Timeout configuration for a request
///
/// `Off` disables the timer entirely; a zero duration is likewise treated
/// as disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// No timer is armed; the request waits on the transport indefinitely
    Off,
    /// Aborts the request when the duration elapses before the transport
    /// settles
    After(Duration),
}

impl Timeout {
    /// Default request timeout (30 seconds)
    pub const DEFAULT: Timeout = Timeout::After(Duration::from_secs(30));

    /// Timeout from milliseconds; `0` disables the timer
    pub fn from_millis(millis: u64) -> Self {
        if millis == 0 {
            Timeout::Off
        } else {
            Timeout::After(Duration::from_millis(millis))
        }
    }

    /// The armed duration, or `None` when the timer is disabled
    pub fn duration(self) -> Option<Duration> {
        match self {
            Timeout::Off => None,
            Timeout::After(duration) if duration.is_zero() => None,
            Timeout::After(duration) => Some(duration),
        }
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Timeout::DEFAULT
    }
}

/// Per-call options for [`Client::execute`] and the verb methods
///
/// [`Client::execute`]: crate::Client::execute
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Overrides the client-wide timeout when set
    pub timeout: Option<Timeout>,
    /// Extra request headers; a sequence value appends one entry per
    /// element
    pub headers: Vec<(String, HeaderValue)>,
    /// Forces the body decoding, bypassing content negotiation
    pub response_type: Option<ResponseType>,
}

impl RequestOptions {
    /// Creates empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-call timeout
    pub fn timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Appends one header entry
    pub fn header(mut self, name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Forces the body decoding
    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }
}

/// Outgoing request value
///
/// Flows through the request-interceptor chain; each interceptor receives
/// the current value and returns the replacement for the next.
#[derive(Debug, Clone)]
pub struct Request {
    /// Final absolute URL, query string included
    pub url: String,
    /// Ordered header multi-map
    pub headers: Headers,
    /// The original (unserialized) query parameters
    pub params: Params,
    /// JSON body, when present
    pub body: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Trace.as_str(), "TRACE");
        assert_eq!(format!("{}", Method::Patch), "PATCH");
    }

    #[test]
    fn test_headers_lookup_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.append("Content-Type", "application/json");
        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(headers.get("accept"), None);
    }

    #[test]
    fn test_headers_keep_repeated_names_in_order() {
        let mut headers = Headers::new();
        headers.append("x-tag", "a");
        headers.append("accept", "text/plain");
        headers.append("x-tag", "b");
        assert_eq!(headers.get_all("x-tag"), vec!["a", "b"]);
        assert_eq!(headers.get("x-tag"), Some("a"));
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn test_expand_headers_single_and_sequence() {
        let entries = vec![
            ("accept".to_string(), HeaderValue::from("application/json")),
            ("x-tag".to_string(), HeaderValue::from(vec!["a", "b"])),
        ];
        let headers = expand_headers(&entries);
        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get("accept"), Some("application/json"));
        assert_eq!(headers.get_all("x-tag"), vec!["a", "b"]);
    }

    #[test]
    fn test_timeout_zero_is_disabled() {
        assert_eq!(Timeout::from_millis(0), Timeout::Off);
        assert_eq!(Timeout::After(Duration::ZERO).duration(), None);
        assert_eq!(Timeout::Off.duration(), None);
        assert_eq!(
            Timeout::from_millis(50).duration(),
            Some(Duration::from_millis(50))
        );
    }

    #[test]
    fn test_default_timeout_is_thirty_seconds() {
        assert_eq!(
            Timeout::default().duration(),
            Some(Duration::from_secs(30))
        );
    }
}
