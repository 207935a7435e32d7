//! Query parameters and query-string serialization

/// A single query-parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Omitted from the query string entirely
    Null,
    /// Contributes one `key=value` pair
    Single(String),
    /// Repeats the key once per element, preserving order
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

macro_rules! param_value_from_display {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                ParamValue::Single(value.to_string())
            }
        })*
    };
}

param_value_from_display!(bool, i32, i64, u32, u64, usize, f64);

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => ParamValue::Null,
        }
    }
}

/// Ordered query-parameter mapping
///
/// Keeps insertion order; repeated keys are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, ParamValue)>);

impl Params {
    /// Creates an empty mapping
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends one entry, chaining
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Appends one entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.push((key.into(), value.into()));
    }

    /// Number of entries, null values included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Expanded `key=value` pairs: null values dropped, list keys repeated
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.0 {
            match value {
                ParamValue::Null => {}
                ParamValue::Single(value) => pairs.push((key.as_str(), value.as_str())),
                ParamValue::List(values) => {
                    pairs.extend(values.iter().map(|value| (key.as_str(), value.as_str())));
                }
            }
        }
        pairs
    }
}

/// Serializes a parameter mapping into a query string
///
/// The returned string carries no leading `?`; an empty string means no
/// query string is appended at all.
pub trait ParamsSerializer: Send + Sync {
    /// Encodes `params` into a query string
    fn serialize(&self, params: &Params) -> String;
}

impl<F> ParamsSerializer for F
where
    F: Fn(&Params) -> String + Send + Sync,
{
    fn serialize(&self, params: &Params) -> String {
        self(params)
    }
}

/// Default query serializer
///
/// Repeats list keys, omits null values and keeps the distinction between
/// an empty string and an absent value. Pair encoding is delegated to
/// `serde_urlencoded`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlEncodedSerializer;

impl ParamsSerializer for UrlEncodedSerializer {
    fn serialize(&self, params: &Params) -> String {
        match serde_urlencoded::to_string(params.pairs()) {
            Ok(query) => query,
            Err(err) => {
                tracing::warn!("Failed to encode query parameters: {}", err);
                String::new()
            }
        }
    }
}
