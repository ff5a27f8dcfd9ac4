use std::fmt;

use crate::{error::ProtocolError, Deserialize, Serialize};

/// HTTP method an operation is issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Parameters go in the query string, body is JSON.
    Get,
    /// Parameters go in a form-encoded body, result is operation defined.
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// Authorization tier, an index into the configured key list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tier(pub u8);

impl Tier {
    /// Read access to the user's own tracking data.
    pub const READ: Tier = Tier(0);
    /// Mutations and message counters.
    pub const WRITE: Tier = Tier(1);
    /// Private message contents.
    pub const PRIVATE: Tier = Tier(2);

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single call against the tracking endpoint, before the key is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub tier: Tier,
    pub service: &'static str,
    pub task: Option<&'static str>,
    pub params: Vec<(&'static str, String)>,
}

impl Request {
    pub fn new(method: Method, tier: Tier, service: &'static str) -> Self {
        Self {
            method,
            tier,
            service,
            task: None,
            params: Vec::new(),
        }
    }

    pub fn get(tier: Tier, service: &'static str) -> Self {
        Self::new(Method::Get, tier, service)
    }

    pub fn post(tier: Tier, service: &'static str) -> Self {
        Self::new(Method::Post, tier, service)
    }

    pub fn task(mut self, task: &'static str) -> Self {
        self.task = Some(task);
        self
    }

    pub fn param(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.params.push((key, value.to_string()));
        self
    }

    /// Adds the parameter only when a value is present.
    pub fn param_opt<T: fmt::Display>(self, key: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Value of the first parameter named `key`.
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Operation parameters as unescaped `key=value` pairs joined by `&`.
    pub fn params_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A typed remote operation.
pub trait Operation {
    /// Decoded result of the operation.
    type Output;

    /// Fixed mapping of the typed arguments to a request.
    fn request(&self) -> Request;

    /// Decode the raw response body.
    fn decode(&self, body: &str) -> Result<Self::Output, ProtocolError>;
}

/// Decode a JSON body into `T`.
pub fn decode_json<T>(body: &str) -> Result<T, ProtocolError>
where
    T: for<'de> Deserialize<'de>,
{
    Ok(serde_json::from_str(body)?)
}

/// Decode an integer-as-boolean POST result (`1` success, `0` failure).
pub fn decode_flag(body: &str) -> Result<bool, ProtocolError> {
    match body.trim() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(ProtocolError::UnexpectedResult {
            expected: "0/1 flag",
            body: other.to_string(),
        }),
    }
}

/// Decode a numeric identifier returned by a POST.
pub fn decode_id(body: &str) -> Result<u64, ProtocolError> {
    let trimmed = body.trim().trim_matches('"');
    trimmed
        .parse()
        .map_err(|_| ProtocolError::UnexpectedResult {
            expected: "numeric id",
            body: body.trim().to_string(),
        })
}
