//! The request value carried through a chain dispatch.
//!
//! A [`Request`] is created per call, mutated in place while it traverses the
//! chain, and read by the caller once [`crate::chain::Chain::handle`] returns.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Operation identifier carried by a [`Request`].
///
/// Only [`Verb::Get`] is acted on by the built-in stores; any other string is
/// kept verbatim in [`Verb::Other`] so custom handlers can define their own.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Verb {
    Get,
    Other(String),
}

impl Verb {
    pub fn as_str(&self) -> &str {
        match self {
            Verb::Get => "get",
            Verb::Other(verb) => verb,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Verb {
    fn from(verb: &str) -> Self {
        match verb {
            "get" => Verb::Get,
            other => Verb::Other(other.to_string()),
        }
    }
}

impl From<String> for Verb {
    fn from(verb: String) -> Self {
        if verb == "get" {
            Verb::Get
        } else {
            Verb::Other(verb)
        }
    }
}

impl From<Verb> for String {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => "get".to_string(),
            Verb::Other(verb) => verb,
        }
    }
}

impl FromStr for Verb {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Verb::from(s))
    }
}

/// A lookup request travelling through a [`crate::chain::Chain`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Request {
    pub verb: Verb,
    pub key: String,
    /// Set by the handler that resolved the request; `None` until then.
    pub response: Option<String>,
    /// Names of every handler that saw this request, in visiting order.
    pub trace: Vec<String>,
}

impl Request {
    pub fn new(verb: impl Into<Verb>, key: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            key: key.into(),
            response: None,
            trace: Vec::new(),
        }
    }

    /// Shorthand for a `get` request on `key`.
    pub fn get(key: impl Into<String>) -> Self {
        Self::new(Verb::Get, key)
    }

    /// The handler that made the terminal decision: the resolver, or the last
    /// handler tried when the chain was exhausted.
    pub fn handled_by(&self) -> Option<&str> {
        self.trace.last().map(String::as_str)
    }

    pub fn is_resolved(&self) -> bool {
        self.response.is_some()
    }

    /// Whether a handler with this name was visited during dispatch.
    pub fn visited(&self, handler: &str) -> bool {
        self.trace.iter().any(|name| name == handler)
    }
}
