use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque per-connection identifier assigned by the relay.
///
/// Ordered so that two peers can deterministically agree on who
/// initiates negotiation (the lexicographically smaller side).
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct EndpointId(pub String);

impl From<&str> for EndpointId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for EndpointId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
