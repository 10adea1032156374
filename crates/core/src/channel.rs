//! Channel naming.
//!
//! A channel is named by the request target of the upgrade request, taken
//! verbatim. `/ws/cam1` and `/ws/cam1/` are different channels, and so are
//! `/ws/cam1` and `/ws/cam1?low=1`.

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

/// Opaque channel identifier. Equality is exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Map a request target (path plus optional query) to its channel.
    ///
    /// Total over all strings: nothing is rejected or normalized, so two
    /// distinct targets always name two distinct channels.
    pub fn from_request_target(target: &str) -> Self {
        Self(target.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ChannelId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
