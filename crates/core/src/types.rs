use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Unique identity of one relay connection for its whole lifetime.
///
/// Two connections never share an id, even when they join the same channel
/// from the same client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ConnId(Uuid);

impl ConnId {
    /// Allocate a fresh random connection id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
