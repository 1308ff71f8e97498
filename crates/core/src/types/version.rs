//! Optimistic-concurrency version token.

use serde::{Deserialize, Serialize};

/// The version counter the platform attaches to every mutable resource.
///
/// Every mutation must send the version the client last saw; the
/// platform rejects the request if server-side state has moved on. The
/// response carries the new version, which replaces this one wholesale.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// Create a version token.
    #[must_use]
    pub const fn new(version: u64) -> Self {
        Self(version)
    }

    /// Get the underlying counter value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(version: u64) -> Self {
        Self(version)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_transparent() {
        let version = Version::new(3);
        assert_eq!(serde_json::to_string(&version).unwrap(), "3");
        let back: Version = serde_json::from_str("4").unwrap();
        assert_eq!(back, Version::new(4));
    }
}
