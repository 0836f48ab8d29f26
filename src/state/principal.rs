//! Principal identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use warden_proto::{ProtoError, Snowflake};

/// Opaque, stable identifier of a platform user.
///
/// Stored in the allow-list file as the user's snowflake string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(Snowflake);

impl Principal {
    #[inline]
    pub const fn new(id: Snowflake) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> Snowflake {
        self.0
    }

    /// Platform mention markup, rendered by clients as `@name`.
    pub fn mention(self) -> String {
        format!("<@{}>", self.0)
    }
}

impl From<Snowflake> for Principal {
    fn from(id: Snowflake) -> Self {
        Self(id)
    }
}

impl From<u64> for Principal {
    fn from(raw: u64) -> Self {
        Self(Snowflake::new(raw))
    }
}

impl FromStr for Principal {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
