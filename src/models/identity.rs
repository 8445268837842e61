// src/models/identity.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Uid used by the guest identity in demo mode.
pub const GUEST_UID: &str = "dummy-user-123";
pub const GUEST_NAME: &str = "Guest";

/// Stable identifier issued by the identity provider. Storage key for results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Returns `None` for blank ids.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into().trim().to_string();
        if id.is_empty() { None } else { Some(Self(id)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The signed-in user of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: UserId,
    pub display_name: String,
    /// Set only for the demo-mode stand-in; guest results are never saved.
    #[serde(default)]
    pub guest: bool,
}

impl Identity {
    pub fn new(uid: UserId, display_name: impl Into<String>) -> Self {
        Self {
            uid,
            display_name: display_name.into(),
            guest: false,
        }
    }

    /// Stand-in identity used when no identity provider is configured.
    pub fn guest() -> Self {
        Self {
            uid: UserId(GUEST_UID.to_string()),
            display_name: GUEST_NAME.to_string(),
            guest: true,
        }
    }

    pub fn is_guest(&self) -> bool {
        self.guest
    }
}
