// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the tagshell bridge and tag dispatcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one foreground-dispatch session with the tag hardware.
///
/// Generated once per dispatcher and handed to every registration, so a
/// second discovery while foregrounded re-enters the same session instead of
/// starting a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(pub Uuid);

impl SessionToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discovery categories the dispatcher registers interest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscoveryCategory {
    /// A tag carrying a structured (NDEF) payload.
    StructuredPayload,
    /// Any tag, payload or not.
    RawTag,
}

impl DiscoveryCategory {
    /// Both categories, in registration order.
    pub const ALL: [DiscoveryCategory; 2] =
        [DiscoveryCategory::StructuredPayload, DiscoveryCategory::RawTag];
}

/// One tag discovery reported by the hardware layer.
///
/// Consumed exactly once by the dispatcher; only the identifier crosses into
/// the hosted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEvent {
    /// Raw identifier bytes as read from the tag.
    pub id: Vec<u8>,
    /// Category the hardware matched the tag under.
    pub category: DiscoveryCategory,
    /// When the hardware layer delivered the event.
    pub discovered_at: DateTime<Utc>,
}

impl TagEvent {
    /// Build an event for a raw tag discovered now.
    pub fn new(id: impl Into<Vec<u8>>) -> Self {
        Self::with_category(id, DiscoveryCategory::RawTag)
    }

    pub fn with_category(id: impl Into<Vec<u8>>, category: DiscoveryCategory) -> Self {
        Self {
            id: id.into(),
            category,
            discovered_at: Utc::now(),
        }
    }

    /// The identifier as it is handed to the hosted page.
    pub fn tag_id(&self) -> TagId {
        TagId::from_bytes(&self.id)
    }
}

/// Uppercase hexadecimal tag identifier, two digits per byte, no separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagId(String);

impl TagId {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode_upper(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Arming state of the tag discovery dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DispatcherState {
    /// Not registered with the hardware layer (initial state).
    #[default]
    Unarmed,
    /// Registered for foreground tag discovery.
    Armed,
}

/// How long a transient notification stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageDuration {
    #[default]
    Short,
    Long,
}

/// Lifecycle callbacks a host surface reports back to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The page finished loading.
    LoadFinished { url: String },
    /// The page failed to load.
    LoadError {
        code: i32,
        description: String,
        url: String,
    },
    /// Load progress in percent (0 to 100).
    Progress(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_id_is_uppercase_without_separators() {
        assert_eq!(TagId::from_bytes(&[0x04, 0xA1]).as_str(), "04A1");
        assert_eq!(TagId::from_bytes(&[0xde, 0xad, 0xbe, 0xef]).as_str(), "DEADBEEF");
    }

    #[test]
    fn tag_id_keeps_leading_zeros() {
        let id = TagId::from_bytes(&[0x00, 0x0f, 0x10]);
        assert_eq!(id.as_str(), "000F10");
        assert_eq!(id.as_str().len() % 2, 0);
    }

    #[test]
    fn empty_id_encodes_to_empty_string() {
        assert_eq!(TagEvent::new(Vec::new()).tag_id().as_str(), "");
    }

    #[test]
    fn dispatcher_starts_unarmed() {
        assert_eq!(DispatcherState::default(), DispatcherState::Unarmed);
    }

    #[test]
    fn session_tokens_are_unique() {
        assert_ne!(SessionToken::new(), SessionToken::new());
    }
}
