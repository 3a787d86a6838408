//! Free-form and typed per-message metadata.

use std::collections::HashMap;

/// Router-specific annotations carried alongside a [`crate::Message`].
///
/// `is_bundle` distinguishes data bundles from router control traffic
/// (`HELLO` peer-discovery packets); `copies` is spray-and-wait's remaining
/// copy count; `extra` is an open string map for anything a custom router or
/// application wants to stash without widening this struct.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageMetadata {
    pub is_bundle: bool,
    pub copies: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra: HashMap<String, String>,
}

impl MessageMetadata {
    /// Metadata for an ordinary data bundle, no spray-and-wait copy count.
    pub fn bundle() -> Self {
        MessageMetadata {
            is_bundle: true,
            copies: None,
            extra: HashMap::new(),
        }
    }

    /// Metadata for a router control packet (e.g. `HELLO`).
    pub fn control() -> Self {
        MessageMetadata {
            is_bundle: false,
            copies: None,
            extra: HashMap::new(),
        }
    }

    /// A data bundle carrying an initial spray-and-wait copy count.
    pub fn with_copies(copies: u32) -> Self {
        MessageMetadata {
            is_bundle: true,
            copies: Some(copies),
            extra: HashMap::new(),
        }
    }
}
