//! Card instances.
//!
//! A `CardInstance` is one physical copy of a card: a definition slug bound
//! to a unique `InstanceId`. Instances move between hand, deck, discard and
//! void, and keep their ID when they become a unit or a hex.

use serde::{Deserialize, Serialize};

use crate::core::entity::InstanceId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique ID for this copy.
    pub id: InstanceId,

    /// Slug of the card definition.
    pub slug: String,
}

impl CardInstance {
    #[must_use]
    pub fn new(id: InstanceId, slug: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
        }
    }

    /// Check whether this copy is of the given card.
    #[must_use]
    pub fn is(&self, slug: &str) -> bool {
        self.slug == slug
    }
}

impl std::fmt::Display for CardInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.slug, self.id)
    }
}
