//! Item catalog and NPC gift table.

use std::collections::HashMap;

use crate::shared::*;

const FALLBACK_DESCRIPTION: &str = "An enigmatic relic of Eldergrove.";

/// Known item ids → display name and description.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    entries: HashMap<ItemId, (String, String)>,
}

impl ItemCatalog {
    pub fn shipped() -> Self {
        let mut catalog = Self::default();
        catalog.insert(
            "dawnblossom",
            "Dawnblossom",
            "A luminous flower that hums with morning light.",
        );
        catalog.insert(
            "heartstone-splinter",
            "Heartstone Splinter",
            "A shard of the village heartstone, warm to the touch.",
        );
        catalog.insert(
            "ancient-rune",
            "Ancient Rune",
            "An etched rune fragment whispering lost songs.",
        );
        catalog.insert(
            "cavern-heart",
            "Cavern Heart",
            "A crystal pulsing with subterranean tides.",
        );
        catalog
    }

    pub fn insert(&mut self, id: &str, name: &str, description: &str) {
        self.entries
            .insert(id.to_string(), (name.to_string(), description.to_string()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Describe an item. Unknown ids get a generic description named after the id.
    pub fn describe(&self, id: &str) -> InventoryItem {
        match self.entries.get(id) {
            Some((name, description)) => InventoryItem {
                id: id.to_string(),
                name: name.clone(),
                description: description.clone(),
            },
            None => InventoryItem {
                id: id.to_string(),
                name: id.to_string(),
                description: FALLBACK_DESCRIPTION.to_string(),
            },
        }
    }
}

/// Gifts handed over the first time the player talks to an NPC.
pub fn npc_rewards() -> HashMap<String, InventoryItem> {
    let mut rewards = HashMap::new();
    rewards.insert(
        "blacksmith-tarin".to_string(),
        InventoryItem {
            id: "heartstone-splinter".into(),
            name: "Heartstone Splinter".into(),
            description: "A shard gifted by Tarin, glimmering with protective warmth.".into(),
        },
    );
    rewards
}
