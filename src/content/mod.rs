//! Content layer: the static, read-only world data.
//!
//! Zones are built by hand-written generators (`zones`), dialogue trees and
//! quests are authored in RON under `assets/content/` and embedded at compile
//! time (`story`), and the item catalog / NPC rewards live in `items`.
//!
//! Everything here is immutable once loaded. The tables are shared behind an
//! `Arc` so the store, the dialogue engine and the world systems all read the
//! same instance.

pub mod items;
pub mod story;
pub mod zones;

use bevy::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use crate::shared::*;

pub use items::ItemCatalog;
pub use story::{DialogueLine, DialogueTree, Mood, Quest, QuestStage};
pub use zones::{EntitySpawn, Zone, ZoneTransition};

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(SessionState::Loading), finish_loading);
    }
}

/// All content tables, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct ContentTables {
    pub zones: HashMap<String, Zone>,
    pub dialogues: HashMap<String, DialogueTree>,
    pub quests: HashMap<String, Quest>,
    pub items: ItemCatalog,
    /// One-time gifts handed over the first time the player talks to an NPC.
    pub npc_rewards: HashMap<String, InventoryItem>,
}

impl ContentTables {
    /// Build the shipped world: generated zones plus the embedded RON story.
    pub fn load() -> Result<Self, ContentError> {
        let dialogues = story::parse_dialogues(story::DIALOGUE_RON)
            .map_err(|source| ContentError { table: "dialogue", source })?;
        let quests = story::parse_quests(story::QUESTS_RON)
            .map_err(|source| ContentError { table: "quests", source })?;

        Ok(Self {
            zones: zones::all_zones()
                .into_iter()
                .map(|zone| (zone.id.clone(), zone))
                .collect(),
            dialogues: dialogues
                .into_iter()
                .map(|tree| (tree.id.clone(), tree))
                .collect(),
            quests: quests
                .into_iter()
                .map(|quest| (quest.id.clone(), quest))
                .collect(),
            items: ItemCatalog::shipped(),
            npc_rewards: items::npc_rewards(),
        })
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.get(id)
    }

    pub fn dialogue(&self, id: &str) -> Option<&DialogueTree> {
        self.dialogues.get(id)
    }

    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quests.get(id)
    }

    pub fn insert_zone(&mut self, zone: Zone) {
        self.zones.insert(zone.id.clone(), zone);
    }

    pub fn insert_dialogue(&mut self, tree: DialogueTree) {
        self.dialogues.insert(tree.id.clone(), tree);
    }

    pub fn insert_quest(&mut self, quest: Quest) {
        self.quests.insert(quest.id.clone(), quest);
    }
}

/// A content table that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("content table `{table}` failed to parse")]
pub struct ContentError {
    pub table: &'static str,
    #[source]
    pub source: ron::error::SpannedError,
}

/// Shared handle to the loaded tables.
#[derive(Resource, Debug, Clone, Deref)]
pub struct Content(pub Arc<ContentTables>);

impl Content {
    pub fn new(tables: ContentTables) -> Self {
        Self(Arc::new(tables))
    }
}

/// Content is parsed before the app is built, so loading only reports what
/// is available and moves the session on.
fn finish_loading(content: Res<Content>, mut next_state: ResMut<NextState<SessionState>>) {
    info!(
        "ContentPlugin: {} zones, {} dialogue trees, {} quests, {} catalogued items",
        content.zones.len(),
        content.dialogues.len(),
        content.quests.len(),
        content.items.len()
    );
    next_state.set(SessionState::Playing);
}
