//! Shared components, resources, events, and states for Eldergrove.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain's internals directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// SESSION STATE: top-level lifecycle
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum SessionState {
    #[default]
    Loading,
    Playing,
    /// Session torn down: zone entities despawned, pending actions dropped.
    Ended,
}

// ═══════════════════════════════════════════════════════════════════════
// TILES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TileKind {
    Grass,
    Path,
    Flowers,
    Stone,
    Water,
    CaveFloor,
}

// ═══════════════════════════════════════════════════════════════════════
// INVENTORY
// ═══════════════════════════════════════════════════════════════════════

pub type ItemId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
}

// ═══════════════════════════════════════════════════════════════════════
// QUESTS & DIALOGUE: shapes shared by content, store and events
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    Item,
    Location,
    Defeat,
}

/// A (kind, value) fact that can satisfy a quest stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub kind: RequirementKind,
    pub value: String,
}

impl Requirement {
    pub fn item(id: impl Into<String>) -> Self {
        Self { kind: RequirementKind::Item, value: id.into() }
    }

    pub fn location(zone: impl Into<String>) -> Self {
        Self { kind: RequirementKind::Location, value: zone.into() }
    }

    pub fn defeat(subtype: impl Into<String>) -> Self {
        Self { kind: RequirementKind::Defeat, value: subtype.into() }
    }
}

/// Live progress for one started quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestProgress {
    pub id: String,
    pub stage_index: usize,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceEffects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<ChoiceEffects>,
}

impl Choice {
    /// Quest this choice starts, if any.
    pub fn quest_effect(&self) -> Option<&str> {
        self.effects.as_ref().and_then(|e| e.quest.as_deref())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ENTITY KINDS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Patrol {
    #[default]
    None,
    Circle,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    Shrine,
    Tree,
}

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, Default)]
pub struct Player;

/// Continuous world position in pixels, y grows downward (row order).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Deref, DerefMut)]
pub struct LogicalPosition(pub Vec2);

#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Deref, DerefMut)]
pub struct Velocity(pub Vec2);

/// Marker for everything that belongs to the loaded zone.
/// Used for bulk despawning when the zone changes or the session ends.
#[derive(Component, Debug)]
pub struct ZoneEntity;

/// Index of the spawn descriptor that produced this entity. Breaks exact
/// distance ties when searching for the nearest interactable.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpawnOrder(pub usize);

#[derive(Component, Debug, Clone)]
pub struct Npc {
    pub id: String,
}

#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub subtype: String,
    pub health: i32,
    pub max_health: i32,
    pub patrol: Patrol,
}

impl Enemy {
    pub fn new(subtype: impl Into<String>, max_health: i32, patrol: Patrol) -> Self {
        Self {
            subtype: subtype.into(),
            health: max_health,
            max_health,
            patrol,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Pickup {
    pub item_id: ItemId,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Prop {
    pub kind: PropKind,
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

/// Game actions for the current frame. Held movement keys plus the two
/// discrete presses. Rebuilt every frame by the input domain.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub interact: bool,
    pub attack: bool,
}

impl PlayerInput {
    /// Unit direction from the held movement keys (y grows downward).
    /// Diagonals are normalised; opposing keys cancel.
    pub fn move_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.left {
            axis.x -= 1.0;
        }
        if self.right {
            axis.x += 1.0;
        }
        if self.up {
            axis.y -= 1.0;
        }
        if self.down {
            axis.y += 1.0;
        }
        axis.normalize_or_zero()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS: commands from the presentation layer
// ═══════════════════════════════════════════════════════════════════════

/// The player picked a dialogue choice in the UI.
#[derive(Event, Debug, Clone)]
pub struct DialogueChoiceSelected {
    pub choice: Choice,
}
