//! The game-state store: the single mutable source of truth for a session.
//!
//! Owns the player (zone, position, health), the inventory, quest progress
//! and the defeated-enemy tally, plus the event bus every other component
//! talks through. Every mutation emits its event immediately; nothing is
//! queued. Quest progression lives in `quests`.

pub mod bus;
mod quests;

use bevy::prelude::*;
use std::collections::HashMap;

use crate::config::GameConfig;
use crate::content::{Content, Mood};
use crate::shared::*;

pub use bus::{EventBus, GameEvent, GameEventKind, SoundCue, SubscriptionId};

#[derive(Resource, Debug)]
pub struct GameStore {
    content: Content,
    current_zone: String,
    player_position: Vec2,
    health: i32,
    max_health: i32,
    inventory: Vec<InventoryItem>,
    /// Started quests in start order.
    quests: Vec<QuestProgress>,
    defeated: HashMap<String, u32>,
    bus: EventBus,
}

impl GameStore {
    pub fn new(content: Content, config: &GameConfig) -> Self {
        Self {
            content,
            current_zone: config.start_zone.clone(),
            player_position: config.start_position,
            health: config.player_max_health,
            max_health: config.player_max_health,
            inventory: Vec::new(),
            quests: Vec::new(),
            defeated: HashMap::new(),
            bus: EventBus::default(),
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn current_zone(&self) -> &str {
        &self.current_zone
    }

    pub fn player_position(&self) -> Vec2 {
        self.player_position
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.inventory.iter().any(|item| item.id == id)
    }

    pub fn defeated_count(&self, subtype: &str) -> u32 {
        self.defeated.get(subtype).copied().unwrap_or(0)
    }

    // ── Event bus ───────────────────────────────────────────────────────

    pub fn subscribe(
        &mut self,
        kind: GameEventKind,
        handler: impl FnMut(&GameEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(kind, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.bus.emit(event);
    }

    /// Emit a narrated line through the dialogue channel.
    pub fn narrate(&mut self, speaker: &str, text: impl Into<String>) {
        self.emit(GameEvent::Dialogue {
            speaker: speaker.to_string(),
            text: text.into(),
            mood: None,
        });
    }

    pub fn say(&mut self, speaker: &str, text: &str, mood: Option<Mood>) {
        self.emit(GameEvent::Dialogue {
            speaker: speaker.to_string(),
            text: text.to_string(),
            mood,
        });
    }

    pub fn cue(&mut self, cue: SoundCue) {
        self.emit(GameEvent::SoundCue { cue });
    }

    /// Re-emit the full inventory and health so a newly attached
    /// presentation layer starts in sync.
    pub fn announce(&mut self) {
        self.emit(GameEvent::InventoryUpdated(self.inventory.clone()));
        self.emit_health();
    }

    // ── Player ──────────────────────────────────────────────────────────

    /// Unknown zone ids are ignored.
    pub fn set_zone(&mut self, zone: &str, position: Option<Vec2>) {
        if self.content.zone(zone).is_none() {
            debug!("GameStore: ignoring unknown zone '{}'", zone);
            return;
        }
        self.current_zone = zone.to_string();
        if let Some(position) = position {
            self.player_position = position;
        }
        self.emit(GameEvent::ZoneChanged { zone: zone.to_string() });
        self.check_quest_requirements(&Requirement::location(zone));
    }

    /// Movement write-back; silent.
    pub fn set_player_position(&mut self, position: Vec2) {
        self.player_position = position;
    }

    pub fn damage(&mut self, amount: i32) {
        self.health = self.health.saturating_sub(amount).clamp(0, self.max_health);
        self.emit_health();
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = self.health.saturating_add(amount).clamp(0, self.max_health);
        self.emit_health();
    }

    /// Defeat recovery: back to full health.
    pub fn revive(&mut self) {
        self.health = self.max_health;
        self.emit_health();
    }

    fn emit_health(&mut self) {
        self.emit(GameEvent::PlayerHealth {
            current: self.health,
            max: self.max_health,
        });
    }

    // ── Inventory & combat tally ────────────────────────────────────────

    /// Idempotent: a second item with the same id is ignored.
    pub fn add_item(&mut self, item: InventoryItem) {
        if self.has_item(&item.id) {
            return;
        }
        let id = item.id.clone();
        info!("GameStore: picked up '{}'", id);
        self.inventory.push(item);
        self.emit(GameEvent::InventoryUpdated(self.inventory.clone()));
        self.check_quest_requirements(&Requirement::item(id));
    }

    pub fn defeat_enemy(&mut self, subtype: &str) {
        *self.defeated.entry(subtype.to_string()).or_insert(0) += 1;
        info!(
            "GameStore: defeated '{}' ({} total)",
            subtype,
            self.defeated_count(subtype)
        );
        self.check_quest_requirements(&Requirement::defeat(subtype));
    }
}
