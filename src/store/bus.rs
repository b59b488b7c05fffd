//! Publish/subscribe bus between the core and the presentation layer.
//!
//! Subscribers register a closure per event kind and get back a
//! `SubscriptionId`; emitting calls every subscriber of that kind
//! synchronously, in subscription order. Handlers only see the payload, so
//! they cannot reach back into the bus while it is iterating. A consequence:
//! a handler cannot subscribe or unsubscribe anything from inside a
//! callback. Registration changes happen between emits, through the owner.

use serde::Serialize;
use std::collections::HashMap;

use crate::content::Mood;
use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEventKind {
    Dialogue,
    DialogueChoices,
    InventoryUpdated,
    QuestUpdated,
    PlayerHealth,
    ZoneChanged,
    CombatState,
    SoundCue,
}

impl GameEventKind {
    pub const ALL: [GameEventKind; 8] = [
        GameEventKind::Dialogue,
        GameEventKind::DialogueChoices,
        GameEventKind::InventoryUpdated,
        GameEventKind::QuestUpdated,
        GameEventKind::PlayerHealth,
        GameEventKind::ZoneChanged,
        GameEventKind::CombatState,
        GameEventKind::SoundCue,
    ];

    /// Wire name used by the presentation layer.
    pub fn as_str(self) -> &'static str {
        match self {
            GameEventKind::Dialogue => "dialogue",
            GameEventKind::DialogueChoices => "dialogue-choices",
            GameEventKind::InventoryUpdated => "inventory-updated",
            GameEventKind::QuestUpdated => "quest-updated",
            GameEventKind::PlayerHealth => "player-health",
            GameEventKind::ZoneChanged => "zone-changed",
            GameEventKind::CombatState => "combat-state",
            GameEventKind::SoundCue => "sound-cue",
        }
    }
}

/// Audio collaborator hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Attack,
    Hit,
    Defeat,
    Pickup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum GameEvent {
    /// A spoken or narrated line. Empty speaker and text closes the dialogue box.
    Dialogue {
        speaker: String,
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        mood: Option<Mood>,
    },
    DialogueChoices { choices: Vec<Choice> },
    /// Always the complete inventory, never a delta.
    InventoryUpdated(Vec<InventoryItem>),
    QuestUpdated(QuestProgress),
    PlayerHealth { current: i32, max: i32 },
    ZoneChanged { zone: String },
    CombatState { engaged: bool },
    SoundCue { cue: SoundCue },
}

impl GameEvent {
    pub fn kind(&self) -> GameEventKind {
        match self {
            GameEvent::Dialogue { .. } => GameEventKind::Dialogue,
            GameEvent::DialogueChoices { .. } => GameEventKind::DialogueChoices,
            GameEvent::InventoryUpdated(_) => GameEventKind::InventoryUpdated,
            GameEvent::QuestUpdated(_) => GameEventKind::QuestUpdated,
            GameEvent::PlayerHealth { .. } => GameEventKind::PlayerHealth,
            GameEvent::ZoneChanged { .. } => GameEventKind::ZoneChanged,
            GameEvent::CombatState { .. } => GameEventKind::CombatState,
            GameEvent::SoundCue { .. } => GameEventKind::SoundCue,
        }
    }

    /// `{"event": "<wire name>", "payload": …}` for a presentation bridge.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

pub type Handler = Box<dyn FnMut(&GameEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    handler: Handler,
}

#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<GameEventKind, Vec<Subscriber>>,
    next_id: u64,
}

impl EventBus {
    pub fn subscribe(
        &mut self,
        kind: GameEventKind,
        handler: impl FnMut(&GameEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.entry(kind).or_default().push(Subscriber {
            id,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove exactly one subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in self.subscribers.values_mut() {
            if let Some(index) = list.iter().position(|s| s.id == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    pub fn emit(&mut self, event: GameEvent) {
        let Some(list) = self.subscribers.get_mut(&event.kind()) else {
            return;
        };
        for subscriber in list.iter_mut() {
            (subscriber.handler)(&event);
        }
    }

    pub fn subscriber_count(&self, kind: GameEventKind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .subscribers
            .iter()
            .map(|(kind, list)| (kind.as_str(), list.len()))
            .collect();
        f.debug_struct("EventBus").field("subscribers", &counts).finish()
    }
}
