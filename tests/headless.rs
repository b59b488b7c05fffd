//! Headless integration tests for Eldergrove.
//!
//! These tests run a whole session without a window or GPU: Bevy's
//! `MinimalPlugins` tick the app, `TimeUpdateStrategy::ManualDuration` makes
//! every frame exactly 16ms, a `SharedInput` handle plays the keyboard and a
//! recording subscriber captures what the presentation layer would see.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eldergrove::config::GameConfig;
use eldergrove::content::{ContentTables, EntitySpawn, Zone, ZoneTransition};
use eldergrove::dialogue::DialogueEngine;
use eldergrove::input::{Direction, SharedInput};
use eldergrove::session::SessionBuilder;
use eldergrove::shared::*;
use eldergrove::store::{GameEvent, GameEventKind, GameStore, SoundCue};
use eldergrove::world::tasks::TaskQueue;
use eldergrove::world::CombatTimers;

const FRAME: Duration = Duration::from_millis(16);

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

type EventLog = Arc<Mutex<Vec<GameEvent>>>;

struct TestSession {
    app: App,
    input: SharedInput,
    events: EventLog,
}

/// Builds a session on `MinimalPlugins` with a fixed frame time and a
/// recording subscriber attached before the first update.
fn build_session(builder: SessionBuilder) -> TestSession {
    let input = SharedInput::default();
    let mut app = builder
        .with_input(input.clone())
        .build()
        .expect("session should build");
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let mut store = app.world_mut().resource_mut::<GameStore>();
    for kind in GameEventKind::ALL {
        let events = events.clone();
        store.subscribe(kind, move |event| events.lock().unwrap().push(event.clone()));
    }

    let mut session = TestSession { app, input, events };
    session.boot();
    session
}

impl TestSession {
    /// Ticks until the session is Playing.
    fn boot(&mut self) {
        for _ in 0..5 {
            self.app.update();
            if *self.app.world().resource::<State<SessionState>>().get() == SessionState::Playing {
                return;
            }
        }
        panic!("session never reached Playing");
    }

    fn run(&mut self, frames: u32) {
        for _ in 0..frames {
            self.app.update();
        }
    }

    fn store(&self) -> &GameStore {
        self.app.world().resource::<GameStore>()
    }

    fn store_mut(&mut self) -> Mut<'_, GameStore> {
        self.app.world_mut().resource_mut::<GameStore>()
    }

    fn events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }

    fn player_position(&mut self) -> Vec2 {
        let world = self.app.world_mut();
        world
            .query_filtered::<&LogicalPosition, With<Player>>()
            .single(world)
            .0
    }

    fn place_player(&mut self, position: Vec2) {
        let world = self.app.world_mut();
        world
            .query_filtered::<&mut LogicalPosition, With<Player>>()
            .single_mut(world)
            .0 = position;
    }

    fn enemies(&mut self) -> Vec<Enemy> {
        let world = self.app.world_mut();
        world.query::<&Enemy>().iter(world).cloned().collect()
    }

    fn count<C: Component>(&mut self) -> usize {
        let world = self.app.world_mut();
        world.query::<&C>().iter(world).count()
    }

    fn sound_cues(&self, cue: SoundCue) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, GameEvent::SoundCue { cue: c } if *c == cue))
            .count()
    }

    fn dialogue_texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Dialogue { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }
}

fn shipped_session_at(zone: &str, position: Vec2) -> TestSession {
    let config = GameConfig {
        start_zone: zone.into(),
        start_position: position,
        ..default()
    };
    build_session(SessionBuilder::new().with_config(config))
}

/// A 10×10 grass arena with one stationary enemy, and nothing else.
fn arena(enemy_at: Vec2) -> ContentTables {
    let mut zone = Zone::new("arena", "the Arena", 10, 10, TileKind::Grass);
    zone.entities = vec![EntitySpawn::Enemy {
        position: enemy_at,
        subtype: "shade".into(),
        patrol: Patrol::None,
    }];
    let mut tables = ContentTables::default();
    tables.insert_zone(zone);
    tables
}

fn arena_session(tables: ContentTables, config: GameConfig) -> TestSession {
    let config = GameConfig { start_zone: "arena".into(), ..config };
    build_session(SessionBuilder::new().with_content(tables).with_config(config))
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_boot_announces_state_and_loads_forest() {
    let mut session = shipped_session_at("forest", Vec2::new(576.0, 576.0));

    let events = session.events();
    assert!(events.contains(&GameEvent::ZoneChanged { zone: "forest".into() }));
    assert!(events.contains(&GameEvent::InventoryUpdated(Vec::new())));
    assert!(events.contains(&GameEvent::PlayerHealth { current: 100, max: 100 }));

    assert_eq!(session.count::<Player>(), 1);
    assert_eq!(session.count::<Npc>(), 1);
    assert_eq!(session.count::<Enemy>(), 2);
    assert_eq!(session.count::<Pickup>(), 1);
    assert!(session.enemies().iter().all(|e| e.health == 60));
}

// ─────────────────────────────────────────────────────────────────────────────
// Movement
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_walking_writes_position_back_to_store() {
    let mut session = shipped_session_at("forest", Vec2::new(576.0, 576.0));
    session.input.hold(Direction::Right);
    session.run(30);
    session.input.release_all();

    let position = session.player_position();
    assert!(position.x > 576.0 + 50.0, "moved to {position}");
    assert_eq!(position.y, 576.0);
    assert_eq!(session.store().player_position(), position);
}

#[test]
fn test_player_slides_along_pond_edge() {
    // Pond water covers tiles (4..10, 4..8); start just below it.
    let mut session = shipped_session_at("forest", Vec2::new(200.0, 280.0));
    session.input.hold(Direction::Up);
    session.input.hold(Direction::Right);
    session.run(40);

    let position = session.player_position();
    assert!(position.y >= 256.0, "entered the water at {position}");
    assert!(position.x > 250.0, "x movement was blocked too: {position}");
}

// ─────────────────────────────────────────────────────────────────────────────
// Interaction
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_talking_to_blacksmith_grants_reward_once() {
    let mut session = shipped_session_at("village", Vec2::new(544.0, 450.0));

    session.input.press_interact();
    session.run(1);
    assert!(session.app.world().resource::<DialogueEngine>().is_active());
    assert!(session.store().has_item("heartstone-splinter"));

    // Two lines, no choices: two advances close the conversation.
    session.input.press_interact();
    session.run(1);
    session.input.press_interact();
    session.run(1);
    assert!(!session.app.world().resource::<DialogueEngine>().is_active());
    assert_eq!(session.dialogue_texts().last().map(String::as_str), Some(""));

    // Talking again restarts the tree but the gift is not duplicated.
    session.input.press_interact();
    session.run(1);
    assert!(session.app.world().resource::<DialogueEngine>().is_active());
    assert_eq!(session.store().inventory().len(), 1);
}

#[test]
fn test_shrine_heals_and_narrates() {
    let mut session = shipped_session_at("forest", Vec2::new(640.0, 610.0));
    session.store_mut().damage(50);
    session.clear_events();

    session.input.press_interact();
    session.run(1);

    assert_eq!(session.store().health(), 70);
    assert!(session.events().contains(&GameEvent::Dialogue {
        speaker: "Shrine".into(),
        text: "The rune warms beneath your palm. A hush sweeps the grove.".into(),
        mood: None,
    }));
}

#[test]
fn test_ranger_choice_starts_quest_and_village_advances_it() {
    let mut session = shipped_session_at("forest", Vec2::new(480.0, 500.0));

    // Three lines; the last one offers choices and blocks further advances.
    for _ in 0..4 {
        session.input.press_interact();
        session.run(1);
    }
    let engine = session.app.world().resource::<DialogueEngine>();
    assert_eq!(engine.session().map(|s| s.line_index), Some(2));

    let choice = Choice {
        text: "Where can I find help?".into(),
        next: Some("ranger-sylla:village".into()),
        effects: Some(ChoiceEffects { quest: Some("meet-elder".into()) }),
    };
    session.app.world_mut().send_event(DialogueChoiceSelected { choice });
    session.run(1);

    let progress = session.store().quest_progress("meet-elder").cloned();
    assert_eq!(progress.map(|p| p.stage_index), Some(0));
    let engine = session.app.world().resource::<DialogueEngine>();
    assert_eq!(engine.session().map(|s| s.tree_id.as_str()), Some("ranger-sylla:village"));

    // Step onto the east exit.
    session.clear_events();
    session.place_player(Vec2::new(940.0, 370.0));
    session.run(1);

    assert_eq!(session.store().current_zone(), "village");
    assert_eq!(session.store().player_position(), Vec2::new(64.0, 368.0));
    let events = session.events();
    assert!(events.contains(&GameEvent::QuestUpdated(QuestProgress {
        id: "meet-elder".into(),
        stage_index: 1,
        completed: false,
    })));
    assert!(events.contains(&GameEvent::Dialogue {
        speaker: "Narrator".into(),
        text: "You cross into Brightwater Village.".into(),
        mood: None,
    }));
    assert_eq!(session.count::<Npc>(), 2);
    assert_eq!(session.count::<Enemy>(), 0);
}

#[test]
fn test_choice_applies_before_interact_in_the_same_frame() {
    let mut session = shipped_session_at("forest", Vec2::new(480.0, 500.0));
    for _ in 0..3 {
        session.input.press_interact();
        session.run(1);
    }

    let choice = Choice {
        text: "Where can I find help?".into(),
        next: Some("ranger-sylla:village".into()),
        effects: Some(ChoiceEffects { quest: Some("meet-elder".into()) }),
    };
    session.app.world_mut().send_event(DialogueChoiceSelected { choice });
    session.input.press_interact();
    session.run(1);

    // The choice opens the follow-up tree, then the press advances it.
    let engine = session.app.world().resource::<DialogueEngine>();
    let current = engine.session().map(|s| (s.tree_id.clone(), s.line_index));
    assert_eq!(current, Some(("ranger-sylla:village".to_string(), 1)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Transitions
// ─────────────────────────────────────────────────────────────────────────────

/// Arena with an east exit to `to`, plus an annex whose arrival point sits
/// inside its own exit back to the arena.
fn linked_arenas(to: &str) -> ContentTables {
    let mut tables = arena(Vec2::new(40.0, 300.0));
    let mut arena_zone = tables.zone("arena").cloned().expect("arena zone");
    arena_zone.transitions = vec![ZoneTransition {
        trigger: Rect::new(280.0, 0.0, 320.0, 320.0),
        to: to.into(),
        target: Vec2::new(40.0, 160.0),
    }];
    tables.insert_zone(arena_zone);

    let mut annex = Zone::new("annex", "the Annex", 10, 10, TileKind::Grass);
    annex.transitions = vec![ZoneTransition {
        trigger: Rect::new(0.0, 0.0, 40.0, 320.0),
        to: "arena".into(),
        target: Vec2::new(160.0, 160.0),
    }];
    tables.insert_zone(annex);
    tables
}

fn zone_changes(session: &TestSession) -> Vec<String> {
    session
        .events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::ZoneChanged { zone } => Some(zone),
            _ => None,
        })
        .collect()
}

#[test]
fn test_transition_cooldown_prevents_immediate_bounce_back() {
    let config = GameConfig { start_position: Vec2::new(160.0, 160.0), ..default() };
    let mut session = arena_session(linked_arenas("annex"), config);
    session.clear_events();

    session.place_player(Vec2::new(300.0, 160.0));
    session.run(1);
    assert_eq!(session.store().current_zone(), "annex");
    assert_eq!(session.player_position(), Vec2::new(40.0, 160.0));

    // Standing in the annex exit for 320ms: still inside the 500ms cooldown.
    session.run(20);
    assert_eq!(zone_changes(&session), vec!["annex".to_string()]);
    assert!(!session.app.world().resource::<CombatTimers>().transition.finished());

    // Once the cooldown has run out the exit fires exactly once more.
    session.run(20);
    assert_eq!(zone_changes(&session), vec!["annex".to_string(), "arena".to_string()]);
    assert_eq!(session.store().current_zone(), "arena");
    assert_eq!(session.player_position(), Vec2::new(160.0, 160.0));
}

#[test]
fn test_transition_to_unknown_zone_is_ignored() {
    let config = GameConfig { start_position: Vec2::new(160.0, 160.0), ..default() };
    let mut session = arena_session(linked_arenas("nowhere"), config);
    session.clear_events();

    session.place_player(Vec2::new(300.0, 160.0));
    session.run(3);

    assert_eq!(session.store().current_zone(), "arena");
    assert_eq!(session.player_position(), Vec2::new(300.0, 160.0));
    assert!(zone_changes(&session).is_empty());
    assert!(session.app.world().resource::<CombatTimers>().transition.finished());
    assert_eq!(session.count::<Enemy>(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Combat
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_two_attacks_defeat_an_enemy() {
    let config = GameConfig { start_position: Vec2::new(220.0, 160.0), ..default() };
    let mut session = arena_session(arena(Vec2::new(160.0, 160.0)), config);

    session.input.press_attack();
    session.run(25);
    assert_eq!(session.enemies().iter().map(|e| e.health).collect::<Vec<_>>(), vec![25]);

    session.input.press_attack();
    session.run(15);
    assert!(session.enemies().is_empty());
    assert_eq!(session.store().defeated_count("shade"), 1);
    assert_eq!(session.sound_cues(SoundCue::Defeat), 1);
}

#[test]
fn test_attack_presses_during_swing_are_ignored() {
    let config = GameConfig { start_position: Vec2::new(220.0, 160.0), ..default() };
    let mut session = arena_session(arena(Vec2::new(40.0, 40.0)), config);

    session.input.press_attack();
    session.run(1);
    session.input.press_attack();
    session.run(1);
    assert_eq!(session.sound_cues(SoundCue::Attack), 1);

    // Lock lasts 320ms.
    session.run(20);
    session.input.press_attack();
    session.run(1);
    assert_eq!(session.sound_cues(SoundCue::Attack), 2);
}

#[test]
fn test_zone_change_cancels_pending_hit() {
    let mut tables = arena(Vec2::new(160.0, 160.0));
    let mut zone = tables.zone("arena").cloned().expect("arena zone");
    zone.transitions = vec![ZoneTransition {
        trigger: Rect::new(240.0, 0.0, 320.0, 320.0),
        to: "arena".into(),
        target: Vec2::new(170.0, 200.0),
    }];
    tables.insert_zone(zone);

    let config = GameConfig { start_position: Vec2::new(220.0, 160.0), ..default() };
    let mut session = arena_session(tables, config);

    // Nine frames at 2.24px reach the trigger at x = 240.
    session.input.hold(Direction::Right);
    session.input.press_attack();
    session.run(9);
    session.input.release_all();
    assert_eq!(session.store().player_position(), Vec2::new(170.0, 200.0));

    // Past the wind-up: the swing started in the old zone and must not land.
    session.run(10);
    assert_eq!(session.enemies().iter().map(|e| e.health).collect::<Vec<_>>(), vec![60]);
    assert_eq!(session.sound_cues(SoundCue::Hit), 0);
}

#[test]
fn test_contact_damage_respects_invulnerability() {
    let config = GameConfig { start_position: Vec2::new(160.0, 160.0), ..default() };
    let mut session = arena_session(arena(Vec2::new(160.0, 160.0)), config);

    assert_eq!(session.store().health(), 88);
    session.run(40);
    assert_eq!(session.store().health(), 88);
    session.run(20);
    assert_eq!(session.store().health(), 76);
}

#[test]
fn test_defeat_recovers_at_respawn_point() {
    let config = GameConfig {
        start_position: Vec2::new(160.0, 160.0),
        respawn_position: Vec2::new(300.0, 300.0),
        contact_damage: 500,
        ..default()
    };
    let mut session = arena_session(arena(Vec2::new(160.0, 160.0)), config);

    assert_eq!(session.store().health(), 100);
    assert_eq!(session.player_position(), Vec2::new(300.0, 300.0));
    assert_eq!(session.store().player_position(), Vec2::new(300.0, 300.0));
    assert_eq!(session.store().current_zone(), "arena");
    assert!(session.events().contains(&GameEvent::PlayerHealth { current: 0, max: 100 }));
    assert!(session.events().contains(&GameEvent::Dialogue {
        speaker: "Narrator".into(),
        text: "The grove refuses to let you fall. You awaken beneath the heartwood.".into(),
        mood: None,
    }));
}

#[test]
fn test_engagement_is_signalled_on_change_only() {
    let config = GameConfig { start_position: Vec2::new(300.0, 300.0), ..default() };
    let mut session = arena_session(arena(Vec2::new(200.0, 300.0)), config);
    session.run(10);

    let signals: Vec<bool> = session
        .events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::CombatState { engaged } => Some(engaged),
            _ => None,
        })
        .collect();
    assert_eq!(signals, vec![true]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Items & lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_pickup_adds_item_and_removes_it_from_play() {
    let mut session = shipped_session_at("forest", Vec2::new(352.0, 440.0));

    assert!(session.store().has_item("dawnblossom"));
    assert_eq!(session.count::<Pickup>(), 0);
    let item = &session.store().inventory()[0];
    assert_eq!(item.name, "Dawnblossom");
    assert_eq!(session.sound_cues(SoundCue::Pickup), 1);

    session.run(5);
    assert_eq!(session.store().inventory().len(), 1);
}

#[test]
fn test_session_end_tears_down_world() {
    let config = GameConfig { start_position: Vec2::new(220.0, 160.0), ..default() };
    let mut session = arena_session(arena(Vec2::new(160.0, 160.0)), config);
    session.input.press_attack();
    session.run(1);
    assert!(!session.app.world().resource::<TaskQueue>().is_empty());

    session
        .app
        .world_mut()
        .resource_mut::<NextState<SessionState>>()
        .set(SessionState::Ended);
    session.run(1);

    assert_eq!(session.count::<Player>(), 0);
    assert_eq!(session.count::<Enemy>(), 0);
    assert!(session.app.world().resource::<TaskQueue>().is_empty());
}
