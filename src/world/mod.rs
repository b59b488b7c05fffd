//! World domain plugin for Eldergrove.
//!
//! Responsible for:
//! - Loading a zone's live entities (NPCs, enemies, items, props)
//! - Player movement with tile collision
//! - Interaction, attacks and enemy combat
//! - Enemy pursuit and patrols
//! - Item pickup and zone transitions
//!
//! The per-frame steps run as one chained set so later steps see what
//! earlier steps wrote in the same frame. The set runs after dialogue
//! choices from the presentation layer are applied.

use bevy::prelude::*;
use std::time::Duration;

use crate::config::GameConfig;
use crate::content::{Content, EntitySpawn, Zone};
use crate::dialogue::{apply_dialogue_choices, DialogueEngine};
use crate::shared::*;
use crate::store::GameStore;

pub mod combat;
pub mod enemies;
pub mod interaction;
pub mod movement;
pub mod pickups;
pub mod tasks;
pub mod transitions;

use tasks::TaskQueue;

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveZone>()
            .init_resource::<CombatTimers>()
            .init_resource::<AttackState>()
            .init_resource::<Engagement>()
            .init_resource::<SimClock>()
            .init_resource::<TaskQueue>()
            .add_systems(OnEnter(SessionState::Playing), start_session)
            .add_systems(OnExit(SessionState::Playing), end_session)
            .add_systems(
                Update,
                (
                    advance_clock,
                    combat::run_due_tasks,
                    tick_timers,
                    movement::move_player,
                    interaction::handle_interact,
                    combat::handle_attack_input,
                    transitions::check_transitions,
                    enemies::update_enemies,
                    combat::check_enemy_contact,
                    pickups::collect_items,
                )
                    .chain()
                    .after(apply_dialogue_choices)
                    .run_if(in_state(SessionState::Playing)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// The zone whose entities are currently live.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveZone {
    pub zone_id: String,
    /// Bumped on every load. Delayed actions compare against it.
    pub epoch: u64,
    pub bounds: Rect,
}

/// One-shot windows that gate re-entering a transition and taking contact
/// damage. A window is open while its timer has not finished.
#[derive(Resource, Debug, Clone)]
pub struct CombatTimers {
    pub transition: Timer,
    pub invulnerable: Timer,
}

impl Default for CombatTimers {
    fn default() -> Self {
        Self {
            transition: expired_timer(),
            invulnerable: expired_timer(),
        }
    }
}

impl CombatTimers {
    pub fn start_transition(&mut self, millis: u64) {
        self.transition = Timer::new(Duration::from_millis(millis), TimerMode::Once);
    }

    pub fn start_invulnerable(&mut self, millis: u64) {
        self.invulnerable = Timer::new(Duration::from_millis(millis), TimerMode::Once);
    }
}

fn expired_timer() -> Timer {
    let mut timer = Timer::new(Duration::ZERO, TimerMode::Once);
    timer.tick(Duration::ZERO);
    timer
}

/// Set while a swing is in progress.
#[derive(Resource, Debug, Clone, Default)]
pub struct AttackState {
    pub locked: bool,
}

/// Whether any enemy was in aggro range last frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct Engagement {
    pub engaged: bool,
}

/// Simulated time since the session started.
#[derive(Resource, Debug, Clone, Default)]
pub struct SimClock {
    pub elapsed: Duration,
}

impl SimClock {
    pub fn now_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ZONE LOADING
// ═══════════════════════════════════════════════════════════════════════

/// Spawn every entity `zone` describes and make it the active zone.
pub fn load_zone(
    commands: &mut Commands,
    zone: &Zone,
    config: &GameConfig,
    active: &mut ActiveZone,
) {
    active.zone_id = zone.id.clone();
    active.epoch += 1;
    active.bounds = zone.world_bounds(config.tile_size);

    for (order, spawn) in zone.entities.iter().enumerate() {
        let base = (
            ZoneEntity,
            SpawnOrder(order),
            LogicalPosition(spawn.position()),
        );
        match spawn {
            EntitySpawn::Npc { id, .. } => {
                commands.spawn((base, Npc { id: id.clone() }));
            }
            EntitySpawn::Enemy { subtype, patrol, .. } => {
                commands.spawn((
                    base,
                    Velocity::default(),
                    Enemy::new(subtype.clone(), config.enemy_max_health, *patrol),
                ));
            }
            EntitySpawn::Item { subtype, id, .. } => {
                let item_id = id.clone().unwrap_or_else(|| subtype.clone());
                commands.spawn((base, Pickup { item_id }));
            }
            EntitySpawn::Prop { kind, .. } => {
                commands.spawn((base, Prop { kind: *kind }));
            }
        }
    }

    info!(
        "WorldPlugin: loaded zone '{}' ({} entities)",
        zone.id,
        zone.entities.len()
    );
}

/// Despawn everything that belongs to the current zone.
pub fn despawn_zone(commands: &mut Commands, zone_entities: &Query<Entity, With<ZoneEntity>>) {
    for entity in zone_entities.iter() {
        commands.entity(entity).despawn();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

fn start_session(
    mut commands: Commands,
    config: Res<GameConfig>,
    content: Res<Content>,
    mut store: ResMut<GameStore>,
    mut active: ResMut<ActiveZone>,
) {
    let zone_id = store.current_zone().to_string();
    let position = store.player_position();

    commands.spawn((Player, LogicalPosition(position), Velocity::default()));

    if let Some(zone) = content.zone(&zone_id) {
        load_zone(&mut commands, zone, &config, &mut active);
    } else {
        warn!("WorldPlugin: start zone '{}' is unknown, nothing spawned", zone_id);
    }

    store.set_zone(&zone_id, Some(position));
    store.announce();
}

#[allow(clippy::too_many_arguments)]
fn end_session(
    mut commands: Commands,
    zone_entities: Query<Entity, With<ZoneEntity>>,
    players: Query<Entity, With<Player>>,
    mut tasks: ResMut<TaskQueue>,
    mut timers: ResMut<CombatTimers>,
    mut attack: ResMut<AttackState>,
    mut engagement: ResMut<Engagement>,
    mut engine: ResMut<DialogueEngine>,
) {
    despawn_zone(&mut commands, &zone_entities);
    for entity in players.iter() {
        commands.entity(entity).despawn();
    }
    tasks.clear();
    *timers = CombatTimers::default();
    attack.locked = false;
    engagement.engaged = false;
    engine.reset();
    info!("WorldPlugin: session torn down");
}

fn advance_clock(time: Res<Time>, mut clock: ResMut<SimClock>) {
    clock.elapsed += time.delta();
}

fn tick_timers(time: Res<Time>, mut timers: ResMut<CombatTimers>) {
    timers.transition.tick(time.delta());
    timers.invulnerable.tick(time.delta());
}
