//! Tunable gameplay parameters.
//!
//! Every "fixed" number the controller uses (speeds, radii, delays, damage)
//! lives in `GameConfig`. Defaults reproduce the shipped balance; a partial
//! RON override can replace any subset of fields at session setup.

use bevy::prelude::*;
use serde::Deserialize;

use crate::shared::TileKind;

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tile_size: f32,

    // ── Player ──────────────────────────────────────────────────────────
    pub player_speed: f32,
    pub player_max_health: i32,
    /// Half-extent of the player's body used for contact and pickup tests.
    pub player_radius: f32,
    pub start_zone: String,
    pub start_position: Vec2,
    /// Where defeat-recovery teleports the player (same zone).
    pub respawn_position: Vec2,

    // ── Interaction ─────────────────────────────────────────────────────
    pub npc_interact_radius: f32,
    pub prop_interact_radius: f32,
    pub shrine_heal: i32,

    // ── Player attack ───────────────────────────────────────────────────
    pub attack_windup_ms: u64,
    pub attack_lock_ms: u64,
    pub attack_radius: f32,
    pub attack_damage: i32,

    // ── Enemies ─────────────────────────────────────────────────────────
    pub enemy_max_health: i32,
    pub enemy_radius: f32,
    pub aggro_radius: f32,
    pub pursuit_speed: f32,
    pub circle_patrol_speed: f32,
    pub line_patrol_speed: f32,
    /// Line patrols flip direction every `PI * line_patrol_period_scale_ms`.
    pub line_patrol_period_scale_ms: f32,
    pub contact_damage: i32,
    pub invulnerability_ms: u64,

    // ── World ───────────────────────────────────────────────────────────
    pub item_radius: f32,
    pub transition_cooldown_ms: u64,
    pub blocked_tiles: Vec<TileKind>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: 32.0,

            player_speed: 140.0,
            player_max_health: 100,
            player_radius: 12.0,
            start_zone: "forest".to_string(),
            start_position: Vec2::new(18.0 * 32.0, 18.0 * 32.0),
            respawn_position: Vec2::new(18.0 * 32.0, 18.0 * 32.0),

            npc_interact_radius: 64.0,
            prop_interact_radius: 48.0,
            shrine_heal: 20,

            attack_windup_ms: 180,
            attack_lock_ms: 320,
            attack_radius: 64.0,
            attack_damage: 35,

            enemy_max_health: 60,
            enemy_radius: 14.0,
            aggro_radius: 160.0,
            pursuit_speed: 40.0,
            circle_patrol_speed: 20.0,
            line_patrol_speed: 30.0,
            line_patrol_period_scale_ms: 600.0,
            contact_damage: 12,
            invulnerability_ms: 800,

            item_radius: 16.0,
            transition_cooldown_ms: 500,
            blocked_tiles: vec![TileKind::Water],
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) override. Missing fields keep their defaults.
    pub fn from_ron(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }

    pub fn is_blocking(&self, tile: TileKind) -> bool {
        self.blocked_tiles.contains(&tile)
    }

    /// Distance at which an enemy body touches the player body.
    pub fn contact_distance(&self) -> f32 {
        self.player_radius + self.enemy_radius
    }

    /// Distance at which the player body overlaps an item.
    pub fn pickup_distance(&self) -> f32 {
        self.player_radius + self.item_radius
    }
}
