use bevy::prelude::*;

use super::ActiveZone;
use crate::config::GameConfig;
use crate::content::{Content, Zone};
use crate::shared::*;
use crate::store::GameStore;

/// Whether the tile under `point` blocks movement. Points outside the grid
/// do not block; bounds clamping keeps bodies inside.
pub fn is_blocked(zone: &Zone, config: &GameConfig, point: Vec2) -> bool {
    zone.tile_at(point, config.tile_size)
        .is_some_and(|tile| config.is_blocking(tile))
}

/// Resolve a desired velocity against tile collision, one axis at a time so
/// the player can slide along walls. Each axis probes the leading edge of the
/// body at its candidate position.
pub fn resolve_velocity(
    zone: &Zone,
    config: &GameConfig,
    position: Vec2,
    velocity: Vec2,
    dt: f32,
) -> Vec2 {
    let step = velocity * dt;
    let mut resolved = velocity;

    if step.x != 0.0 {
        let probe = Vec2::new(
            position.x + step.x + config.player_radius * step.x.signum(),
            position.y,
        );
        if is_blocked(zone, config, probe) {
            resolved.x = 0.0;
        }
    }
    if step.y != 0.0 {
        let probe = Vec2::new(
            position.x,
            position.y + step.y + config.player_radius * step.y.signum(),
        );
        if is_blocked(zone, config, probe) {
            resolved.y = 0.0;
        }
    }

    resolved
}

/// Clamp a position into a zone's world rectangle.
pub fn clamp_to_bounds(position: Vec2, bounds: Rect) -> Vec2 {
    position.clamp(bounds.min, bounds.max)
}

/// Continuous player movement at `player_speed` px/s from the held keys.
/// Any change of position is written back to the store.
pub fn move_player(
    time: Res<Time>,
    input: Res<PlayerInput>,
    config: Res<GameConfig>,
    content: Res<Content>,
    active: Res<ActiveZone>,
    mut store: ResMut<GameStore>,
    mut query: Query<(&mut LogicalPosition, &mut Velocity), With<Player>>,
) {
    let Ok((mut position, mut velocity)) = query.get_single_mut() else {
        return;
    };
    let Some(zone) = content.zone(&active.zone_id) else {
        return;
    };

    let dt = time.delta_secs();
    let desired = input.move_axis() * config.player_speed;
    velocity.0 = resolve_velocity(zone, &config, position.0, desired, dt);

    let next = clamp_to_bounds(position.0 + velocity.0 * dt, active.bounds);
    if next != position.0 {
        position.0 = next;
        store.set_player_position(next);
    }
}
