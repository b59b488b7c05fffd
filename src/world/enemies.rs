use bevy::prelude::*;

use super::movement::clamp_to_bounds;
use super::{ActiveZone, Engagement, SimClock};
use crate::config::GameConfig;
use crate::shared::*;
use crate::store::{GameEvent, GameStore};

/// Velocity for one enemy this frame, and whether it is engaging the player.
///
/// Inside the aggro radius the enemy walks straight at the player. Outside,
/// it follows its patrol: `Circle` traces a slow circle over elapsed time,
/// `Line` walks right while `sin(t / scale)` is non-negative and left
/// otherwise, `None` stands still.
pub fn enemy_velocity(
    config: &GameConfig,
    enemy: Vec2,
    player: Vec2,
    patrol: Patrol,
    elapsed_ms: f32,
) -> (Vec2, bool) {
    let offset = player - enemy;
    if offset.length() < config.aggro_radius {
        return (offset.normalize_or_zero() * config.pursuit_speed, true);
    }

    let velocity = match patrol {
        Patrol::Circle => {
            let t = elapsed_ms / 1000.0;
            Vec2::new(t.cos(), t.sin()) * config.circle_patrol_speed
        }
        Patrol::Line => {
            let phase = (elapsed_ms / config.line_patrol_period_scale_ms).sin();
            let direction = if phase >= 0.0 { 1.0 } else { -1.0 };
            Vec2::new(config.line_patrol_speed * direction, 0.0)
        }
        Patrol::None => Vec2::ZERO,
    };
    (velocity, false)
}

/// Move every enemy and raise `combat-state` when engagement flips.
#[allow(clippy::too_many_arguments)]
pub fn update_enemies(
    time: Res<Time>,
    clock: Res<SimClock>,
    config: Res<GameConfig>,
    active: Res<ActiveZone>,
    mut engagement: ResMut<Engagement>,
    mut store: ResMut<GameStore>,
    player: Query<&LogicalPosition, With<Player>>,
    mut enemies: Query<(&mut LogicalPosition, &mut Velocity, &Enemy), Without<Player>>,
) {
    let Ok(target) = player.get_single() else {
        return;
    };
    let dt = time.delta_secs();
    let elapsed_ms = clock.elapsed.as_secs_f32() * 1000.0;

    let mut engaged = false;
    for (mut position, mut velocity, enemy) in enemies.iter_mut() {
        let (next_velocity, pursuing) =
            enemy_velocity(&config, position.0, target.0, enemy.patrol, elapsed_ms);
        engaged |= pursuing;
        velocity.0 = next_velocity;
        position.0 = clamp_to_bounds(position.0 + next_velocity * dt, active.bounds);
    }

    if engaged != engagement.engaged {
        engagement.engaged = engaged;
        store.emit(GameEvent::CombatState { engaged });
    }
}
