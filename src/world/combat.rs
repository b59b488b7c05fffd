//! Player attacks, enemy hits and contact damage.
//!
//! An attack press locks further attacks, then schedules the hit after the
//! wind-up and the unlock after the lock duration. The hit lands on every
//! enemy in range of where the player stands when it resolves.

use bevy::prelude::*;

use super::tasks::{TaskAction, TaskQueue};
use super::{ActiveZone, AttackState, CombatTimers, SimClock};
use crate::config::GameConfig;
use crate::shared::*;
use crate::store::{GameStore, SoundCue};

const DEFEAT_SPEAKER: &str = "Narrator";
const DEFEAT_LINE: &str = "The grove refuses to let you fall. You awaken beneath the heartwood.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Survived { remaining: i32 },
    Defeated,
}

/// Apply `damage` to one enemy. Health stays within `0..=max_health`.
pub fn apply_hit(enemy: &mut Enemy, damage: i32) -> HitOutcome {
    enemy.health = enemy.health.saturating_sub(damage).clamp(0, enemy.max_health);
    if enemy.health == 0 {
        HitOutcome::Defeated
    } else {
        HitOutcome::Survived { remaining: enemy.health }
    }
}

pub fn handle_attack_input(
    input: Res<PlayerInput>,
    config: Res<GameConfig>,
    clock: Res<SimClock>,
    active: Res<ActiveZone>,
    mut attack: ResMut<AttackState>,
    mut tasks: ResMut<TaskQueue>,
    mut store: ResMut<GameStore>,
) {
    if !input.attack || attack.locked {
        return;
    }
    attack.locked = true;
    let now = clock.now_ms();
    tasks.schedule(
        now,
        config.attack_windup_ms,
        TaskAction::AttackHit { zone_epoch: active.epoch },
    );
    tasks.schedule(now, config.attack_lock_ms, TaskAction::AttackRelease);
    store.cue(SoundCue::Attack);
}

/// Fire every delayed action that has come due.
#[allow(clippy::too_many_arguments)]
pub fn run_due_tasks(
    mut commands: Commands,
    clock: Res<SimClock>,
    config: Res<GameConfig>,
    active: Res<ActiveZone>,
    mut tasks: ResMut<TaskQueue>,
    mut attack: ResMut<AttackState>,
    mut store: ResMut<GameStore>,
    player: Query<&LogicalPosition, With<Player>>,
    mut enemies: Query<(Entity, &LogicalPosition, &mut Enemy), Without<Player>>,
) {
    let now = clock.now_ms();
    while let Some(task) = tasks.pop_due(now) {
        match task.action {
            TaskAction::AttackRelease => attack.locked = false,
            TaskAction::AttackHit { zone_epoch } => {
                if zone_epoch != active.epoch {
                    debug!("Combat: swing from a previous zone dropped");
                    continue;
                }
                let Ok(origin) = player.get_single() else {
                    continue;
                };
                for (entity, position, mut enemy) in enemies.iter_mut() {
                    if enemy.health <= 0 || position.distance(origin.0) >= config.attack_radius {
                        continue;
                    }
                    store.cue(SoundCue::Hit);
                    match apply_hit(&mut enemy, config.attack_damage) {
                        HitOutcome::Survived { remaining } => {
                            debug!("Combat: {} hit, {} health left", enemy.subtype, remaining);
                        }
                        HitOutcome::Defeated => {
                            store.defeat_enemy(&enemy.subtype);
                            store.cue(SoundCue::Defeat);
                            commands.entity(entity).despawn();
                        }
                    }
                }
            }
        }
    }
}

/// Contact damage from any touching enemy, then an invulnerability window.
/// Reaching zero health revives the player at the respawn point.
pub fn check_enemy_contact(
    config: Res<GameConfig>,
    mut timers: ResMut<CombatTimers>,
    mut store: ResMut<GameStore>,
    mut player: Query<&mut LogicalPosition, With<Player>>,
    enemies: Query<&LogicalPosition, (With<Enemy>, Without<Player>)>,
) {
    if !timers.invulnerable.finished() {
        return;
    }
    let Ok(mut position) = player.get_single_mut() else {
        return;
    };
    let touching = enemies
        .iter()
        .any(|enemy| enemy.distance(position.0) < config.contact_distance());
    if !touching {
        return;
    }

    store.damage(config.contact_damage);
    store.cue(SoundCue::Hit);
    timers.start_invulnerable(config.invulnerability_ms);

    if store.health() <= 0 {
        info!("Combat: player defeated, recovering at the heartwood");
        store.revive();
        position.0 = config.respawn_position;
        store.set_player_position(config.respawn_position);
        store.narrate(DEFEAT_SPEAKER, DEFEAT_LINE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_hits_defeat_a_fresh_enemy() {
        let mut enemy = Enemy::new("wraith", 60, Patrol::None);
        assert_eq!(apply_hit(&mut enemy, 35), HitOutcome::Survived { remaining: 25 });
        assert_eq!(enemy.health, 25);
        assert_eq!(apply_hit(&mut enemy, 35), HitOutcome::Defeated);
    }

    #[test]
    fn test_exact_lethal_hit_defeats() {
        let mut enemy = Enemy::new("shade", 35, Patrol::None);
        assert_eq!(apply_hit(&mut enemy, 35), HitOutcome::Defeated);
        assert_eq!(enemy.health, 0);
    }

    #[test]
    fn test_overkill_hit_floors_enemy_health_at_zero() {
        let mut enemy = Enemy::new("wraith", 60, Patrol::None);
        apply_hit(&mut enemy, 35);
        assert_eq!(apply_hit(&mut enemy, 35), HitOutcome::Defeated);
        assert_eq!(enemy.health, 0);
    }

    #[test]
    fn test_negative_damage_never_exceeds_max_health() {
        let mut enemy = Enemy::new("shade", 60, Patrol::None);
        assert_eq!(apply_hit(&mut enemy, -40), HitOutcome::Survived { remaining: 60 });
        assert_eq!(apply_hit(&mut enemy, i32::MIN), HitOutcome::Survived { remaining: 60 });
    }
}
