use bevy::prelude::*;

use super::{despawn_zone, load_zone, ActiveZone, CombatTimers};
use crate::config::GameConfig;
use crate::content::Content;
use crate::shared::*;
use crate::store::GameStore;

const ZONE_ENTRY_SPEAKER: &str = "Narrator";

/// Enter a transition trigger: swap the live zone, move the player to the
/// destination's arrival point and start the re-trigger cooldown.
/// Transitions to unknown zones are ignored.
#[allow(clippy::too_many_arguments)]
pub fn check_transitions(
    mut commands: Commands,
    config: Res<GameConfig>,
    content: Res<Content>,
    mut timers: ResMut<CombatTimers>,
    mut active: ResMut<ActiveZone>,
    mut store: ResMut<GameStore>,
    mut player: Query<(&mut LogicalPosition, &mut Velocity), With<Player>>,
    zone_entities: Query<Entity, With<ZoneEntity>>,
) {
    if !timers.transition.finished() {
        return;
    }
    let Ok((mut position, mut velocity)) = player.get_single_mut() else {
        return;
    };
    let Some(zone) = content.zone(&active.zone_id) else {
        return;
    };
    let Some(transition) = zone
        .transitions
        .iter()
        .find(|t| t.trigger.contains(position.0))
    else {
        return;
    };
    let Some(destination) = content.zone(&transition.to) else {
        debug!("Transitions: '{}' leads to unknown zone '{}'", zone.id, transition.to);
        return;
    };

    timers.start_transition(config.transition_cooldown_ms);
    despawn_zone(&mut commands, &zone_entities);
    load_zone(&mut commands, destination, &config, &mut active);

    position.0 = transition.target;
    velocity.0 = Vec2::ZERO;
    store.set_zone(&destination.id, Some(transition.target));
    store.narrate(ZONE_ENTRY_SPEAKER, format!("You cross into {}.", destination.name));
    info!("Transitions: {} -> {}", zone.id, destination.id);
}
