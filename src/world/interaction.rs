//! The "interact" press: advance dialogue, talk to NPCs, use props.

use bevy::prelude::*;

use super::AttackState;
use crate::config::GameConfig;
use crate::content::Content;
use crate::dialogue::DialogueEngine;
use crate::shared::*;
use crate::store::GameStore;

const SHRINE_SPEAKER: &str = "Shrine";
const SHRINE_LINE: &str = "The rune warms beneath your palm. A hush sweeps the grove.";

/// The candidate strictly closer than `radius` to `origin`. Exact distance
/// ties go to the lower spawn order.
pub fn nearest_within<T>(
    origin: Vec2,
    radius: f32,
    candidates: impl IntoIterator<Item = (Vec2, SpawnOrder, T)>,
) -> Option<T> {
    candidates
        .into_iter()
        .map(|(position, order, value)| (position.distance(origin), order, value))
        .filter(|(distance, _, _)| *distance < radius)
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, _, value)| value)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_interact(
    input: Res<PlayerInput>,
    attack: Res<AttackState>,
    config: Res<GameConfig>,
    content: Res<Content>,
    mut engine: ResMut<DialogueEngine>,
    mut store: ResMut<GameStore>,
    player: Query<&LogicalPosition, With<Player>>,
    npcs: Query<(&LogicalPosition, &SpawnOrder, &Npc)>,
    props: Query<(&LogicalPosition, &SpawnOrder, &Prop)>,
) {
    if !input.interact || attack.locked {
        return;
    }
    if engine.is_active() {
        engine.progress(&mut store);
        return;
    }
    let Ok(origin) = player.get_single() else {
        return;
    };

    let npc = nearest_within(
        origin.0,
        config.npc_interact_radius,
        npcs.iter().map(|(pos, order, npc)| (pos.0, *order, npc)),
    );
    if let Some(npc) = npc {
        engine.start(&mut store, &format!("{}:intro", npc.id));
        if let Some(reward) = content.npc_rewards.get(&npc.id) {
            store.add_item(reward.clone());
        }
        return;
    }

    let prop = nearest_within(
        origin.0,
        config.prop_interact_radius,
        props.iter().map(|(pos, order, prop)| (pos.0, *order, *prop)),
    );
    match prop.map(|p| p.kind) {
        Some(PropKind::Shrine) => {
            store.heal(config.shrine_heal);
            store.narrate(SHRINE_SPEAKER, SHRINE_LINE);
        }
        Some(PropKind::Tree) | None => {}
    }
}
