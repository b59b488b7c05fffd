use bevy::prelude::*;

use crate::config::GameConfig;
use crate::content::Content;
use crate::shared::*;
use crate::store::{GameStore, SoundCue};

/// Collect every item the player's body overlaps. Unknown ids still pick up,
/// described by the catalog's generic fallback.
pub fn collect_items(
    mut commands: Commands,
    config: Res<GameConfig>,
    content: Res<Content>,
    mut store: ResMut<GameStore>,
    player: Query<&LogicalPosition, With<Player>>,
    items: Query<(Entity, &LogicalPosition, &Pickup), Without<Player>>,
) {
    let Ok(origin) = player.get_single() else {
        return;
    };
    for (entity, position, pickup) in items.iter() {
        if position.distance(origin.0) >= config.pickup_distance() {
            continue;
        }
        store.add_item(content.items.describe(&pickup.item_id));
        store.cue(SoundCue::Pickup);
        commands.entity(entity).despawn();
    }
}
