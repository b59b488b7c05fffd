//! Zone data definitions for all explorable areas.
//!
//! Each zone is a rectangular grid of `TileKind` values plus the entity
//! spawns, transitions and parallax colours the presentation layer draws
//! behind it. Positions are in world pixels with 32px tiles.

use bevy::prelude::*;

use crate::shared::*;

const TILE: f32 = 32.0;

/// World pixel position of a tile's top-left corner.
fn at(col: f32, row: f32) -> Vec2 {
    Vec2::new(col * TILE, row * TILE)
}

/// Trigger rectangle covering whole tiles.
fn tiles_rect(col: f32, row: f32, cols: f32, rows: f32) -> Rect {
    Rect::from_corners(at(col, row), at(col + cols, row + rows))
}

/// Complete definition of a zone.
#[derive(Debug, Clone)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Row-major tile data: tiles[row * width + col]
    tiles: Vec<TileKind>,
    pub entities: Vec<EntitySpawn>,
    pub transitions: Vec<ZoneTransition>,
    /// Back-to-front background colours (hex strings).
    pub parallax_colors: Vec<String>,
}

impl Zone {
    /// A zone of `width × height` tiles, all `fill`.
    pub fn new(id: &str, name: &str, width: usize, height: usize, fill: TileKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            width,
            height,
            tiles: vec![fill; width * height],
            entities: Vec::new(),
            transitions: Vec::new(),
            parallax_colors: Vec::new(),
        }
    }

    pub fn tile(&self, col: i32, row: i32) -> Option<TileKind> {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            None
        } else {
            Some(self.tiles[row as usize * self.width + col as usize])
        }
    }

    /// Tile under a world position, `None` outside the grid.
    pub fn tile_at(&self, position: Vec2, tile_size: f32) -> Option<TileKind> {
        let col = (position.x / tile_size).floor() as i32;
        let row = (position.y / tile_size).floor() as i32;
        self.tile(col, row)
    }

    pub fn fill_rect(&mut self, col: usize, row: usize, cols: usize, rows: usize, kind: TileKind) {
        for y in row..(row + rows).min(self.height) {
            for x in col..(col + cols).min(self.width) {
                self.tiles[y * self.width + x] = kind;
            }
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileKind]> {
        self.tiles.chunks(self.width.max(1))
    }

    pub fn world_bounds(&self, tile_size: f32) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.width as f32 * tile_size,
            self.height as f32 * tile_size,
        )
    }
}

/// How the controller instantiates a live entity when the zone loads.
#[derive(Debug, Clone, PartialEq)]
pub enum EntitySpawn {
    Npc { position: Vec2, subtype: String, id: String },
    Enemy { position: Vec2, subtype: String, patrol: Patrol },
    /// `id` falls back to `subtype` when absent.
    Item { position: Vec2, subtype: String, id: Option<String> },
    Prop { position: Vec2, kind: PropKind },
}

impl EntitySpawn {
    pub fn position(&self) -> Vec2 {
        match self {
            EntitySpawn::Npc { position, .. }
            | EntitySpawn::Enemy { position, .. }
            | EntitySpawn::Item { position, .. }
            | EntitySpawn::Prop { position, .. } => *position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneTransition {
    pub trigger: Rect,
    pub to: String,
    pub target: Vec2,
}

// ═══════════════════════════════════════════════════════════════════════
// ZONE GENERATORS
// ═══════════════════════════════════════════════════════════════════════

pub fn all_zones() -> Vec<Zone> {
    vec![generate_forest(), generate_village(), generate_cavern()]
}

fn npc(col: f32, row: f32, id: &str) -> EntitySpawn {
    EntitySpawn::Npc { position: at(col, row), subtype: "villager".into(), id: id.into() }
}

fn enemy(col: f32, row: f32, subtype: &str, patrol: Patrol) -> EntitySpawn {
    EntitySpawn::Enemy { position: at(col, row), subtype: subtype.into(), patrol }
}

fn item(col: f32, row: f32, subtype: &str, id: &str) -> EntitySpawn {
    EntitySpawn::Item { position: at(col, row), subtype: subtype.into(), id: Some(id.into()) }
}

fn prop(col: f32, row: f32, kind: PropKind) -> EntitySpawn {
    EntitySpawn::Prop { position: at(col, row), kind }
}

// ---------------------------------------------------------------------------
// Whispering Forest: 30x24, the starting zone.
// Heartwood clearing in the middle, pond top-left, exits east and south.
// ---------------------------------------------------------------------------
fn generate_forest() -> Zone {
    let mut zone = Zone::new("forest", "the Whispering Forest", 30, 24, TileKind::Grass);

    // Pond (top-left) with a flower rim
    zone.fill_rect(3, 3, 8, 6, TileKind::Flowers);
    zone.fill_rect(4, 4, 6, 4, TileKind::Water);
    // East trail towards the village
    zone.fill_rect(16, 11, 14, 2, TileKind::Path);
    // South trail towards the cavern
    zone.fill_rect(13, 12, 2, 12, TileKind::Path);
    // Heartwood clearing around the respawn point
    zone.fill_rect(16, 16, 5, 5, TileKind::Flowers);
    // Stream along the bottom-right
    zone.fill_rect(22, 19, 8, 2, TileKind::Water);

    zone.entities = vec![
        npc(15.0, 15.0, "ranger-sylla"),
        enemy(24.0, 6.0, "wraith", Patrol::Circle),
        enemy(6.0, 17.0, "wraith", Patrol::Line),
        item(11.0, 13.0, "herb", "dawnblossom"),
        prop(20.0, 20.0, PropKind::Shrine),
        prop(2.0, 12.0, PropKind::Tree),
        prop(26.0, 3.0, PropKind::Tree),
        prop(9.0, 21.0, PropKind::Tree),
    ];

    zone.transitions = vec![
        ZoneTransition {
            trigger: tiles_rect(29.0, 10.0, 1.0, 4.0),
            to: "village".into(),
            target: at(2.0, 11.5),
        },
        ZoneTransition {
            trigger: tiles_rect(12.0, 23.0, 4.0, 1.0),
            to: "cavern".into(),
            target: at(13.5, 2.0),
        },
    ];

    zone.parallax_colors = vec!["#0b1f14".into(), "#17402a".into(), "#2d6a3e".into()];
    zone
}

// ---------------------------------------------------------------------------
// Brightwater Village: 24x20. Stone plaza with a well, forest exit west.
// ---------------------------------------------------------------------------
fn generate_village() -> Zone {
    let mut zone = Zone::new("village", "Brightwater Village", 24, 20, TileKind::Grass);

    // Road in from the forest
    zone.fill_rect(0, 10, 12, 2, TileKind::Path);
    // Plaza
    zone.fill_rect(8, 5, 10, 10, TileKind::Stone);
    // Well in the middle of the plaza
    zone.fill_rect(12, 9, 2, 2, TileKind::Water);
    // Gardens
    zone.fill_rect(19, 3, 4, 3, TileKind::Flowers);
    zone.fill_rect(2, 15, 5, 3, TileKind::Flowers);

    zone.entities = vec![
        npc(12.0, 7.0, "elder-maelis"),
        npc(17.0, 13.0, "blacksmith-tarin"),
        prop(4.0, 4.0, PropKind::Tree),
        prop(20.0, 16.0, PropKind::Tree),
    ];

    zone.transitions = vec![ZoneTransition {
        trigger: tiles_rect(0.0, 9.0, 1.0, 4.0),
        to: "forest".into(),
        target: at(27.0, 11.5),
    }];

    zone.parallax_colors = vec!["#1c1a2b".into(), "#3b3552".into(), "#6b5f80".into()];
    zone
}

// ---------------------------------------------------------------------------
// Gloomhollow Cavern: 26x20. Underground pools, shades guard the heart.
// ---------------------------------------------------------------------------
fn generate_cavern() -> Zone {
    let mut zone = Zone::new("cavern", "Gloomhollow Cavern", 26, 20, TileKind::CaveFloor);

    // Rock walls around the edge (walkable rubble)
    zone.fill_rect(0, 0, 26, 1, TileKind::Stone);
    zone.fill_rect(0, 19, 26, 1, TileKind::Stone);
    // Underground pools
    zone.fill_rect(4, 6, 5, 4, TileKind::Water);
    zone.fill_rect(17, 10, 6, 3, TileKind::Water);
    zone.fill_rect(9, 14, 3, 3, TileKind::Water);

    zone.entities = vec![
        enemy(8.0, 12.0, "shade", Patrol::None),
        enemy(20.0, 6.0, "shade", Patrol::Line),
        enemy(14.0, 16.0, "wraith", Patrol::Circle),
        item(21.0, 15.0, "gem", "cavern-heart"),
        item(3.0, 14.0, "rune", "ancient-rune"),
        prop(13.0, 8.0, PropKind::Shrine),
    ];

    zone.transitions = vec![ZoneTransition {
        trigger: tiles_rect(12.0, 0.0, 3.0, 1.0),
        to: "forest".into(),
        target: at(13.5, 21.0),
    }];

    zone.parallax_colors = vec!["#05060d".into(), "#121a2e".into(), "#223150".into()];
    zone
}
