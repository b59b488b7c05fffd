//! Headless demo: plays a short scripted session and logs every event as
//! the JSON a presentation layer would receive.
//!
//! Usage: `eldergrove [config-override.ron]`

use bevy::core::FrameCount;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use eldergrove::content::Content;
use eldergrove::dialogue::DialogueEngine;
use eldergrove::input::ScriptedInput;
use eldergrove::session::SessionBuilder;
use eldergrove::shared::*;
use eldergrove::store::{GameEventKind, GameStore};

const FRAME: Duration = Duration::from_millis(16);
const DEMO_FRAMES: u32 = 300;

fn main() -> AppExit {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    let mut builder = SessionBuilder::new().with_input(demo_script());
    if let Some(path) = std::env::args().nth(1) {
        match std::fs::read_to_string(&path) {
            Ok(source) => builder = builder.with_config_ron(source),
            Err(err) => {
                error!("Cannot read config override {}: {}", path, err);
                return AppExit::error();
            }
        }
    }
    if let Err(err) = builder.install(&mut app) {
        error!("Session setup failed: {}", err);
        return AppExit::error();
    }

    let mut store = app.world_mut().resource_mut::<GameStore>();
    for kind in GameEventKind::ALL {
        store.subscribe(kind, |event| match event.to_json() {
            Ok(json) => info!("event {}", json),
            Err(err) => warn!("event could not be serialised: {}", err),
        });
    }

    app.add_systems(PostUpdate, (pick_first_choice, stop_after_demo))
        .run()
}

/// Walk to the ranger, hear her out, pick a dawnblossom, swing once.
fn demo_script() -> ScriptedInput {
    let idle = PlayerInput::default();
    let interact = PlayerInput { interact: true, ..default() };
    ScriptedInput::new()
        .then(58, PlayerInput { left: true, up: true, ..default() })
        .then(1, interact)
        .then(10, idle)
        .then(1, interact)
        .then(10, idle)
        .then(1, interact)
        .then(10, idle)
        .then(1, interact)
        .then(10, idle)
        .then(1, interact)
        .then(10, idle)
        .then(40, PlayerInput { left: true, up: true, ..default() })
        .then(30, PlayerInput { left: true, ..default() })
        .then(1, PlayerInput { attack: true, ..default() })
        .then(60, idle)
}

/// Stand-in for a player clicking the first offered choice.
fn pick_first_choice(
    engine: Res<DialogueEngine>,
    content: Res<Content>,
    mut selected: EventWriter<DialogueChoiceSelected>,
) {
    let Some(session) = engine.session() else {
        return;
    };
    let Some(line) = content
        .dialogue(&session.tree_id)
        .and_then(|tree| tree.lines.get(session.line_index))
    else {
        return;
    };
    if let Some(choice) = line.choices.as_ref().and_then(|choices| choices.first()) {
        selected.send(DialogueChoiceSelected { choice: choice.clone() });
    }
}

fn stop_after_demo(frames: Res<FrameCount>, mut exit: EventWriter<AppExit>) {
    if frames.0 >= DEMO_FRAMES {
        exit.send(AppExit::Success);
    }
}
