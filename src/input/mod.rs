use bevy::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .add_systems(PreUpdate, read_input);
    }
}

/// Anything that can report the player's actions once per frame.
///
/// Held movement keys are levels; `interact` and `attack` are edges and must
/// be reported for exactly one poll per physical press.
pub trait InputSource: Send + Sync + 'static {
    fn poll(&mut self) -> PlayerInput;
}

/// The session's input capability. A session cannot be set up without one.
#[derive(Resource)]
pub struct InputDevice(pub Box<dyn InputSource>);

impl InputDevice {
    pub fn new(source: impl InputSource) -> Self {
        Self(Box::new(source))
    }
}

/// The single point where the input device becomes game actions.
pub fn read_input(mut device: ResMut<InputDevice>, mut input: ResMut<PlayerInput>) {
    *input = device.0.poll();
}

// ─────────────────────────────────────────────────────────────────────────────
// SharedInput: driven from outside the app (presentation bridge, tests)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SharedState {
    held: PlayerInput,
    interact: bool,
    attack: bool,
}

/// A cloneable handle: one clone goes into the app as its `InputDevice`,
/// the others hold keys and queue presses.
#[derive(Debug, Clone, Default)]
pub struct SharedInput(Arc<Mutex<SharedState>>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl SharedInput {
    fn state(&self) -> MutexGuard<'_, SharedState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn hold(&self, direction: Direction) {
        set_direction(&mut self.state().held, direction, true);
    }

    pub fn release(&self, direction: Direction) {
        set_direction(&mut self.state().held, direction, false);
    }

    pub fn release_all(&self) {
        self.state().held = PlayerInput::default();
    }

    pub fn press_interact(&self) {
        self.state().interact = true;
    }

    pub fn press_attack(&self) {
        self.state().attack = true;
    }
}

fn set_direction(input: &mut PlayerInput, direction: Direction, value: bool) {
    match direction {
        Direction::Left => input.left = value,
        Direction::Right => input.right = value,
        Direction::Up => input.up = value,
        Direction::Down => input.down = value,
    }
}

impl InputSource for SharedInput {
    fn poll(&mut self) -> PlayerInput {
        let mut state = self.state();
        let input = PlayerInput {
            interact: state.interact,
            attack: state.attack,
            ..state.held
        };
        state.interact = false;
        state.attack = false;
        input
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ScriptedInput: a fixed frame-by-frame script (headless demo)
// ─────────────────────────────────────────────────────────────────────────────

/// Plays back `(frames, input)` steps in order, then reports nothing.
/// Presses in a step fire on its first frame only.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    steps: Vec<(u32, PlayerInput)>,
    step: usize,
    frame: u32,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, frames: u32, input: PlayerInput) -> Self {
        if frames > 0 {
            self.steps.push((frames, input));
        }
        self
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.steps.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> PlayerInput {
        let Some(&(frames, input)) = self.steps.get(self.step) else {
            return PlayerInput::default();
        };
        let first_frame = self.frame == 0;
        self.frame += 1;
        if self.frame >= frames {
            self.step += 1;
            self.frame = 0;
        }
        if first_frame {
            input
        } else {
            PlayerInput { interact: false, attack: false, ..input }
        }
    }
}
