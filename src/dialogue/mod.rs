//! Dialogue engine: walks one dialogue tree at a time.
//!
//! Inactive until `start` names a known tree. While active, each line is
//! presented as a `dialogue` event followed by a `dialogue-choices` event
//! (empty when the line offers none). A line with choices only moves on
//! through `choose`; otherwise `progress` steps to the next line and closes
//! the conversation after the last one.

use bevy::prelude::*;

use crate::content::{Content, DialogueLine};
use crate::shared::*;
use crate::store::{GameEvent, GameStore};

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DialogueChoiceSelected>().add_systems(
            Update,
            apply_dialogue_choices.run_if(in_state(SessionState::Playing)),
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueSession {
    pub tree_id: String,
    pub line_index: usize,
}

#[derive(Resource, Debug)]
pub struct DialogueEngine {
    content: Content,
    session: Option<DialogueSession>,
}

impl DialogueEngine {
    pub fn new(content: Content) -> Self {
        Self { content, session: None }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DialogueSession> {
        self.session.as_ref()
    }

    /// Enter `tree_id` at its first line. Unknown trees leave the engine as it was.
    pub fn start(&mut self, store: &mut GameStore, tree_id: &str) -> bool {
        if self.content.dialogue(tree_id).is_none() {
            debug!("Dialogue: no tree '{}'", tree_id);
            return false;
        }
        self.session = Some(DialogueSession {
            tree_id: tree_id.to_string(),
            line_index: 0,
        });
        self.present_line(store);
        true
    }

    /// The player's "advance" input.
    pub fn progress(&mut self, store: &mut GameStore) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(tree) = self.content.dialogue(&session.tree_id) else {
            return;
        };
        if let Some(line) = tree.lines.get(session.line_index) {
            if line.has_choices() {
                let choices = line.choices.clone().unwrap_or_default();
                store.emit(GameEvent::DialogueChoices { choices });
                return;
            }
        }
        session.line_index += 1;
        if session.line_index >= tree.lines.len() {
            self.end(store);
        } else {
            self.present_line(store);
        }
    }

    pub fn choose(&mut self, store: &mut GameStore, choice: &Choice) {
        if let Some(quest) = choice.quest_effect() {
            if self.content.quest(quest).is_some() {
                store.start_quest(quest);
            } else {
                debug!("Dialogue: choice starts unknown quest '{}'", quest);
            }
        }
        match &choice.next {
            Some(next) => {
                // An unknown next tree leaves the current session untouched.
                self.start(store, next);
            }
            None => self.end(store),
        }
    }

    fn current_line(&self) -> Option<&DialogueLine> {
        let session = self.session.as_ref()?;
        self.content
            .dialogue(&session.tree_id)?
            .lines
            .get(session.line_index)
    }

    fn present_line(&mut self, store: &mut GameStore) {
        let Some(line) = self.current_line().cloned() else {
            self.end(store);
            return;
        };
        store.say(&line.speaker, &line.text, line.mood);
        store.emit(GameEvent::DialogueChoices {
            choices: line.choices.unwrap_or_default(),
        });
    }

    fn end(&mut self, store: &mut GameStore) {
        self.session = None;
        store.say("", "", None);
        store.emit(GameEvent::DialogueChoices { choices: Vec::new() });
    }

    /// Drop the session without emitting (session teardown).
    pub fn reset(&mut self) {
        self.session = None;
    }
}

/// Route choices picked in the presentation layer into the engine.
pub fn apply_dialogue_choices(
    mut choices: EventReader<DialogueChoiceSelected>,
    mut engine: ResMut<DialogueEngine>,
    mut store: ResMut<GameStore>,
) {
    for selected in choices.read() {
        engine.choose(&mut store, &selected.choice);
    }
}
