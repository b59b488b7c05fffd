//! Dialogue trees and quest definitions.
//!
//! Both are authored in RON (`assets/content/`) and embedded at compile time,
//! so a shipped binary never reads the filesystem for story data.

use serde::Deserialize;

use crate::shared::*;

pub const DIALOGUE_RON: &str = include_str!("../../assets/content/dialogue.ron");
pub const QUESTS_RON: &str = include_str!("../../assets/content/quests.ron");

/// Presentational styling hint for a dialogue line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Urgent,
    Tender,
    Default,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub mood: Option<Mood>,
    /// `Some(vec![])` is legal and behaves like `None` for advancing.
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

impl DialogueLine {
    pub fn has_choices(&self) -> bool {
        self.choices.as_ref().is_some_and(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DialogueTree {
    pub id: String,
    pub lines: Vec<DialogueLine>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestStage {
    pub description: String,
    #[serde(default)]
    pub requirement: Option<Requirement>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub stages: Vec<QuestStage>,
}

pub fn parse_dialogues(source: &str) -> Result<Vec<DialogueTree>, ron::error::SpannedError> {
    ron::from_str(source)
}

pub fn parse_quests(source: &str) -> Result<Vec<Quest>, ron::error::SpannedError> {
    ron::from_str(source)
}
