//! Session setup: the one place the game can fail.
//!
//! `SessionBuilder` gathers the config, the content and the input device,
//! validates them, and installs every plugin plus the shared resources into
//! an `App`. Once installed, nothing in the core returns an error.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use crate::config::GameConfig;
use crate::content::{Content, ContentError, ContentPlugin, ContentTables};
use crate::dialogue::{DialogueEngine, DialoguePlugin};
use crate::input::{InputDevice, InputPlugin, InputSource};
use crate::shared::*;
use crate::store::GameStore;
use crate::world::WorldPlugin;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("no input source was provided for the session")]
    MissingInput,
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("config override failed to parse")]
    Config(#[source] ron::error::SpannedError),
}

#[derive(Default)]
pub struct SessionBuilder {
    config: GameConfig,
    config_override: Option<String>,
    content: Option<ContentTables>,
    input: Option<Box<dyn InputSource>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// A partial RON override applied on top of the defaults.
    pub fn with_config_ron(mut self, source: impl Into<String>) -> Self {
        self.config_override = Some(source.into());
        self
    }

    /// Replace the shipped content (tests, mods).
    pub fn with_content(mut self, tables: ContentTables) -> Self {
        self.content = Some(tables);
        self
    }

    pub fn with_input(mut self, source: impl InputSource) -> Self {
        self.input = Some(Box::new(source));
        self
    }

    /// Install the session into an existing app. The app must already have
    /// the time and schedule runner plugins (e.g. `MinimalPlugins`).
    pub fn install(self, app: &mut App) -> Result<(), SetupError> {
        let input = self.input.ok_or(SetupError::MissingInput)?;
        let config = match self.config_override {
            Some(source) => GameConfig::from_ron(&source).map_err(SetupError::Config)?,
            None => self.config,
        };
        let tables = match self.content {
            Some(tables) => tables,
            None => ContentTables::load()?,
        };
        let content = Content::new(tables);

        if !app.is_plugin_added::<StatesPlugin>() {
            app.add_plugins(StatesPlugin);
        }

        app.insert_resource(GameStore::new(content.clone(), &config))
            .insert_resource(DialogueEngine::new(content.clone()))
            .insert_resource(content)
            .insert_resource(config)
            .insert_resource(InputDevice(input))
            .init_state::<SessionState>()
            .add_plugins((ContentPlugin, InputPlugin, DialoguePlugin, WorldPlugin));

        info!("Session: installed");
        Ok(())
    }

    /// A headless app running the session on `MinimalPlugins`.
    pub fn build(self) -> Result<App, SetupError> {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        self.install(&mut app)?;
        Ok(app)
    }
}
