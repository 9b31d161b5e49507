//! Shared runtime state for CLI interactions and command execution.

use checkout_config::{Config, ConfigManager};
use checkout_core::{CheckoutSession, ConversionError};
use dialoguer::theme::ColorfulTheme;
use tracing::info;
use uuid::Uuid;

use crate::errors::CliError;
use crate::session::build_session;

use super::{commands, output, registry::CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub session: CheckoutSession,
    pub session_id: Uuid,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub last_command: Option<String>,
    pub running: bool,
    /// Set when a config change affects how sessions are built.
    pub session_stale: bool,
}

impl ShellContext {
    /// Loads configuration from the resolved base directory and starts a
    /// fresh checkout.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::from_env()?;
        Self::with_config_manager(mode, config_manager)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        output::apply_config(&config);
        let session = build_session(&config)?;

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let session_id = Uuid::new_v4();
        info!(session = %session_id, ?mode, "checkout shell started");

        Ok(Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            session,
            session_id,
            config_manager,
            config,
            last_command: None,
            running: true,
            session_stale: false,
        })
    }

    /// Starts a new checkout, rebuilding the session when the config changed.
    pub fn restart_session(&mut self) -> Result<(), ConversionError> {
        if self.session_stale {
            self.session = build_session(&self.config)?;
            self.session_stale = false;
            info!(session = %self.session_id, "checkout rebuilt from updated config");
        } else {
            self.session.restart();
        }
        Ok(())
    }

    pub fn prompt(&self) -> String {
        let screen = self.session.screen();
        format!("nova[{}:{}]> ", self.session.tab(), screen.name())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }
}
