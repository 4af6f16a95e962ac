use std::{path::PathBuf, sync::Arc};

use strsim::levenshtein;
use thiserror::Error;

use autovalue_config::{Config, ConfigManager};
use autovalue_core::{RecordStore, SystemClock};
use autovalue_storage_json::JsonRecordStore;

use crate::{
    api::PricingApi,
    cli::{commands, output, registry::CommandRegistry},
    errors::{ApiError, CliError},
};

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    /// Prompted line loop on a terminal.
    Interactive,
    /// One command per stdin line, no prompt.
    Script,
    /// A single command taken from the process arguments.
    Oneshot,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    /// The request ran and came back with an error status; the envelope is already printed.
    #[error("request failed with status {0}")]
    Rejected(u16),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Everything a command needs: the request boundary, the config, and the command table.
pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    pub registry: CommandRegistry,
    pub api: PricingApi,
    pub store: Arc<JsonRecordStore>,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub data_root: PathBuf,
}

impl ShellContext {
    /// Loads config from the data root, then opens the record store it points at.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let data_root = Config::resolve_data_root();
        let config_manager = ConfigManager::with_base_dir(data_root.clone())?;
        let config = config_manager.load()?;

        if !config.ui_color_enabled {
            colored::control::set_override(false);
        }
        crate::init_with_filter(&config.log_filter);

        let store = Arc::new(JsonRecordStore::new(config.resolve_data_dir(&data_root))?);
        let shared: Arc<dyn RecordStore> = store.clone();
        let api = PricingApi::new(shared, Arc::new(SystemClock), &config);
        tracing::debug!(root = %data_root.display(), ?mode, "shell context ready");

        Ok(Self {
            mode,
            running: true,
            registry: commands::registry(),
            api,
            store,
            config,
            config_manager,
            data_root,
        })
    }

    pub fn prompt(&self) -> &'static str {
        "autovalue> "
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn dispatch(&mut self, command: &str, raw: &str, args: &[&str]) -> CommandResult {
        match self.registry.handler(command) {
            Some(handler) => handler(self, args),
            None => {
                self.suggest_command(raw);
                Err(CommandError::UnknownCommand(raw.to_string()))
            }
        }
    }

    /// Closest registered command within three edits, if any.
    pub fn closest_command(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_ascii_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= 3)
            .map(|(_, name)| name)
    }

    pub fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.closest_command(input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
    }

    /// Prints a failed command and keeps the loop alive.
    pub fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested
            | CommandError::Rejected(_)
            | CommandError::UnknownCommand(_) => {}
            other => output::error(other),
        }
    }
}
