//! Command dispatch: bridges CLI args -> fleet operations -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod lighting;
pub mod scripts;
pub mod util;
pub mod watch;

use std::path::PathBuf;

use ledfleet_core::Fleet;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Everything a fleet-bound handler needs.
pub struct Context<'a> {
    pub global: &'a GlobalOpts,
    pub fleet: Fleet,
    pub format: OutputFormat,
    pub color: bool,
}

impl<'a> Context<'a> {
    /// Load and validate configuration, then build the fleet.
    pub fn load(global: &'a GlobalOpts) -> Result<Self, CliError> {
        let path = config_file(global);
        let config = ledfleet_config::load_config(global.config.as_deref())
            .map_err(|e| CliError::config(&path, e))?;
        let fleet_config = config
            .to_fleet_config()
            .map_err(|e| CliError::config(&path, e))?;

        let format = global.output.unwrap_or(if config.defaults.output == "json" {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        });

        Ok(Self {
            global,
            fleet: Fleet::new(fleet_config)?,
            format,
            color: output::should_color(global.color),
        })
    }

    /// Informational line on stderr, unless `--quiet`.
    pub fn note(&self, message: &str) {
        if !self.global.quiet {
            eprintln!("{message}");
        }
    }
}

/// The config file in effect: `--config` / `LEDFLEET_CONFIG`, or the default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(ledfleet_config::config_path)
}

/// Dispatch a fleet-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Devices => devices::handle(ctx).await,
        Command::Watch(args) => watch::handle(ctx, args).await,
        Command::Color(args) => lighting::color(ctx, args).await,
        Command::White(args) => lighting::white(ctx, args).await,
        Command::Off(targets) => lighting::off(ctx, targets).await,
        Command::Run(args) => lighting::run(ctx, args).await,
        Command::Scripts(args) => scripts::handle(ctx, args).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
