//! Config command handlers.
//!
//! `path` and `effective` work without a valid device list; `show` talks
//! to a device and needs the fleet.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Context, config_file};

pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config_file(global).display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Effective => {
            let path = config_file(global);
            let config = ledfleet_config::load_config(global.config.as_deref())
                .map_err(|e| CliError::config(&path, e))?;
            let rendered = config.to_toml().map_err(|e| CliError::config(&path, e))?;
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show { device } => {
            let ctx = Context::load(global)?;
            let device = ctx.fleet.find(&device)?;
            let config = device.get_config(true).await?;
            let out = output::render_json(config.as_ref())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
