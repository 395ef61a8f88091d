//! Script command handlers.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use ledfleet_core::{DeviceHandle, Script};

use crate::cli::{ScriptsArgs, ScriptsCommand};
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ScriptRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Script> for ScriptRow {
    fn from(s: &Script) -> Self {
        Self {
            file: s.filename.clone(),
            name: s.label().to_owned(),
        }
    }
}

#[derive(Serialize)]
struct FailureEntry {
    script: String,
    device: String,
    error: String,
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Script")]
    script: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl From<&FailureEntry> for FailureRow {
    fn from(f: &FailureEntry) -> Self {
        Self {
            script: f.script.clone(),
            device: f.device.clone(),
            error: f.error.clone(),
        }
    }
}

#[derive(Serialize)]
struct CopySummary {
    attempted: usize,
    succeeded: usize,
    failures: Vec<FailureEntry>,
}

#[derive(Serialize)]
struct DeleteSummary {
    deleted: Vec<String>,
    failures: Vec<FailureEntry>,
    remaining: Option<Vec<Script>>,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context<'_>, args: ScriptsArgs) -> Result<(), CliError> {
    match args.command {
        ScriptsCommand::List { device } => {
            let device = ctx.fleet.find(&device)?;
            let scripts = device.scripts(true).await?;
            print_scripts(ctx, &scripts)
        }

        ScriptsCommand::Shared(targets) => {
            util::select_targets(ctx, &targets).await?;
            let shared = ctx.fleet.selection().shared_scripts().await;
            print_scripts(ctx, &shared)
        }

        ScriptsCommand::Show { device, name } => {
            let device = ctx.fleet.find(&device)?;
            let body = device.get_script(&name).await?;
            let out = output::render_json(&body)?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        ScriptsCommand::Save {
            device,
            name,
            from_file,
        } => {
            let body = util::read_json_file(&from_file)?;
            let device = ctx.fleet.find(&device)?;
            device.save_script(&name, &body).await?;
            ctx.note(&format!("Saved {name} on {}", device.name()));
            Ok(())
        }

        ScriptsCommand::Copy { from, to, names } => {
            let source = ctx.fleet.find(&from)?;
            let targets = to
                .iter()
                .map(|t| ctx.fleet.find(t).map(Arc::clone))
                .collect::<Result<Vec<_>, _>>()?;
            copy(ctx, source, &targets, &names).await
        }

        ScriptsCommand::Delete { device, names } => {
            let device = ctx.fleet.find(&device)?;
            let prompt = format!("Delete {} script(s) from {}?", names.len(), device.name());
            if !util::confirm(&prompt, ctx.global.yes)? {
                return Ok(());
            }
            delete(ctx, device, &names).await
        }
    }
}

fn print_scripts(ctx: &Context<'_>, scripts: &[Script]) -> Result<(), CliError> {
    let out = output::render_list(ctx.format, scripts, |s| ScriptRow::from(s))?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

async fn copy(
    ctx: &Context<'_>,
    source: &DeviceHandle,
    targets: &[Arc<DeviceHandle>],
    names: &[String],
) -> Result<(), CliError> {
    let outcome = ctx.fleet.copy_scripts(source, names, targets).await;
    let summary = CopySummary {
        attempted: outcome.attempted,
        succeeded: outcome.succeeded,
        failures: outcome
            .failures
            .iter()
            .map(|f| FailureEntry {
                script: f.script.clone(),
                device: f.target_name.clone(),
                error: f.error.to_string(),
            })
            .collect(),
    };

    let out = output::render_single(ctx.format, &summary, |s| {
        let mut text = format!(
            "Copied {} of {} script transfer(s) from {}",
            s.succeeded,
            s.attempted,
            source.name()
        );
        if !s.failures.is_empty() {
            let rows: Vec<FailureRow> = s.failures.iter().map(FailureRow::from).collect();
            text.push('\n');
            text.push_str(&tabled::Table::new(rows).to_string());
        }
        text
    })?;
    output::print_output(&out, ctx.global.quiet);

    if outcome.attempted > 0 && outcome.succeeded == 0 {
        return Err(CliError::AllFailed {
            operation: "copy".into(),
            attempted: outcome.attempted,
        });
    }
    Ok(())
}

async fn delete(ctx: &Context<'_>, device: &DeviceHandle, names: &[String]) -> Result<(), CliError> {
    let outcome = ctx.fleet.delete_scripts(device, names).await;
    let summary = DeleteSummary {
        deleted: outcome.deleted.clone(),
        failures: outcome
            .failures
            .iter()
            .map(|(script, error)| FailureEntry {
                script: script.clone(),
                device: device.name().to_owned(),
                error: error.to_string(),
            })
            .collect(),
        remaining: outcome.config.as_ref().map(|c| c.scripts.clone()),
    };

    let out = output::render_single(ctx.format, &summary, |s| {
        let mut text = format!("Deleted {} of {} script(s)", s.deleted.len(), names.len());
        for failure in &s.failures {
            text.push_str(&format!("\n  {}: {}", failure.script, failure.error));
        }
        if let Some(ref remaining) = s.remaining {
            let rows: Vec<ScriptRow> = remaining.iter().map(ScriptRow::from).collect();
            text.push_str("\nRemaining scripts:\n");
            text.push_str(&tabled::Table::new(rows).to_string());
        }
        text
    })?;
    output::print_output(&out, ctx.global.quiet);

    if outcome.deleted.is_empty() {
        return Err(CliError::AllFailed {
            operation: "delete".into(),
            attempted: names.len(),
        });
    }
    Ok(())
}
