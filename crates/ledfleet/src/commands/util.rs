//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use ledfleet_core::{BatchOutcome, DeviceHandle, DeviceId, SelectionMode};

use crate::cli::TargetArgs;
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

/// Probe the fleet and select the command targets.
///
/// Named devices are selected if they answered the probe; with no names,
/// every online device is selected. Errors when nothing ends up selected.
pub async fn select_targets(
    ctx: &Context<'_>,
    targets: &TargetArgs,
) -> Result<Vec<Arc<DeviceHandle>>, CliError> {
    ctx.fleet.probe_all().await;
    let selection = ctx.fleet.selection();
    selection.set_mode(SelectionMode::Multiple);

    if targets.devices.is_empty() {
        selection.select_all(|d| d.is_online());
    } else {
        for identifier in &targets.devices {
            let device = ctx.fleet.find(identifier)?;
            if !selection.select(device) && !device.is_selected() {
                warn!(device = %device.name(), "device is offline; skipping");
                ctx.note(&format!("{} is offline; skipping", device.name()));
            }
        }
    }

    let selected = selection.get_selected();
    if selected.is_empty() {
        return Err(CliError::NoTargets);
    }
    Ok(selected)
}

// ── Batch reporting ──────────────────────────────────────────────────

#[derive(Serialize)]
struct BatchEntry {
    device: DeviceId,
    name: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Tabled)]
struct BatchRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device")]
    name: String,
    #[tabled(rename = "Result")]
    result: String,
}

impl From<&BatchEntry> for BatchRow {
    fn from(e: &BatchEntry) -> Self {
        Self {
            id: e.device.to_string(),
            name: e.name.clone(),
            result: e.error.clone().unwrap_or_else(|| "ok".into()),
        }
    }
}

/// Print a per-device outcome; fail only if every device failed.
pub fn report_batch<T>(
    ctx: &Context<'_>,
    operation: &str,
    outcome: &BatchOutcome<T>,
) -> Result<(), CliError> {
    let entries: Vec<BatchEntry> = outcome
        .results
        .iter()
        .map(|r| BatchEntry {
            device: r.device,
            name: r.name.clone(),
            ok: r.result.is_ok(),
            error: r.result.as_ref().err().map(ToString::to_string),
        })
        .collect();

    let out = output::render_list(ctx.format, &entries, |e| BatchRow::from(e))?;
    output::print_output(&out, ctx.global.quiet);

    if outcome.all_failed() {
        return Err(CliError::AllFailed {
            operation: operation.into(),
            attempted: outcome.attempted(),
        });
    }
    let failed = outcome.attempted() - outcome.succeeded();
    if failed > 0 {
        ctx.note(&format!(
            "warning: {operation} failed on {failed} of {} device(s)",
            outcome.attempted()
        ));
    }
    Ok(())
}

// ── Prompts & files ──────────────────────────────────────────────────

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}
