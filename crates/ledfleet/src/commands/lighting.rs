//! Color, white, off, and run: broadcast to the selected devices.

use ledfleet_core::Hsl;

use crate::cli::{ColorArgs, RunArgs, TargetArgs, WhiteArgs};
use crate::commands::Context;
use crate::error::CliError;

use super::util;

pub async fn color(ctx: &Context<'_>, args: ColorArgs) -> Result<(), CliError> {
    util::select_targets(ctx, &args.targets).await?;
    let color = Hsl::new(args.hue, args.saturation, args.lightness);
    let outcome = ctx.fleet.selection().set_color(color).await;
    util::report_batch(ctx, "color", &outcome)
}

pub async fn white(ctx: &Context<'_>, args: WhiteArgs) -> Result<(), CliError> {
    util::select_targets(ctx, &args.targets).await?;
    let outcome = ctx.fleet.selection().set_white(args.level).await;
    util::report_batch(ctx, "white", &outcome)
}

pub async fn off(ctx: &Context<'_>, targets: TargetArgs) -> Result<(), CliError> {
    util::select_targets(ctx, &targets).await?;
    let outcome = ctx.fleet.selection().set_off().await;
    util::report_batch(ctx, "off", &outcome)
}

pub async fn run(ctx: &Context<'_>, args: RunArgs) -> Result<(), CliError> {
    let targets = util::select_targets(ctx, &args.targets).await?;

    // Only offer what every target can run.
    let shared = ctx.fleet.selection().shared_scripts().await;
    if !shared.iter().any(|s| s.filename == args.script) {
        return Err(CliError::Validation {
            field: "script".into(),
            reason: format!(
                "'{}' is not stored on all {} target device(s); see: ledfleet scripts shared",
                args.script,
                targets.len()
            ),
        });
    }

    let outcome = ctx.fleet.selection().run_script(&args.script).await;
    util::report_batch(ctx, "run", &outcome)
}
