//! Live connectivity monitoring.

use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use ledfleet_core::FleetEvent;

use crate::cli::{OutputFormat, WatchArgs};
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

pub async fn handle(ctx: &Context<'_>, args: WatchArgs) -> Result<(), CliError> {
    let mut events = ctx.fleet.events();
    ctx.fleet.start().await;
    ctx.note("watching fleet connectivity (Ctrl-C to stop)");

    let deadline = async {
        match args.seconds {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break Ok(()),
            () = &mut deadline => break Ok(()),
            event = events.recv() => match event {
                Ok(event) => {
                    if let Err(e) = print_event(ctx, &event) {
                        break Err(e);
                    }
                }
                Err(RecvError::Lagged(n)) => warn!(skipped = n, "event stream lagged"),
                Err(RecvError::Closed) => break Ok(()),
            },
        }
    };

    ctx.fleet.shutdown().await;
    result
}

fn print_event(ctx: &Context<'_>, event: &FleetEvent) -> Result<(), CliError> {
    let line = match ctx.format {
        OutputFormat::Json => serde_json::to_string(&serde_json::json!({
            "event": event.name(),
            "device": event.device(),
        }))?,
        OutputFormat::Table => {
            let who = event
                .device()
                .map_or_else(|| "-".to_owned(), |d| format!("{} ({})", d.name, d.host));
            let detail = match event {
                FleetEvent::DeviceOnline(_) => output::status_label(true, ctx.color),
                FleetEvent::DeviceOffline(_) => output::status_label(false, ctx.color),
                FleetEvent::DeviceStatusChanged(d) => output::status_label(d.online, ctx.color),
                FleetEvent::SingleSelectionChanged(_) | FleetEvent::SelectionChanged(_) => {
                    "selection".into()
                }
            };
            format!(
                "{}  {:<22}  {who}  {detail}",
                chrono::Local::now().format("%H:%M:%S"),
                event.name()
            )
        }
    };
    output::print_output(&line, ctx.global.quiet);
    Ok(())
}
