//! Device status listing.

use tabled::Tabled;

use ledfleet_core::DeviceSnapshot;

use crate::commands::Context;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl DeviceRow {
    fn new(d: &DeviceSnapshot, color: bool) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name.clone(),
            host: d.host.clone(),
            status: output::status_label(d.online, color),
            last_seen: d.last_seen.map_or_else(
                || "-".into(),
                |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context<'_>) -> Result<(), CliError> {
    let online = ctx.fleet.probe_all().await;
    let snapshots = ctx.fleet.snapshots();

    let out = output::render_list(ctx.format, &snapshots, |d| DeviceRow::new(d, ctx.color))?;
    output::print_output(&out, ctx.global.quiet);
    ctx.note(&format!("{online} of {} device(s) online", snapshots.len()));
    Ok(())
}
