//! Clap derive structures for the `ledfleet` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ledfleet -- drive a fleet of LED strip controllers
#[derive(Debug, Parser)]
#[command(
    name = "ledfleet",
    version,
    about = "Control a fleet of networked LED strips from the command line",
    long_about = "Probe, light, and manage scripts on a fleet of LED strip controllers.\n\n\
        Devices are listed in config.toml; commands target the devices named\n\
        with --device, or every device that answers a probe.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to config.toml (defaults to the platform config dir)
    #[arg(long, env = "LEDFLEET_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (defaults to `defaults.output` in config)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Probe every device and show its status
    #[command(alias = "ls")]
    Devices,

    /// Monitor connectivity and print events until interrupted
    Watch(WatchArgs),

    /// Set a solid color
    Color(ColorArgs),

    /// Set white at a brightness level
    White(WhiteArgs),

    /// Turn the strips off
    Off(TargetArgs),

    /// Run a stored script
    Run(RunArgs),

    /// Manage scripts stored on devices
    #[command(alias = "s")]
    Scripts(ScriptsArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Targeting ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Target device by id or name (repeatable; default: every online device)
    #[arg(long = "device", short = 'd', value_name = "DEVICE")]
    pub devices: Vec<String>,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    pub seconds: Option<u64>,
}

// ── Lighting ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ColorArgs {
    /// Hue in degrees
    #[arg(long, value_parser = clap::value_parser!(u16).range(0..=360))]
    pub hue: u16,

    /// Saturation percent
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub saturation: u8,

    /// Lightness percent
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub lightness: u8,

    #[command(flatten)]
    pub targets: TargetArgs,
}

#[derive(Debug, Args)]
pub struct WhiteArgs {
    /// Brightness percent
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub level: u8,

    #[command(flatten)]
    pub targets: TargetArgs,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Script filename
    pub script: String,

    #[command(flatten)]
    pub targets: TargetArgs,
}

// ── Scripts ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ScriptsArgs {
    #[command(subcommand)]
    pub command: ScriptsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScriptsCommand {
    /// List the scripts stored on one device
    #[command(alias = "ls")]
    List {
        /// Device id or name
        device: String,
    },

    /// Scripts present on every target device
    Shared(TargetArgs),

    /// Print a script body
    Show {
        /// Device id or name
        device: String,
        /// Script filename
        name: String,
    },

    /// Upload a script body from a JSON file
    Save {
        /// Device id or name
        device: String,
        /// Script filename
        name: String,
        /// JSON file holding the script body
        #[arg(long = "from-file", short = 'F')]
        from_file: PathBuf,
    },

    /// Copy scripts from one device to others
    Copy {
        /// Source device id or name
        #[arg(long)]
        from: String,
        /// Target device id or name (repeatable)
        #[arg(long = "to", required = true)]
        to: Vec<String>,
        /// Script filenames
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Delete scripts from one device
    #[command(alias = "rm")]
    Delete {
        /// Device id or name
        device: String,
        /// Script filenames
        #[arg(required = true)]
        names: Vec<String>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Print the effective configuration (file + environment)
    Effective,

    /// Print a device's configuration document
    Show {
        /// Device id or name
        device: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
