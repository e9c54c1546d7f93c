// CLI definitions using clap

use clap::{Args, Parser, Subcommand};
use genie_transport::RgbColor;
use razergenie::simulate::SimulatedProfile;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "razergenie")]
#[command(author, version, about = "Custom LED matrix editor for Razer devices")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/razergenie/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(flatten)]
    pub device: DeviceArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which device to talk to
#[derive(Args, Clone, Default)]
pub struct DeviceArgs {
    /// Log every device call and its result
    #[arg(long, global = true)]
    pub monitor: bool,

    /// With --monitor, also print the colors of every row definition
    #[arg(long, global = true, requires = "monitor")]
    pub monitor_colors: bool,

    /// Use an in-memory device instead of the daemon (ROWSxCOLS[:TYPE[:LAYOUT]])
    #[arg(long, global = true, value_name = "PROFILE")]
    pub simulate: Option<SimulatedProfile>,

    /// Device serial (default: first device with a custom matrix)
    #[arg(short, long, global = true, value_name = "SERIAL")]
    pub device: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List devices known to the daemon
    #[command(visible_alias = "ls")]
    List,

    /// Show name, type, matrix size and keyboard layout
    #[command(visible_alias = "i")]
    Info,

    /// Open the interactive custom matrix editor
    #[command(visible_alias = "e")]
    Edit {
        /// One key per matrix cell, ignoring the device type
        #[arg(long)]
        discover: bool,
    },

    /// Show which layout the editor would pick, without a device
    Layout {
        /// Device type (keyboard, mousepad, ...)
        #[arg(short = 't', long = "type", default_value = "keyboard")]
        device_type: String,
        /// Matrix rows
        #[arg(short, long)]
        rows: usize,
        /// Matrix columns
        #[arg(short = 'C', long)]
        cols: usize,
        /// Physical keyboard layout identifier
        #[arg(short, long, default_value = "unknown")]
        physical: String,
        /// Matrix discovery mode
        #[arg(long)]
        discover: bool,
    },

    /// Paint one cell and push its row
    Paint {
        /// Matrix row
        row: usize,
        /// Matrix column
        col: usize,
        /// Color (#rrggbb, r,g,b or a name like 'red')
        color: RgbColor,
    },

    /// Turn every cell off
    Clear,

    /// Print the effective configuration as TOML
    Config {
        /// Write it to the config file if none exists yet
        #[arg(long)]
        init: bool,
    },
}
