//! CLI command definitions and dispatch.
//!
//! Each group of subcommands lives in its own submodule:
//! - `columns`: the column table, menu and playlist preview
//! - `tags`: reading and writing FLAC tags, exporting covers
//! - `config`: persisted column settings

mod columns;
mod config;
mod tags;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use columns::{cmd_columns, cmd_menu, cmd_show};
pub use config::cmd_config;
pub use tags::{cmd_covers, cmd_set_tag, cmd_tags};

/// Tracktable CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List the registered playlist columns with their effective sizing
    Columns,
    /// Show the column visibility menu
    Menu,
    /// Render audio files as a playlist using the configured columns
    Show {
        /// Audio files, one row each
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Row to mark as playing (0-based)
        #[arg(long)]
        playing: Option<usize>,
    },
    /// Read tags from an audio file
    Tags {
        /// Path to the audio file
        path: PathBuf,
        /// Tags to read (default: all stored tags)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Replace a tag's values in an audio file
    SetTag {
        /// Path to the audio file
        path: PathBuf,
        /// Internal tag name, e.g. title or bpm
        tag: String,
        /// New values; none deletes the tag
        values: Vec<String>,
    },
    /// Export embedded cover images
    Covers {
        /// Path to the audio file
        path: PathBuf,
        /// Directory to write the images to
        #[arg(short, long)]
        output: PathBuf,
    },
    /// View or change column settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// `config` subcommands
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the current configuration
    Show,
    /// Turn user-resizable columns on or off
    Resizable {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Persist a column width
    SetWidth {
        /// Column identifier
        id: String,
        /// Width in pixels
        width: u32,
    },
    /// Forget a persisted column width
    ClearWidth {
        /// Column identifier
        id: String,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Columns => cmd_columns(),
        Commands::Menu => cmd_menu(),
        Commands::Show { paths, playing } => cmd_show(paths, *playing),
        Commands::Tags { path, tags, json } => cmd_tags(path, tags, *json),
        Commands::SetTag { path, tag, values } => cmd_set_tag(path, tag, values),
        Commands::Covers { path, output } => cmd_covers(path, output),
        Commands::Config { command } => cmd_config(command),
    }
}
