//! Command-line interface for tracktable.
//!
//! Inspect the column table, show playlists built from audio files, edit
//! FLAC tags and change the persisted column settings.

mod commands;

pub use commands::{Cli, Commands, ConfigCommand, run_command};
