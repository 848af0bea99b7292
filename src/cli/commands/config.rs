//! Persisted column settings commands.

use anyhow::{Context, bail};
use std::path::Path;
use std::rc::Rc;
use tracing::info;

use super::ConfigCommand;
use crate::columns::ColumnRegistry;
use crate::config::{self, Config};
use crate::event::EventBus;
use crate::settings::Settings;

/// View or change column settings
pub fn cmd_config(command: &ConfigCommand) -> anyhow::Result<()> {
    let path = config::config_path().context("No config directory on this platform")?;
    run(command, &path)
}

/// Run `command` against the config file at `path`.
///
/// A file that exists but doesn't parse is reported, never overwritten.
fn run(command: &ConfigCommand, path: &Path) -> anyhow::Result<()> {
    let loaded = if path.exists() {
        config::load_from(path)
            .with_context(|| format!("Refusing to modify {}", path.display()))?
    } else {
        Config::default()
    };
    let settings = Settings::with_path(loaded, EventBus::new(), path.to_path_buf());

    if let ConfigCommand::Show = command {
        println!("# {}", path.display());
        print!("{}", toml::to_string_pretty(&settings.snapshot())?);
        return Ok(());
    }

    apply(&settings, command)?;
    settings.save()?;
    info!(path = %path.display(), "Configuration saved");
    Ok(())
}

fn apply(settings: &Rc<Settings>, command: &ConfigCommand) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Show => {}
        ConfigCommand::Resizable { enabled } => {
            settings.set_resizable_columns(*enabled);
            println!("Resizable columns: {enabled}");
        }
        ConfigCommand::SetWidth { id, width } => {
            require_column(id)?;
            settings.set_column_width(id, *width);
            println!("{id}: {}px", settings.column_width(id).unwrap_or(*width));
        }
        ConfigCommand::ClearWidth { id } => {
            require_column(id)?;
            settings.clear_column_width(id);
            println!("{id}: default width");
        }
    }
    Ok(())
}

fn require_column(id: &str) -> anyhow::Result<()> {
    if !ColumnRegistry::standard().contains(id) {
        bail!("Unknown column '{id}'");
    }
    Ok(())
}
