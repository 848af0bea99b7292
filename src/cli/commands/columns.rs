//! Column table, menu and playlist preview commands.

use anyhow::Context;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

use crate::columns::{
    CellContent, ColumnOptions, ColumnRegistry, PlaylistColumn, RenderStrategy, Sizing,
    StatusIcon,
};
use crate::event::EventBus;
use crate::model::Track;
use crate::playlist::PlaylistView;
use crate::settings::Settings;
use crate::{config, metadata};

fn load_settings() -> Rc<Settings> {
    Settings::new(config::load(), EventBus::new())
}

fn describe(sizing: Sizing) -> String {
    match sizing {
        Sizing::Resizable { width } => format!("resizable {width}px"),
        Sizing::Expand => "expand".to_string(),
        Sizing::GrowOnly { width } => format!("grow from {width}px"),
    }
}

/// List the registered columns
pub fn cmd_columns() -> anyhow::Result<()> {
    let settings = load_settings();
    let registry = ColumnRegistry::standard();

    println!(
        "{:<14} {:<12} {:>5}  {:<8} {}",
        "ID", "HEADER", "SIZE", "RENDER", "SIZING"
    );
    for definition in registry.iter() {
        let column =
            PlaylistColumn::instantiate(definition, 1, ColumnOptions::default(), &settings);
        let render = match definition.strategy {
            RenderStrategy::Text => "text",
            RenderStrategy::Rating => "rating",
        };
        println!(
            "{:<14} {:<12} {:>5}  {:<8} {}",
            definition.id,
            definition.display,
            definition.size,
            render,
            describe(column.borrow().sizing())
        );
    }
    Ok(())
}

/// Show the column visibility menu
pub fn cmd_menu() -> anyhow::Result<()> {
    let view = PlaylistView::new(
        Rc::new(ColumnRegistry::standard()),
        load_settings(),
        Vec::new(),
    )?;

    for item in view.menu().items() {
        let check = if item.active { "x" } else { " " };
        println!("[{check}] {:<14} {}", item.label, item.name);
    }
    Ok(())
}

/// Render audio files as a playlist
pub fn cmd_show(paths: &[PathBuf], playing: Option<usize>) -> anyhow::Result<()> {
    let mut tracks = Vec::with_capacity(paths.len());
    for path in paths {
        let format = metadata::open(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        tracks.push(Track::from_format(path, format.as_ref()));
    }
    info!(tracks = tracks.len(), "Loaded playlist");

    let mut view = PlaylistView::new(Rc::new(ColumnRegistry::standard()), load_settings(), tracks)?;
    view.model_mut().set_current(playing);

    let headers: Vec<String> = view
        .columns()
        .iter()
        .map(|column| column.borrow().header().to_string())
        .collect();
    println!("  {}", headers.join(" | "));

    for row in 0..view.model().len() {
        let Some(cells) = view.render_row(row) else {
            continue;
        };
        let marker = match cells.first().and_then(|cell| cell.icon) {
            Some(StatusIcon::Playing) => ">",
            Some(StatusIcon::Paused) => "=",
            None => " ",
        };
        let texts: Vec<String> = cells
            .into_iter()
            .map(|cell| match cell.content {
                CellContent::Text { text, .. } => text,
                CellContent::Rating(stars) => "*".repeat(stars as usize),
            })
            .collect();
        println!("{marker} {}", texts.join(" | "));
    }
    Ok(())
}
