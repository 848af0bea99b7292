//! Tracktable - playlist columns and FLAC tags.
//!
//! A toolkit-neutral model of a music player's playlist view: a registry of
//! column definitions, columns that size themselves from persisted settings
//! and follow changes to them, a rating column, and the FLAC tag adapter
//! the columns read their values through.

pub mod cli;
pub mod columns;
pub mod config;
pub mod error;
pub mod event;
pub mod formatter;
pub mod metadata;
pub mod model;
pub mod playlist;
pub mod settings;
#[cfg(test)]
pub mod test_utils;

pub use error::{Error, Result};
