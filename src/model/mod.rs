//! Playlist row data.
//!
//! A [`Track`] is what a playlist column renders: text tags read from the
//! file plus the library-maintained fields (play count, last played,
//! rating) that the `__`-prefixed columns show.

use chrono::{DateTime, Local, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::metadata::{Bitrate, COVER_TAG, STANDARD_TAGS, TagFormat, TagValues};

/// A track in a playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// File location
    pub location: PathBuf,
    /// Text tags keyed by internal name
    pub tags: BTreeMap<String, TagValues>,
    /// Stream length, when known
    pub length: Option<Duration>,
    pub bitrate: Bitrate,
    pub playcount: u32,
    pub last_played: Option<DateTime<Utc>>,
    /// Rating in steps, 0 = unrated
    rating: u32,
}

impl Track {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            tags: BTreeMap::new(),
            length: None,
            bitrate: Bitrate::Unavailable,
            playcount: 0,
            last_played: None,
            rating: 0,
        }
    }

    /// Build a track from an opened tag format.
    pub fn from_format(location: impl Into<PathBuf>, format: &dyn TagFormat) -> Self {
        let mut track = Self::new(location);
        let text_tags: Vec<&str> = STANDARD_TAGS
            .iter()
            .copied()
            .filter(|tag| *tag != COVER_TAG)
            .collect();

        for (name, value) in format.read_tags(&text_tags) {
            if let Some(values) = value.as_text() {
                track.tags.insert(name, values.iter().cloned().collect());
            }
        }
        track.length = format.length();
        track.bitrate = format.bitrate();
        track
    }

    /// Builder-style tag setter, mostly for fixtures.
    pub fn with_tag(mut self, name: &str, value: &str) -> Self {
        self.set_tag(name, [value]);
        self
    }

    pub fn tag(&self, name: &str) -> Option<&[String]> {
        self.tags.get(name).map(|values| values.as_slice())
    }

    pub fn set_tag<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: TagValues = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.tags.remove(name);
        } else {
            self.tags.insert(name.to_string(), values);
        }
    }

    pub fn rating(&self) -> u32 {
        self.rating
    }

    pub fn set_rating(&mut self, rating: u32) {
        self.rating = rating;
    }

    /// Display text for a column field.
    ///
    /// `__`-prefixed names are computed fields; anything else is a tag,
    /// with multiple values joined by " / ".
    pub fn display_field(&self, field: &str) -> String {
        match field {
            "__length" => self.length.map(format_length).unwrap_or_default(),
            "__bitrate" => match self.bitrate {
                Bitrate::Known(_) => self.bitrate.to_string(),
                Bitrate::Unavailable => String::new(),
            },
            "__playcount" => self.playcount.to_string(),
            "__last_played" => self
                .last_played
                .map(|when| {
                    when.with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                })
                .unwrap_or_else(|| "Never".to_string()),
            "__loc" => self.location.display().to_string(),
            "__rating" => self.rating.to_string(),
            "filename" => file_name(&self.location),
            "tracknumber" | "discnumber" => self
                .tag(field)
                .and_then(|values| values.first())
                .map(|value| value.split('/').next().unwrap_or_default().trim().to_string())
                .unwrap_or_default(),
            _ => self
                .tag(field)
                .map(|values| values.join(" / "))
                .unwrap_or_default(),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `m:ss`, or `h:mm:ss` past an hour.
pub fn format_length(length: Duration) -> String {
    let total = length.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
