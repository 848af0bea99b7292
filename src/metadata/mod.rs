//! Audio file tag reading and writing.
//!
//! Formats expose their raw key/value storage through [`TagFormat`]; the
//! trait's provided methods translate internal tag names with the format's
//! [`TagFieldMap`] so callers only ever see internal names. Container
//! parsing is done by lofty and its errors are passed through unchanged.
//!
//! Only FLAC is implemented, see [`FlacFormat`].

mod field_map;
mod flac;

pub use field_map::TagFieldMap;
pub use flac::{FLAC_FIELD_MAP, FlacFormat};

use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Internal name of the pseudo-tag carrying embedded artwork.
pub const COVER_TAG: &str = "cover";

/// Tags read when the caller doesn't name any.
pub const STANDARD_TAGS: &[&str] = &[
    "title",
    "artist",
    "albumartist",
    "album",
    "composer",
    "tracknumber",
    "discnumber",
    "date",
    "genre",
    "bpm",
    "comment",
    COVER_TAG,
];

/// Values of a text tag. Almost always a single entry.
pub type TagValues = SmallVec<[String; 1]>;

/// Result of a tag read, keyed by internal tag name.
pub type TagMap = BTreeMap<String, FieldValue>;

/// A value to be written to a tag.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

impl TagValue {
    /// Text form of the value.
    pub fn into_text(self) -> Self {
        match self {
            Self::Text(_) => self,
            other => Self::Text(other.to_string()),
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for TagValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for TagValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

/// Embedded artwork, normalized from a container's picture block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    /// Picture type as stored in the container (3 = front cover)
    pub kind: u8,
    /// Free-form description
    pub description: String,
    /// MIME type, e.g. `image/jpeg`
    pub mime: String,
    /// Raw image bytes
    pub data: Vec<u8>,
}

/// A value read from a tag.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(TagValues),
    Covers(Vec<CoverImage>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            Self::Text(values) => Some(values),
            Self::Covers(_) => None,
        }
    }

    pub fn as_covers(&self) -> Option<&[CoverImage]> {
        match self {
            Self::Covers(covers) => Some(covers),
            Self::Text(_) => None,
        }
    }
}

/// Stream bitrate as reported by a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bitrate {
    /// Bits per second
    Known(u32),
    /// The container can't report it without decoding the stream
    Unavailable,
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(bps) => write!(f, "{}k", bps / 1000),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// Tag access for one container format.
///
/// Implementors provide raw storage keyed by the container's own names;
/// the provided methods do the internal-name translation.
pub trait TagFormat {
    /// Internal → container name table.
    fn field_map(&self) -> TagFieldMap;

    /// Whether [`TagFormat::write_tag`] and [`TagFormat::save`] are supported.
    fn writable(&self) -> bool;

    /// Values stored under a container key.
    fn raw_values(&self, key: &str) -> Vec<String>;

    /// Every container key that has at least one value.
    fn raw_keys(&self) -> Vec<String>;

    /// Replace the values stored under a container key. Empty deletes it.
    fn set_raw_values(&mut self, key: &str, values: Vec<TagValue>) -> Result<()>;

    fn bitrate(&self) -> Bitrate;

    fn length(&self) -> Option<Duration>;

    /// Write pending changes back to the file.
    fn save(&mut self) -> Result<()>;

    /// Read the requested internal tags. Absent tags are left out.
    fn read_tags(&self, tags: &[&str]) -> TagMap {
        read_mapped_tags(self, tags)
    }

    /// Read every stored tag under its internal name.
    fn read_all(&self) -> TagMap {
        let keys = self.raw_keys();
        let map = self.field_map();
        let mut names: Vec<String> = keys.iter().map(|key| map.internal(key)).collect();
        names.sort();
        names.dedup();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        self.read_tags(&names)
    }

    /// Replace an internal tag's values. Empty deletes the tag.
    fn write_tag(&mut self, tag: &str, values: Vec<TagValue>) -> Result<()> {
        write_mapped_tag(self, tag, values)
    }
}

/// Name-translating read shared by all formats.
pub fn read_mapped_tags<F: TagFormat + ?Sized>(format: &F, tags: &[&str]) -> TagMap {
    let map = format.field_map();
    let mut result = TagMap::new();
    for &tag in tags {
        let values = format.raw_values(map.external(tag));
        if !values.is_empty() {
            result.insert(tag.to_string(), FieldValue::Text(values.into_iter().collect()));
        }
    }
    result
}

/// Name-translating write shared by all formats.
pub fn write_mapped_tag<F: TagFormat + ?Sized>(
    format: &mut F,
    tag: &str,
    values: Vec<TagValue>,
) -> Result<()> {
    let map = format.field_map();
    format.set_raw_values(map.external(tag), values)
}

/// Open a file with the tag format matching its extension.
pub fn open(path: &Path) -> Result<Box<dyn TagFormat>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("flac") => Ok(Box::new(FlacFormat::open(path)?)),
        _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
    }
}
