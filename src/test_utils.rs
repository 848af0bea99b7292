//! Test utilities and fixtures.
//!
//! FLAC fixtures are assembled byte by byte so tests don't depend on
//! binary files in the repository.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{flac_fixture, FixturePicture};
//!
//! let bytes = flac_fixture(&[("TITLE", "Song")], &[]);
//! let flac = FlacFormat::from_reader(&mut Cursor::new(bytes))?;
//! ```

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::columns::{ColumnContainer, FontWeight, StatusIcon};
use crate::config::Config;
use crate::event::{Event, EventBus, EventKind, Subscription};
use crate::model::Track;
use crate::settings::Settings;

const BLOCK_STREAMINFO: u8 = 0;
const BLOCK_VORBIS_COMMENT: u8 = 4;
const BLOCK_PICTURE: u8 = 6;

/// A picture block for [`flac_fixture`].
#[derive(Debug, Clone)]
pub struct FixturePicture {
    pub kind: u8,
    pub mime: &'static str,
    pub description: &'static str,
    pub data: Vec<u8>,
}

/// A minimal FLAC stream: one second of 44.1kHz 16-bit stereo stream
/// info, the given Vorbis comments and picture blocks, and a few bytes
/// standing in for audio frames.
pub fn flac_fixture(comments: &[(&str, &str)], pictures: &[FixturePicture]) -> Vec<u8> {
    let mut blocks: Vec<(u8, Vec<u8>)> = vec![(BLOCK_STREAMINFO, stream_info(44_100))];
    blocks.push((BLOCK_VORBIS_COMMENT, vorbis_comment(comments)));
    for picture in pictures {
        blocks.push((BLOCK_PICTURE, picture_block(picture)));
    }

    let mut out = b"fLaC".to_vec();
    let last = blocks.len() - 1;
    for (index, (kind, body)) in blocks.into_iter().enumerate() {
        let flag = if index == last { 0x80 } else { 0 };
        out.push(flag | kind);
        out.extend_from_slice(&(body.len() as u32).to_be_bytes()[1..]);
        out.extend_from_slice(&body);
    }
    out.extend_from_slice(&[0u8; 16]);
    out
}

/// Write [`flac_fixture`] to `dir/fixture.flac`.
pub fn write_flac_fixture(
    dir: &Path,
    comments: &[(&str, &str)],
    pictures: &[FixturePicture],
) -> PathBuf {
    let path = dir.join("fixture.flac");
    std::fs::write(&path, flac_fixture(comments, pictures)).expect("Failed to write fixture");
    path
}

fn stream_info(total_samples: u64) -> Vec<u8> {
    let mut body = Vec::with_capacity(34);
    body.extend_from_slice(&4096u16.to_be_bytes()); // min block size
    body.extend_from_slice(&4096u16.to_be_bytes()); // max block size
    body.extend_from_slice(&[0; 3]); // min frame size
    body.extend_from_slice(&[0; 3]); // max frame size
    // 20 bits sample rate, 3 bits channels - 1, 5 bits bps - 1, 36 bits samples
    let packed: u64 = (44_100u64 << 44) | (1u64 << 41) | (15u64 << 36) | total_samples;
    body.extend_from_slice(&packed.to_be_bytes());
    body.extend_from_slice(&[0; 16]); // MD5
    body
}

fn vorbis_comment(comments: &[(&str, &str)]) -> Vec<u8> {
    let vendor = b"tracktable tests";
    let mut body = Vec::new();
    body.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    body.extend_from_slice(vendor);
    body.extend_from_slice(&(comments.len() as u32).to_le_bytes());
    for (key, value) in comments {
        let entry = format!("{key}={value}");
        body.extend_from_slice(&(entry.len() as u32).to_le_bytes());
        body.extend_from_slice(entry.as_bytes());
    }
    body
}

fn picture_block(picture: &FixturePicture) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&u32::from(picture.kind).to_be_bytes());
    body.extend_from_slice(&(picture.mime.len() as u32).to_be_bytes());
    body.extend_from_slice(picture.mime.as_bytes());
    body.extend_from_slice(&(picture.description.len() as u32).to_be_bytes());
    body.extend_from_slice(picture.description.as_bytes());
    for dimension in [1u32, 1, 24, 0] {
        // width, height, depth, colors
        body.extend_from_slice(&dimension.to_be_bytes());
    }
    body.extend_from_slice(&(picture.data.len() as u32).to_be_bytes());
    body.extend_from_slice(&picture.data);
    body
}

/// Creates a mock Track with sensible defaults.
pub fn mock_track() -> Track {
    Track::new("/music/Test Artist/Test Album/01 - Test Track.flac")
        .with_tag("title", "Test Track")
        .with_tag("artist", "Test Artist")
        .with_tag("album", "Test Album")
        .with_tag("tracknumber", "1/10")
}

/// Settings over an in-memory config with a fresh bus.
pub fn test_settings(config: Config) -> Rc<Settings> {
    Settings::new(config, EventBus::new())
}

/// Collects `(row, percent)` of every rating event.
pub fn recorded_ratings(bus: &Rc<EventBus>) -> (Rc<RefCell<Vec<(usize, f64)>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = bus.subscribe(EventKind::RatingChanged, move |event| {
        if let Event::RatingChanged { row, percent } = event {
            sink.borrow_mut().push((*row, *percent));
        }
    });
    (seen, sub)
}

/// Bare container: every data index renders the title.
pub struct RowSource {
    pub tracks: Vec<Track>,
    pub current: Option<usize>,
}

impl RowSource {
    pub fn new(tracks: Vec<Track>, current: Option<usize>) -> Self {
        Self { tracks, current }
    }
}

impl ColumnContainer for RowSource {
    fn track(&self, row: usize) -> Option<&Track> {
        self.tracks.get(row)
    }

    fn track_mut(&mut self, row: usize) -> Option<&mut Track> {
        self.tracks.get_mut(row)
    }

    fn value(&self, row: usize, _data_index: usize) -> Option<String> {
        self.track(row).map(|track| track.display_field("title"))
    }

    fn status_icon(&self, row: usize) -> Option<StatusIcon> {
        (self.current == Some(row)).then_some(StatusIcon::Playing)
    }

    fn cell_weight(&self, row: usize) -> FontWeight {
        if self.current == Some(row) {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        }
    }
}
