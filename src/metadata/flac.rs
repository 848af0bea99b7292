//! FLAC tags via lofty.
//!
//! FLAC keeps every tag as text in its Vorbis comment block and artwork in
//! separate PICTURE blocks, which lofty keeps on the [`FlacFile`] itself.

use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::AudioFile;
use lofty::flac::FlacFile;
use lofty::ogg::{OggPictureStorage, VorbisComments};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::{
    Bitrate, COVER_TAG, CoverImage, FieldValue, TagFieldMap, TagFormat, TagMap, TagValue,
    read_mapped_tags, write_mapped_tag,
};
use crate::error::{Error, Result};

/// FLAC names for internal tags that differ.
pub const FLAC_FIELD_MAP: TagFieldMap =
    TagFieldMap::new(&[("bpm", "tempo"), ("comment", "description")]);

/// A FLAC file opened for tag access.
pub struct FlacFormat {
    file: FlacFile,
    path: Option<PathBuf>,
}

impl FlacFormat {
    /// Open and parse a FLAC file.
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = File::open(path)?;
        let file = FlacFile::read_from(&mut reader, ParseOptions::new())?;
        debug!(path = %path.display(), "Opened FLAC file");
        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Parse FLAC data already in memory. Use [`FlacFormat::save_to`] to write it out.
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let file = FlacFile::read_from(reader, ParseOptions::new())?;
        Ok(Self { file, path: None })
    }

    /// One record per embedded picture: PICTURE blocks in file order, then
    /// any carried inside the Vorbis comments.
    pub fn covers(&self) -> Vec<CoverImage> {
        let in_comments = self
            .file
            .vorbis_comments()
            .map(VorbisComments::pictures)
            .unwrap_or_default();

        self.file
            .pictures()
            .iter()
            .chain(in_comments)
            .map(|(picture, _info)| CoverImage {
                kind: picture.pic_type().as_u8(),
                description: picture.description().unwrap_or_default().to_string(),
                mime: picture
                    .mime_type()
                    .map(|mime| mime.as_str().to_string())
                    .unwrap_or_default(),
                data: picture.data().to_vec(),
            })
            .collect()
    }

    /// Write the file, tags included, to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.file.save_to_path(path, WriteOptions::default())?;
        debug!(path = %path.display(), "Saved FLAC tags");
        Ok(())
    }
}

impl TagFormat for FlacFormat {
    fn field_map(&self) -> TagFieldMap {
        FLAC_FIELD_MAP
    }

    fn writable(&self) -> bool {
        true
    }

    fn raw_values(&self, key: &str) -> Vec<String> {
        self.file
            .vorbis_comments()
            .map(|comments| comments.get_all(key).map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn raw_keys(&self) -> Vec<String> {
        self.file
            .vorbis_comments()
            .map(|comments| comments.items().map(|(key, _)| key.to_string()).collect())
            .unwrap_or_default()
    }

    fn set_raw_values(&mut self, key: &str, values: Vec<TagValue>) -> Result<()> {
        if !is_valid_comment_key(key) {
            return Err(Error::InvalidTagName(key.to_string()));
        }
        if self.file.vorbis_comments().is_none() {
            self.file.set_vorbis_comments(VorbisComments::default());
        }
        if let Some(comments) = self.file.vorbis_comments_mut() {
            comments.remove(key).for_each(drop);
            for value in values {
                comments.push(key.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    /// FLAC only records the bitrate implicitly in the frames, so it isn't
    /// reported.
    fn bitrate(&self) -> Bitrate {
        Bitrate::Unavailable
    }

    fn length(&self) -> Option<Duration> {
        let duration = self.file.properties().duration();
        (!duration.is_zero()).then_some(duration)
    }

    fn save(&mut self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "FLAC data was read from memory; use save_to",
            )));
        };
        self.save_to(&path)
    }

    fn read_tags(&self, tags: &[&str]) -> TagMap {
        let mut result = read_mapped_tags(self, tags);
        if tags.contains(&COVER_TAG) {
            result.insert(COVER_TAG.to_string(), FieldValue::Covers(self.covers()));
        }
        result
    }

    /// Vorbis comments only hold text, so every value is stringified first.
    fn write_tag(&mut self, tag: &str, values: Vec<TagValue>) -> Result<()> {
        let values = values.into_iter().map(TagValue::into_text).collect();
        write_mapped_tag(self, tag, values)
    }
}

/// Vorbis comment field names: non-empty ASCII 0x20..=0x7D without `=`.
fn is_valid_comment_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| (0x20..=0x7D).contains(&b) && b != b'=')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FixturePicture, flac_fixture, write_flac_fixture};
    use std::io::Cursor;

    fn sample_pictures() -> Vec<FixturePicture> {
        vec![
            FixturePicture {
                kind: 3,
                mime: "image/png",
                description: "Front",
                data: vec![0x89, b'P', b'N', b'G', 1, 2, 3],
            },
            FixturePicture {
                kind: 4,
                mime: "image/jpeg",
                description: "",
                data: vec![0xFF, 0xD8, 0xFF, 9, 8, 7, 6],
            },
        ]
    }

    fn open_fixture(comments: &[(&str, &str)], pictures: &[FixturePicture]) -> FlacFormat {
        let bytes = flac_fixture(comments, pictures);
        FlacFormat::from_reader(&mut Cursor::new(bytes)).expect("fixture should parse")
    }

    #[test]
    fn test_read_tags_translates_mapped_names() {
        let flac = open_fixture(
            &[
                ("TITLE", "Song"),
                ("TEMPO", "128"),
                ("DESCRIPTION", "Live take"),
            ],
            &[],
        );

        let tags = flac.read_tags(&["title", "bpm", "comment", "genre"]);

        assert_eq!(tags["title"].as_text(), Some(&["Song".to_string()][..]));
        assert_eq!(tags["bpm"].as_text(), Some(&["128".to_string()][..]));
        assert_eq!(tags["comment"].as_text(), Some(&["Live take".to_string()][..]));
        assert!(!tags.contains_key("genre"));
        assert!(!tags.contains_key("tempo"));
    }

    #[test]
    fn test_multi_valued_tags_keep_order() {
        let flac = open_fixture(&[("ARTIST", "One"), ("ARTIST", "Two")], &[]);
        let tags = flac.read_tags(&["artist"]);
        assert_eq!(
            tags["artist"].as_text(),
            Some(&["One".to_string(), "Two".to_string()][..])
        );
    }

    #[test]
    fn test_covers_match_picture_blocks_exactly() {
        let pictures = sample_pictures();
        let flac = open_fixture(&[("TITLE", "Song")], &pictures);

        let tags = flac.read_tags(&["title", COVER_TAG]);
        let covers = tags[COVER_TAG].as_covers().expect("cover field present");

        assert_eq!(covers.len(), pictures.len());
        for (cover, picture) in covers.iter().zip(&pictures) {
            assert_eq!(cover.kind, picture.kind);
            assert_eq!(cover.description, picture.description);
            assert_eq!(cover.mime, picture.mime);
            assert_eq!(cover.data, picture.data);
        }
    }

    #[test]
    fn test_cover_only_read_when_requested() {
        let flac = open_fixture(&[("TITLE", "Song")], &sample_pictures());
        let tags = flac.read_tags(&["title"]);
        assert!(!tags.contains_key(COVER_TAG));
    }

    #[test]
    fn test_cover_request_without_pictures_yields_empty_list() {
        let flac = open_fixture(&[("TITLE", "Song")], &[]);
        let tags = flac.read_tags(&[COVER_TAG]);
        assert_eq!(tags[COVER_TAG].as_covers(), Some(&[][..]));
    }

    #[test]
    fn test_bitrate_is_always_unavailable() {
        let flac = open_fixture(&[("TITLE", "Song")], &[]);
        assert_eq!(flac.bitrate(), Bitrate::Unavailable);
    }

    #[test]
    fn test_length_comes_from_stream_info() {
        let flac = open_fixture(&[], &[]);
        assert_eq!(flac.length(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_read_all_uses_internal_names() {
        let flac = open_fixture(&[("TEMPO", "90"), ("Album", "Blue")], &[]);
        let tags = flac.read_all();
        let names: Vec<&str> = tags.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["album", "bpm"]);
    }

    #[test]
    fn test_write_tag_stores_text_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_flac_fixture(dir.path(), &[("TITLE", "Old")], &sample_pictures());

        let mut flac = FlacFormat::open(&path).unwrap();
        flac.write_tag("title", vec!["New".into()]).unwrap();
        flac.write_tag("bpm", vec![TagValue::from(140u32)]).unwrap();
        flac.save().unwrap();

        let reopened = FlacFormat::open(&path).unwrap();
        let tags = reopened.read_tags(&["title", "bpm", COVER_TAG]);
        assert_eq!(tags["title"].as_text(), Some(&["New".to_string()][..]));
        assert_eq!(tags["bpm"].as_text(), Some(&["140".to_string()][..]));
        assert_eq!(reopened.raw_values("TEMPO"), vec!["140".to_string()]);
        assert_eq!(tags[COVER_TAG].as_covers().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_write_empty_values_deletes_tag() {
        let mut flac = open_fixture(&[("GENRE", "Jazz"), ("TITLE", "Song")], &[]);
        flac.write_tag("genre", Vec::new()).unwrap();
        let tags = flac.read_tags(&["genre", "title"]);
        assert!(!tags.contains_key("genre"));
        assert!(tags.contains_key("title"));
    }

    #[test]
    fn test_write_rejects_invalid_field_names() {
        let mut flac = open_fixture(&[("TITLE", "Song")], &[]);
        for name in ["künstler", "a=b", "", "x~y"] {
            let result = flac.write_tag(name, vec!["X".into()]);
            assert!(
                matches!(result, Err(Error::InvalidTagName(ref key)) if key == name),
                "{name:?} should be rejected"
            );
        }
        assert_eq!(flac.read_all().len(), 1);
        assert!(flac.write_tag("replaygain_track_gain", vec!["-6 dB".into()]).is_ok());
    }

    #[test]
    fn test_save_without_path_is_rejected() {
        let mut flac = open_fixture(&[], &[]);
        assert!(matches!(flac.save(), Err(Error::Io(_))));
    }

    #[test]
    fn test_corrupt_data_surfaces_tag_error() {
        let result = FlacFormat::from_reader(&mut Cursor::new(b"not a flac file".to_vec()));
        assert!(matches!(result, Err(Error::Tag(_))));
    }
}
