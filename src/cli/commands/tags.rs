//! Tag reading, writing and cover export commands.

use anyhow::{Context, bail};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::metadata::{self, COVER_TAG, CoverImage, FieldValue, TagMap, TagValue};

/// Read tags from an audio file
pub fn cmd_tags(path: &Path, tags: &[String], json: bool) -> anyhow::Result<()> {
    let format =
        metadata::open(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let values = if tags.is_empty() {
        format.read_all()
    } else {
        let names: Vec<&str> = tags.iter().map(String::as_str).collect();
        format.read_tags(&names)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tags_to_json(&values))?);
        return Ok(());
    }

    if values.is_empty() {
        println!("No tags found in {}", path.display());
    }
    for (name, value) in &values {
        match value {
            FieldValue::Text(texts) => println!("{name}: {}", texts.join(" / ")),
            FieldValue::Covers(covers) => {
                for cover in covers {
                    println!(
                        "{name}: type {} {} ({} bytes) {}",
                        cover.kind,
                        cover.mime,
                        cover.data.len(),
                        cover.description
                    );
                }
            }
        }
    }
    if let Some(length) = format.length() {
        println!("length: {}", crate::model::format_length(length));
    }
    println!("bitrate: {}", format.bitrate());
    Ok(())
}

/// Replace a tag's values in an audio file
pub fn cmd_set_tag(path: &Path, tag: &str, values: &[String]) -> anyhow::Result<()> {
    if tag == COVER_TAG {
        bail!("Covers can't be written from the command line");
    }

    let mut format =
        metadata::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if !format.writable() {
        bail!("{} is read-only", path.display());
    }

    let values: Vec<TagValue> = values.iter().map(|value| TagValue::from(value.as_str())).collect();
    let deleted = values.is_empty();
    format.write_tag(tag, values)?;
    format
        .save()
        .with_context(|| format!("Failed to save {}", path.display()))?;

    if deleted {
        info!(tag, path = %path.display(), "Deleted tag");
        println!("Deleted {tag}");
    } else {
        info!(tag, path = %path.display(), "Wrote tag");
        println!("Wrote {tag}");
    }
    Ok(())
}

/// Export embedded cover images
pub fn cmd_covers(path: &Path, output: &Path) -> anyhow::Result<()> {
    let format =
        metadata::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let tags = format.read_tags(&[COVER_TAG]);
    let covers = tags
        .get(COVER_TAG)
        .and_then(FieldValue::as_covers)
        .unwrap_or_default();

    if covers.is_empty() {
        println!("No embedded covers in {}", path.display());
        return Ok(());
    }

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    for (index, cover) in covers.iter().enumerate() {
        let target = cover_file_name(output, index, cover);
        std::fs::write(&target, &cover.data)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        println!("{}", target.display());
    }
    info!(count = covers.len(), "Exported covers");
    Ok(())
}

fn cover_file_name(dir: &Path, index: usize, cover: &CoverImage) -> PathBuf {
    let extension = match cover.mime.as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        _ => "bin",
    };
    dir.join(format!("cover-{index}-type{}.{extension}", cover.kind))
}

fn tags_to_json(values: &TagMap) -> Value {
    let mut object = Map::new();
    for (name, value) in values {
        let entry = match value {
            FieldValue::Text(texts) => json!(texts.as_slice()),
            FieldValue::Covers(covers) => Value::Array(
                covers
                    .iter()
                    .map(|cover| {
                        json!({
                            "type": cover.kind,
                            "mime": cover.mime,
                            "description": cover.description,
                            "size": cover.data.len(),
                        })
                    })
                    .collect(),
            ),
        };
        object.insert(name.clone(), entry);
    }
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FixturePicture, write_flac_fixture};
    use tempfile::TempDir;

    fn picture() -> FixturePicture {
        FixturePicture {
            kind: 3,
            mime: "image/png",
            description: "front",
            data: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn test_tags_to_json() {
        let dir = TempDir::new().unwrap();
        let path = write_flac_fixture(
            dir.path(),
            &[("TITLE", "Song"), ("ARTIST", "A"), ("ARTIST", "B")],
            &[picture()],
        );
        let format = metadata::open(&path).unwrap();
        let json = tags_to_json(&format.read_tags(&["title", "artist", COVER_TAG]));

        assert_eq!(json["title"], json!(["Song"]));
        assert_eq!(json["artist"], json!(["A", "B"]));
        assert_eq!(json[COVER_TAG][0]["mime"], "image/png");
        assert_eq!(json[COVER_TAG][0]["size"], 4);
    }

    #[test]
    fn test_set_tag_writes_and_deletes() {
        let dir = TempDir::new().unwrap();
        let path = write_flac_fixture(dir.path(), &[("DESCRIPTION", "old")], &[]);

        cmd_set_tag(&path, "bpm", &["128".to_string()]).unwrap();
        cmd_set_tag(&path, "comment", &[]).unwrap();

        let format = metadata::open(&path).unwrap();
        let tags = format.read_tags(&["bpm", "comment"]);
        assert_eq!(tags["bpm"].as_text(), Some(&["128".to_string()][..]));
        assert!(!tags.contains_key("comment"));
    }

    #[test]
    fn test_set_tag_with_invalid_name_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_flac_fixture(dir.path(), &[("TITLE", "Song")], &[]);
        assert!(cmd_set_tag(&path, "künstler", &["X".to_string()]).is_err());

        let format = metadata::open(&path).unwrap();
        assert_eq!(format.read_all().keys().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn test_set_tag_refuses_covers() {
        let dir = TempDir::new().unwrap();
        let path = write_flac_fixture(dir.path(), &[], &[]);
        assert!(cmd_set_tag(&path, COVER_TAG, &["x".to_string()]).is_err());
    }

    #[test]
    fn test_covers_exported_to_directory() {
        let dir = TempDir::new().unwrap();
        let path = write_flac_fixture(dir.path(), &[], &[picture()]);
        let output = dir.path().join("covers");

        cmd_covers(&path, &output).unwrap();

        let written = std::fs::read(output.join("cover-0-type3.png")).unwrap();
        assert_eq!(written, picture().data);
    }

    #[test]
    fn test_unsupported_extension_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, b"ID3").unwrap();
        let err = cmd_tags(&path, &[], false).unwrap_err();
        assert!(err.to_string().contains("song.mp3"));
    }
}
