use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::error::TagmendError;
use crate::scan::{self, AUDIO_EXTENSIONS};
use crate::tags::{Field, TagFile};

/// The editable data for one file and where the file lives. The path is the
/// record's identity within a batch; nothing persists beyond it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub path: String,
    pub number: String,
    pub title: String,
    pub artist: String,
    pub album: String,
}

/// One exchange line: five tab-separated fields, fixed order artist, album,
/// number, title, path. Values containing tabs or newlines are out of
/// contract and are not escaped.
pub fn encode(record: &Record) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        record.artist, record.album, record.number, record.title, record.path
    )
}

pub fn decode(line: &str) -> Result<Record, TagmendError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 5 {
        return Err(TagmendError::MalformedRecord {
            line: line.to_string(),
            fields: fields.len(),
        });
    }
    Ok(Record {
        artist: fields[0].to_string(),
        album: fields[1].to_string(),
        number: fields[2].to_string(),
        title: fields[3].to_string(),
        path: fields[4].to_string(),
    })
}

fn field_or_placeholder(file: &TagFile, field: Field) -> Result<String, TagmendError> {
    // Absent fields export as a placeholder; only multi-value fields reject
    // the record. The asymmetry is deliberate.
    Ok(file
        .get_single(field)?
        .unwrap_or_else(|| format!("unknown_{field}")))
}

/// Build the editable record for one audio file.
pub fn read_record(path: &Path) -> Result<Record, TagmendError> {
    let file = TagFile::open(path)?;
    Ok(Record {
        path: path.to_string_lossy().into_owned(),
        number: field_or_placeholder(&file, Field::TrackNumber)?,
        title: field_or_placeholder(&file, Field::Title)?,
        artist: field_or_placeholder(&file, Field::Artist)?,
        album: field_or_placeholder(&file, Field::Album)?,
    })
}

/// Order a directory's records by numeric track number, ascending and
/// stable. Records with a non-numeric number are reported and dropped.
fn order_by_track(records: Vec<Record>) -> Vec<Record> {
    let mut keyed: Vec<(u32, Record)> = Vec::new();
    for record in records {
        match record.number.parse::<u32>() {
            Ok(number) => keyed.push((number, record)),
            Err(_) => warn!(
                "{}",
                TagmendError::TrackNumber {
                    path: PathBuf::from(&record.path),
                    value: record.number.clone(),
                }
            ),
        }
    }
    keyed.sort_by_key(|(number, _)| *number);
    keyed.into_iter().map(|(_, record)| record).collect()
}

/// Export one line per audio file under `root` to the sink, each directory's
/// records sorted by track number. Per-file failures are reported and leave
/// the rest of the batch alone.
pub fn export<W: Write>(root: &Path, recurse: bool, out: &mut W) -> Result<()> {
    let groups = scan::collect(root, recurse)
        .with_context(|| format!("failed to scan {}", root.display()))?;
    for group in groups {
        let mut records = Vec::new();
        for path in group
            .files
            .iter()
            .filter(|p| scan::is_audio_file(p, AUDIO_EXTENSIONS))
        {
            match read_record(path) {
                Ok(record) => records.push(record),
                Err(e) => warn!("skipping record: {e}"),
            }
        }
        for record in order_by_track(records) {
            writeln!(out, "{}", encode(&record))?;
        }
    }
    Ok(())
}

fn apply_record(record: &Record) -> Result<(), TagmendError> {
    let mut file = TagFile::open(Path::new(&record.path))?;
    file.set_one(Field::Artist, &record.artist);
    file.set_one(Field::Album, &record.album);
    file.set_one(Field::TrackNumber, &record.number);
    file.set_one(Field::Title, &record.title);
    file.save()
}

/// Apply an edited batch file back to the files it names. Malformed lines
/// and write failures are reported and skipped; the batch always runs to
/// the end.
pub fn apply(batch: &Path) -> Result<()> {
    let file = File::open(batch)
        .with_context(|| format!("cannot open batch file {}", batch.display()))?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        match decode(&line) {
            Ok(record) => match apply_record(&record) {
                Ok(()) => info!(
                    "updated '{}' #{} by '{}' {}",
                    record.album, record.number, record.artist, record.title
                ),
                Err(e) => warn!("{e}"),
            },
            Err(e) => warn!("{e}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(number: &str, title: &str) -> Record {
        Record {
            path: format!("/music/{title}.mp3"),
            number: number.to_string(),
            title: title.to_string(),
            artist: "Ann".to_string(),
            album: "X".to_string(),
        }
    }

    #[test]
    fn encode_uses_the_fixed_field_order() {
        let r = record("03", "Song");
        assert_eq!(encode(&r), "Ann\tX\t03\tSong\t/music/Song.mp3");
    }

    #[test]
    fn round_trip_preserves_tab_free_records() {
        let r = record("7", "A song. with, punctuation");
        assert_eq!(decode(&encode(&r)).unwrap(), r);
    }

    #[test]
    fn wrong_field_counts_are_malformed() {
        for line in ["a\tb\tc\td", "a\tb\tc\td\te\tf", "", "plain text"] {
            match decode(line) {
                Err(TagmendError::MalformedRecord { .. }) => {}
                other => panic!("expected MalformedRecord for {line:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn five_fields_always_decode() {
        let r = decode("\t\t\t\t").unwrap();
        assert_eq!(r.artist, "");
        assert_eq!(r.path, "");
    }

    #[test]
    fn ordering_is_numeric_ascending() {
        let out = order_by_track(vec![record("02", "b"), record("01", "a")]);
        let numbers: Vec<_> = out.iter().map(|r| r.number.as_str()).collect();
        assert_eq!(numbers, ["01", "02"]);
    }

    #[test]
    fn ordering_is_stable_on_ties() {
        let out = order_by_track(vec![record("1", "first"), record("1", "second")]);
        let titles: Vec<_> = out.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
    }

    #[test]
    fn non_numeric_numbers_drop_only_their_record() {
        let out = order_by_track(vec![
            record("2", "kept"),
            record("unknown_tracknumber", "dropped"),
            record("1", "also kept"),
        ]);
        let titles: Vec<_> = out.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["also kept", "kept"]);
    }
}
