use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use lofty::config::WriteOptions;
use lofty::file::FileType;
use lofty::prelude::*;
use lofty::read_from_path;
use lofty::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};

use crate::error::TagmendError;

/// The tag fields the tool understands. Anything else present in a file's
/// tag is carried through saves untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Artist,
    Album,
    AlbumArtist,
    Genre,
    Date,
    Title,
    TrackNumber,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Artist,
        Field::Album,
        Field::AlbumArtist,
        Field::Genre,
        Field::Date,
        Field::Title,
        Field::TrackNumber,
    ];

    /// Fields expected to be identical across all files in one directory.
    pub const SHARED: [Field; 5] = [
        Field::Album,
        Field::Artist,
        Field::AlbumArtist,
        Field::Genre,
        Field::Date,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Artist => "artist",
            Field::Album => "album",
            Field::AlbumArtist => "albumartist",
            Field::Genre => "genre",
            Field::Date => "date",
            Field::Title => "title",
            Field::TrackNumber => "tracknumber",
        }
    }

    fn item_key(self) -> ItemKey {
        match self {
            Field::Artist => ItemKey::TrackArtist,
            Field::Album => ItemKey::AlbumTitle,
            Field::AlbumArtist => ItemKey::AlbumArtist,
            Field::Genre => ItemKey::Genre,
            Field::Date => ItemKey::RecordingDate,
            Field::Title => ItemKey::TrackTitle,
            Field::TrackNumber => ItemKey::TrackNumber,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of a file's known fields. A field may hold several values
/// (multiple genres, for instance); absent fields have no entry.
pub type TagSet = BTreeMap<Field, Vec<String>>;

/// One file's tag handle: read on open, writes buffered in memory until
/// `save`. Dropping without saving discards pending changes.
pub struct TagFile {
    path: PathBuf,
    tag: Tag,
    dirty: bool,
}

impl TagFile {
    pub fn open(path: &Path) -> Result<Self, TagmendError> {
        let mut tagged_file = read_from_path(path).map_err(|source| TagmendError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;

        // Remove ID3v1 to prevent player conflicts
        if tagged_file.tag(TagType::Id3v1).is_some() {
            tagged_file.remove(TagType::Id3v1);
        }

        let mut tag = match tagged_file.primary_tag() {
            Some(t) => t.clone(),
            None => match tagged_file.first_tag() {
                Some(t) => t.clone(),
                None => Tag::new(tagged_file.primary_tag_type()),
            },
        };

        // Force ID3v2 for MP3/AIFF
        if (tagged_file.file_type() == FileType::Mpeg || tagged_file.file_type() == FileType::Aiff)
            && tag.tag_type() != TagType::Id3v2
        {
            tag = Tag::new(TagType::Id3v2);
        }

        Ok(Self {
            path: path.to_path_buf(),
            tag,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All values for a field, in tag order. Empty when absent.
    pub fn get(&self, field: Field) -> Vec<String> {
        self.tag
            .get_strings(&field.item_key())
            .map(str::to_string)
            .collect()
    }

    /// The field's single value, `None` when absent, `MultiValue` when the
    /// field holds more than one.
    pub fn get_single(&self, field: Field) -> Result<Option<String>, TagmendError> {
        let mut values = self.get(field);
        match values.len() {
            0 => Ok(None),
            1 => Ok(values.pop()),
            _ => Err(TagmendError::MultiValue {
                path: self.path.clone(),
                field,
            }),
        }
    }

    pub fn read_all(&self) -> TagSet {
        let mut set = TagSet::new();
        for field in Field::ALL {
            let values = self.get(field);
            if !values.is_empty() {
                set.insert(field, values);
            }
        }
        set
    }

    /// Replace a field's value sequence. Buffered until `save`.
    pub fn set(&mut self, field: Field, values: &[String]) {
        let key = field.item_key();
        self.tag.remove_key(&key);
        for value in values {
            self.tag
                .push(TagItem::new(key.clone(), ItemValue::Text(value.clone())));
        }
        self.dirty = true;
    }

    pub fn set_one(&mut self, field: Field, value: &str) {
        self.set(field, &[value.to_string()]);
    }

    /// Persist buffered writes. A no-op when nothing changed.
    pub fn save(&mut self) -> Result<(), TagmendError> {
        if !self.dirty {
            return Ok(());
        }
        self.tag
            .save_to_path(&self.path, WriteOptions::default())
            .map_err(|source| TagmendError::Write {
                path: self.path.clone(),
                source,
            })?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_match_exchange_vocabulary() {
        assert_eq!(Field::TrackNumber.name(), "tracknumber");
        assert_eq!(Field::AlbumArtist.name(), "albumartist");
        assert_eq!(format!("unknown_{}", Field::Album), "unknown_album");
    }

    #[test]
    fn shared_fields_exclude_per_file_fields() {
        assert!(!Field::SHARED.contains(&Field::Title));
        assert!(!Field::SHARED.contains(&Field::TrackNumber));
        assert_eq!(Field::SHARED.len(), 5);
    }
}
