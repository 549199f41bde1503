use std::path::PathBuf;

use lofty::error::LoftyError;
use thiserror::Error;

use crate::tags::Field;

/// Everything that can go wrong while reconciling or batch-editing tags.
///
/// Each variant is local to the smallest unit it affects (one file, one
/// field, one line); callers report it and move on to the next item.
#[derive(Debug, Error)]
pub enum TagmendError {
    #[error("cannot read tags from {}: {source}", path.display())]
    UnreadableFile { path: PathBuf, source: LoftyError },

    #[error("cannot write tags to {}: {source}", path.display())]
    Write { path: PathBuf, source: LoftyError },

    #[error("bad record (expected 5 tab-separated fields, got {fields}): {line:?}")]
    MalformedRecord { line: String, fields: usize },

    #[error("track number {value:?} in {} is not numeric", path.display())]
    TrackNumber { path: PathBuf, value: String },

    #[error("value for '{field}' in {} has multiples", path.display())]
    MultiValue { path: PathBuf, field: Field },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
