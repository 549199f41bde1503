//! Reconcile and batch-edit metadata tags on a personal music library.
//!
//! Two workflows over directory trees of mp3/ogg/flac files:
//!
//! - `share_tags`: per directory, infer missing titles from file names and
//!   copy the agreed album/artist/albumartist/genre/date values onto every
//!   file, reporting conflicts instead of guessing.
//! - `tagedit`: export one tab-separated record per file for hand editing,
//!   then apply the edited file back to the tags.
//!
//! All tag access goes through [`tags::TagFile`]; the exchange format lives
//! in [`records`].

pub mod error;
pub mod naming;
pub mod records;
pub mod scan;
pub mod share;
pub mod tags;
