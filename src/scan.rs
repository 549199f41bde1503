use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Suffixes recognized as audio files. Case-sensitive on purpose: the
/// library convention is lowercase extensions, anything else gets fixed
/// before tagging.
pub const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".ogg", ".flac"];

/// The files belonging to one directory, in walk order.
#[derive(Debug)]
pub struct DirGroup {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Group files by directory. Non-recursive: exactly one group, the root.
/// Recursive: one group per directory in tree order, root first.
///
/// No extension filtering happens here; callers that only want audio files
/// apply `is_audio_file` themselves, so the same walk serves non-audio
/// consumers too.
pub fn collect(root: &Path, recurse: bool) -> io::Result<Vec<DirGroup>> {
    let mut groups: Vec<DirGroup> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    let max_depth = if recurse { usize::MAX } else { 1 };
    for entry in WalkDir::new(root).max_depth(max_depth).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            if !recurse && entry.depth() > 0 {
                continue;
            }
            index.insert(entry.path().to_path_buf(), groups.len());
            groups.push(DirGroup {
                dir: entry.into_path(),
                files: Vec::new(),
            });
        } else if let Some(i) = entry.path().parent().and_then(|p| index.get(p)) {
            let i = *i;
            groups[i].files.push(entry.into_path());
        }
    }

    Ok(groups)
}

/// First-level subdirectories of `root`, sorted by name.
pub fn immediate_subdirs(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

pub fn is_audio_file(path: &Path, extensions: &[&str]) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| extensions.iter().any(|ext| name.ends_with(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    fn tree() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("b.mp3"));
        touch(&tmp.path().join("a.mp3"));
        touch(&tmp.path().join("notes.txt"));
        fs::create_dir(tmp.path().join("sub")).unwrap();
        touch(&tmp.path().join("sub").join("c.flac"));
        tmp
    }

    #[test]
    fn non_recursive_yields_only_the_root_group() {
        let tmp = tree();
        let groups = collect(tmp.path(), false).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].dir, tmp.path());
        let names: Vec<_> = groups[0]
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a.mp3", "b.mp3", "notes.txt"]);
    }

    #[test]
    fn recursive_yields_root_then_subdirectories() {
        let tmp = tree();
        let groups = collect(tmp.path(), true).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].dir, tmp.path());
        assert_eq!(groups[1].dir, tmp.path().join("sub"));
        assert_eq!(groups[1].files, [tmp.path().join("sub").join("c.flac")]);
    }

    #[test]
    fn collector_does_not_filter_extensions() {
        let tmp = tree();
        let groups = collect(tmp.path(), false).unwrap();
        assert!(groups[0]
            .files
            .iter()
            .any(|p| p.file_name().unwrap() == "notes.txt"));
    }

    #[test]
    fn immediate_subdirs_lists_first_level_only() {
        let tmp = tree();
        fs::create_dir(tmp.path().join("sub").join("nested")).unwrap();
        let dirs = immediate_subdirs(tmp.path()).unwrap();
        assert_eq!(dirs, [tmp.path().join("sub")]);
    }

    #[test]
    fn audio_filter_is_case_sensitive() {
        assert!(is_audio_file(Path::new("song.mp3"), AUDIO_EXTENSIONS));
        assert!(is_audio_file(Path::new("song.flac"), AUDIO_EXTENSIONS));
        assert!(!is_audio_file(Path::new("song.MP3"), AUDIO_EXTENSIONS));
        assert!(!is_audio_file(Path::new("song.wav"), AUDIO_EXTENSIONS));
    }
}
