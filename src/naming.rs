use clap::ValueEnum;

/// How to guess a title from a file name when the tag has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NameFormat {
    /// `Song.mp3` -> `Song`
    Plain,
    /// `03 Song.mp3` -> `Song` (fixed 3-character track prefix)
    Numbered,
}

/// Derive a title from a file name alone; never consults the tags.
///
/// The result may be empty (name shorter than the numbered prefix, or
/// nothing left after the extension). That is returned as-is so the caller
/// can log it; nothing substitutes a default.
pub fn infer_title(file_name: &str, format: NameFormat) -> String {
    let stem = match file_name.rfind('.') {
        Some(dot) => &file_name[..dot],
        None => file_name,
    };
    match format {
        NameFormat::Plain => stem.to_string(),
        NameFormat::Numbered => stem.chars().skip(3).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_strips_the_extension() {
        assert_eq!(infer_title("Song.mp3", NameFormat::Plain), "Song");
    }

    #[test]
    fn numbered_also_strips_the_track_prefix() {
        assert_eq!(infer_title("03 Song.mp3", NameFormat::Numbered), "Song");
        assert_eq!(infer_title("10-Song.flac", NameFormat::Numbered), "Song");
    }

    #[test]
    fn last_dot_wins_for_the_extension() {
        assert_eq!(infer_title("Mr. Blue Sky.ogg", NameFormat::Plain), "Mr. Blue Sky");
    }

    #[test]
    fn no_extension_keeps_the_whole_name() {
        assert_eq!(infer_title("Song", NameFormat::Plain), "Song");
    }

    #[test]
    fn short_names_produce_an_empty_title() {
        assert_eq!(infer_title("01.mp3", NameFormat::Numbered), "");
    }

    #[test]
    fn prefix_strip_counts_characters_not_bytes() {
        assert_eq!(infer_title("０３ Lied.mp3", NameFormat::Numbered), "Lied");
    }
}
