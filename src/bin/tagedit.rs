//! Generate a TSV file with metadata tags for mp3/ogg/flac files, or apply
//! tags from such a file back to the files it references.
//!
//! Expected usage:
//!
//! ```text
//! tagedit -d DIR -o tags.tsv
//! # edit tags.tsv to the desired values
//! tagedit -a tags.tsv
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};

use tagmend::records::{apply, export};

#[derive(Parser, Debug)]
#[command(
    name = "tagedit",
    version,
    about = "Generate and apply TSV files to edit metadata tags on mp3/ogg/flac files",
    group = ArgGroup::new("mode").required(true)
)]
struct Args {
    /// Directory to scan
    #[arg(short, long, group = "mode")]
    directory: Option<PathBuf>,

    /// Recurse into subdirectories when scanning
    #[arg(short, long, requires = "directory")]
    recurse: bool,

    /// Location of the TSV output file; stdout when not given
    #[arg(short, long)]
    output_file: Option<PathBuf>,

    /// TSV file to apply metadata changes from
    #[arg(short, long, group = "mode")]
    apply: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    if let Some(directory) = args.directory {
        match args.output_file {
            Some(path) => {
                let file = File::create(&path)
                    .with_context(|| format!("cannot create {}", path.display()))?;
                let mut out = BufWriter::new(file);
                export(&directory, args.recurse, &mut out)?;
                out.flush()?;
            }
            None => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                export(&directory, args.recurse, &mut out)?;
            }
        }
    } else if let Some(batch) = args.apply {
        apply(&batch)?;
    }
    Ok(())
}
