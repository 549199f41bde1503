//! Share metadata tags between audio files in a directory.
//!
//! Fixes songs that lack metadata but sit next to other tracks of the same
//! album that have it. Run with `--dry-run` first to see what would change.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use tagmend::naming::NameFormat;
use tagmend::share::{share_tree, Policy, ShareOptions};

#[derive(Parser, Debug)]
#[command(name = "share_tags", version, about = "Share tags between files in a directory")]
struct Args {
    /// Directory to reconcile tags in (its immediate subdirectories are
    /// processed as independent groups)
    directory: PathBuf,

    /// Make no changes, only report what would be written
    #[arg(short, long)]
    dry_run: bool,

    /// On conflicting values, write the agreeing tags anyway instead of
    /// skipping the whole directory
    #[arg(short, long)]
    loose: bool,

    /// How to guess a title for files missing one
    #[arg(short, long, value_enum, default_value = "plain")]
    name_format: NameFormat,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let opts = ShareOptions {
        policy: if args.loose { Policy::Loose } else { Policy::Strict },
        name_format: args.name_format,
        dry_run: args.dry_run,
    };
    share_tree(&args.directory, &opts)
}
