use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::naming::{infer_title, NameFormat};
use crate::scan::{self, AUDIO_EXTENSIONS};
use crate::tags::{Field, TagFile, TagSet};

/// What to do with a group when two files disagree on a shared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Any conflict voids the whole group: nothing is written.
    Strict,
    /// Only the conflicting field is skipped; the rest still applies.
    Loose,
}

/// Outcome of consensus resolution for one directory group.
#[derive(Debug)]
pub struct Resolution {
    /// Agreed value per shared field. Fields absent from every file have no
    /// entry; conflicted fields are excluded.
    pub consensus: BTreeMap<Field, Vec<String>>,
    pub conflicts: BTreeSet<Field>,
    /// Strict policy only: a conflict was found, the caller must not write.
    pub aborted: bool,
}

/// Compute per-field consensus across a group's tag sets.
///
/// First non-empty value sequence seen for a field becomes the candidate;
/// any later differing sequence (full-sequence comparison, order matters)
/// conflicts. Fields are independent: one algorithm, parameterized by the
/// policy, no early branching per mode beyond the abort.
pub fn resolve(group: &[(PathBuf, TagSet)], fields: &[Field], policy: Policy) -> Resolution {
    let mut consensus: BTreeMap<Field, Vec<String>> = BTreeMap::new();
    let mut conflicts: BTreeSet<Field> = BTreeSet::new();

    for (path, tags) in group {
        for &field in fields {
            let Some(values) = tags.get(&field) else {
                continue;
            };
            // An empty value sequence counts as absent
            if values.is_empty() {
                continue;
            }
            match consensus.get(&field) {
                None => {
                    if !conflicts.contains(&field) {
                        consensus.insert(field, values.clone());
                    }
                }
                Some(recorded) if recorded != values => {
                    warn!(
                        "{field} does not match in {} ({recorded:?} and {values:?})",
                        path.display()
                    );
                    conflicts.insert(field);
                    if policy == Policy::Strict {
                        return Resolution {
                            consensus: BTreeMap::new(),
                            conflicts,
                            aborted: true,
                        };
                    }
                    consensus.remove(&field);
                }
                Some(_) => {}
            }
        }
    }

    Resolution {
        consensus,
        conflicts,
        aborted: false,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ShareOptions {
    pub policy: Policy,
    pub name_format: NameFormat,
    /// Report every write instead of performing it.
    pub dry_run: bool,
}

/// Share tags across the root directory and each of its immediate
/// subdirectories, every directory an independent group. Deliberately one
/// level deep, unlike the edit workflow's full recursive walk.
pub fn share_tree(root: &Path, opts: &ShareOptions) -> Result<()> {
    share_directory(root, opts)?;
    let subdirs = scan::immediate_subdirs(root)
        .with_context(|| format!("failed to list subdirectories of {}", root.display()))?;
    for dir in subdirs {
        if let Err(e) = share_directory(&dir, opts) {
            warn!("skipping directory {}: {e:#}", dir.display());
        }
    }
    Ok(())
}

/// Reconcile one directory: infer missing titles, then write the consensus
/// value of every agreeing shared field to every file.
pub fn share_directory(dir: &Path, opts: &ShareOptions) -> Result<()> {
    let mut groups = scan::collect(dir, false)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;
    let files: Vec<PathBuf> = groups
        .pop()
        .map(|g| g.files)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| scan::is_audio_file(p, AUDIO_EXTENSIONS))
        .collect();

    // Pass 1: titles first, independent of consensus. A file that cannot be
    // parsed is dropped from the group, not fatal to it.
    let mut group: Vec<(PathBuf, TagSet)> = Vec::new();
    for path in &files {
        let mut file = match TagFile::open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("skipping {e}");
                continue;
            }
        };
        if file.get(Field::Title).is_empty() {
            let local = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();
            let guess = infer_title(local, opts.name_format);
            info!("guessing {guess:?} for {local:?}");
            if opts.dry_run {
                info!("would set title on {}", path.display());
            } else {
                file.set_one(Field::Title, &guess);
                if let Err(e) = file.save() {
                    warn!("{e}");
                }
            }
        }
        group.push((path.clone(), file.read_all()));
    }

    let resolution = resolve(&group, &Field::SHARED, opts.policy);
    if resolution.aborted {
        warn!("conflicting tags in {}, directory skipped", dir.display());
        return Ok(());
    }
    if !resolution.conflicts.is_empty() {
        let skipped: Vec<&str> = resolution.conflicts.iter().map(|f| f.name()).collect();
        warn!("for {}, not writing tags {skipped:?}", dir.display());
    }
    if resolution.consensus.is_empty() {
        return Ok(());
    }

    // Pass 2: apply the consensus to every file in the group.
    for (path, _) in &group {
        if opts.dry_run {
            for (field, values) in &resolution.consensus {
                info!("would set {field}={values:?} on {}", path.display());
            }
            continue;
        }
        let mut file = match TagFile::open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("skipping {e}");
                continue;
            }
        };
        for (field, values) in &resolution.consensus {
            file.set(*field, values);
        }
        if let Err(e) = file.save() {
            warn!("{e}");
        }
    }

    Ok(())
}
