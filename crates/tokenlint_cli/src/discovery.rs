//! Document discovery.
//!
//! Patterns name files, directories, or globs. Directories and globs are
//! walked with `ignore::WalkBuilder`, so `.gitignore` files and hidden-file
//! filtering apply, plus any ignore files named in the configuration.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use miette::{IntoDiagnostic, Result, miette};
use tokenlint_ast::kind_from_path;
use tracing::{debug, info, warn};

/// Files to lint and the ignore files that shaped the walk.
#[derive(Debug, Default)]
pub struct Discovered {
    /// Absolute paths, sorted and de-duplicated.
    pub files: Vec<PathBuf>,
    /// Ignore files that were found and applied.
    pub ignore_files: Vec<String>,
}

/// Resolves configured ignore file names against `base_dir`, keeping the
/// ones that exist.
pub fn resolve_ignore_files(base_dir: &Path, names: &[String]) -> Vec<PathBuf> {
    names
        .iter()
        .filter_map(|name| {
            let path = base_dir.join(name);
            match path.canonicalize() {
                Ok(abs) if abs.is_file() => Some(abs),
                _ => {
                    debug!("Ignore file not found: {}", path.display());
                    None
                }
            }
        })
        .collect()
}

/// Expands `patterns` into document paths.
///
/// Explicit files are always kept. Files found by walking a directory or
/// matching a glob are kept only when their extension is in `kinds`. Globs
/// are matched relative to `root`.
pub fn discover(
    patterns: &[String],
    root: &Path,
    ignore_files: &[PathBuf],
    kinds: &[String],
) -> Result<Discovered> {
    let supported = |path: &Path| kinds.contains(&kind_from_path(path));
    let mut files = Vec::new();
    let mut globs = GlobSetBuilder::new();
    let mut has_globs = false;

    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.canonicalize().into_diagnostic()?);
        } else if path.is_dir() {
            let dir = path.canonicalize().into_diagnostic()?;
            files.extend(walk(&dir, ignore_files).filter(|p| supported(p.as_path())));
        } else {
            let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
            let glob = Glob::new(pattern)
                .map_err(|e| miette!("Invalid pattern '{}': {}", pattern, e))?;
            globs.add(glob);
            has_globs = true;
        }
    }

    if has_globs {
        let set = globs
            .build()
            .map_err(|e| miette!("Failed to build globset: {}", e))?;
        let root = root.canonicalize().into_diagnostic()?;
        files.extend(
            walk(&root, ignore_files)
                .filter(|p| matches(&set, &root, p))
                .filter(|p| supported(p.as_path())),
        );
    }

    files.sort();
    files.dedup();

    info!("Discovered {} files to lint", files.len());
    Ok(Discovered {
        files,
        ignore_files: ignore_files
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    })
}

fn matches(set: &GlobSet, root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    set.is_match(relative) || set.is_match(path)
}

fn walk(root: &Path, ignore_files: &[PathBuf]) -> impl Iterator<Item = PathBuf> {
    let mut builder = WalkBuilder::new(root);
    builder.require_git(false);
    for file in ignore_files {
        if let Some(e) = builder.add_ignore(file) {
            warn!("Failed to read ignore file {}: {}", file.display(), e);
        }
    }

    builder
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.into_path())
}
