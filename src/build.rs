use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use tracing::{debug, info, warn};

use crate::engine::Engine;
use crate::error::{TempleError, TempleResult};
use crate::interface::Context;
use crate::loader::FileLoader;

/// Inputs for a batch [`build`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildConfig {
    /// Directory scanned for templates.
    pub source_root: PathBuf,
    /// Glob matched against paths relative to `source_root`, e.g. `**/*.html`.
    pub pattern: String,
    /// Directory receiving the rendered files, mirroring the source layout.
    pub output_dir: PathBuf,
    #[cfg_attr(feature = "serde", serde(default))]
    pub variables: Context,
}

/// A source file that could not be compiled or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFailure {
    pub path: PathBuf,
    pub error: TempleError,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildReport {
    /// Output files written, in walk order.
    pub written: Vec<PathBuf>,
    pub failed: Vec<BuildFailure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Compiles every template under `config.source_root` matching
/// `config.pattern` and writes each root buffer to the mirrored path under
/// `config.output_dir`.
///
/// Files are visited in sorted order. A file that fails is recorded in the
/// report and the remaining files are still built.
///
/// # Errors
///
/// * `TempleError::Pattern` - If the glob is invalid
/// * `TempleError::Io` - If the source tree cannot be read
pub fn build(config: &BuildConfig) -> TempleResult<BuildReport> {
    let matcher = Glob::new(&config.pattern)
        .map_err(|error| TempleError::Pattern {
            pattern: config.pattern.clone(),
            message: error.to_string(),
        })?
        .compile_matcher();

    let skip = std::fs::canonicalize(&config.output_dir).ok();
    let mut files = Vec::new();
    let mut visited_dirs = HashSet::new();
    collect_files(
        &config.source_root,
        &config.source_root,
        &matcher,
        skip.as_deref(),
        &mut files,
        &mut visited_dirs,
    )?;
    files.sort();
    debug!(count = files.len(), pattern = %config.pattern, "collected templates");

    let engine = Engine::new(FileLoader::new());
    let mut report = BuildReport::default();

    for relative in files {
        let source = config.source_root.join(&relative);
        let target = config.output_dir.join(&relative);

        match build_one(&engine, &source, &target, &config.variables) {
            Ok(()) => {
                info!(source = %source.display(), target = %target.display(), "wrote template");
                report.written.push(target);
            }
            Err(error) => {
                warn!(source = %source.display(), %error, "failed to build template");
                report.failed.push(BuildFailure {
                    path: source,
                    error,
                });
            }
        }
    }

    Ok(report)
}

fn build_one(
    engine: &Engine<FileLoader>,
    source: &Path,
    target: &Path,
    variables: &Context,
) -> TempleResult<()> {
    let buffers = engine.compile(&source.display().to_string(), Some(variables))?;

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|error| TempleError::io(parent, &error))?;
    }
    std::fs::write(target, buffers.root()).map_err(|error| TempleError::io(target, &error))
}

/// Pushes paths, relative to `root`, of matching files below `dir`.
///
/// Directories are tracked by canonical path, so a symlink leading back into
/// the walked tree is visited once.
fn collect_files(
    root: &Path,
    dir: &Path,
    matcher: &GlobMatcher,
    skip: Option<&Path>,
    files: &mut Vec<PathBuf>,
    visited_dirs: &mut HashSet<PathBuf>,
) -> TempleResult<()> {
    let canonical = std::fs::canonicalize(dir).map_err(|error| TempleError::io(dir, &error))?;
    if !visited_dirs.insert(canonical) {
        warn!(path = %dir.display(), "skipping directory already visited through a symlink");
        return Ok(());
    }

    let entries = std::fs::read_dir(dir).map_err(|error| TempleError::io(dir, &error))?;

    for entry in entries {
        let path = entry.map_err(|error| TempleError::io(dir, &error))?.path();

        if path.is_dir() {
            // Output written inside the source tree is not a template.
            if skip.is_some_and(|skip| std::fs::canonicalize(&path).is_ok_and(|p| p == skip)) {
                continue;
            }
            collect_files(root, &path, matcher, skip, files, visited_dirs)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            if matcher.is_match(relative) {
                files.push(relative.to_path_buf());
            }
        }
    }

    Ok(())
}
