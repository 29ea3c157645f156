use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::GlobBuilder;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::ReflintError;
use crate::ReflintResult;
use crate::resolver::is_markdown_path;
use crate::resolver::path_to_slash;
use crate::scanner::has_ignored_segment;

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.is_file() {
		if let Some(error) = builder.add(&gitignore_path) {
			tracing::warn!("partially invalid {}: {error}", gitignore_path.display());
		}
	}
	builder.build().unwrap_or_else(|error| {
		tracing::warn!("ignoring {}: {error}", gitignore_path.display());
		Gitignore::empty()
	})
}

/// Recursively collect every markdown file under `root`, sorted.
///
/// Paths with a segment in `ignore_dirs` are skipped, and so are paths matched
/// by the root `.gitignore` unless `disable_gitignore` is set. Directories
/// reached twice through symlinks are visited once. Only a failure to read
/// `root` itself is an error; unreadable subdirectories are logged and
/// skipped.
pub fn discover_markdown_files(
	root: &Path,
	ignore_dirs: &[String],
	disable_gitignore: bool,
) -> ReflintResult<Vec<PathBuf>> {
	if !root.is_dir() {
		return Err(ReflintError::ProjectNotFound {
			path: root.display().to_string(),
		});
	}

	let gitignore = if disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};

	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();
	visited_dirs.insert(root.canonicalize().unwrap_or_else(|_| root.to_path_buf()));

	for entry in std::fs::read_dir(root)? {
		let path = entry?.path();
		visit(root, &path, ignore_dirs, &gitignore, &mut visited_dirs, &mut files);
	}

	files.sort();
	tracing::debug!(
		"discovered {} markdown file(s) under {}",
		files.len(),
		root.display()
	);
	Ok(files)
}

fn visit(
	root: &Path,
	path: &Path,
	ignore_dirs: &[String],
	gitignore: &Gitignore,
	visited_dirs: &mut HashSet<PathBuf>,
	files: &mut Vec<PathBuf>,
) {
	let relative = path.strip_prefix(root).unwrap_or(path);
	if has_ignored_segment(relative, ignore_dirs) {
		return;
	}

	let is_dir = path.is_dir();
	if gitignore.matched(path, is_dir).is_ignore() {
		return;
	}

	if !is_dir {
		if is_markdown_path(path) && path.is_file() {
			files.push(path.to_path_buf());
		}
		return;
	}

	// Detect symlink cycles by tracking canonical paths.
	let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
	if !visited_dirs.insert(canonical) {
		tracing::debug!("skipping symlinked directory {} (already visited)", path.display());
		return;
	}

	let entries = match std::fs::read_dir(path) {
		Ok(entries) => entries,
		Err(error) => {
			tracing::warn!("cannot read directory {}: {error}", path.display());
			return;
		}
	};

	for entry in entries.flatten() {
		visit(root, &entry.path(), ignore_dirs, gitignore, visited_dirs, files);
	}
}

/// Build a `GlobSet` from entry document patterns. Separators are literal, so
/// `*` never crosses a directory boundary.
pub fn build_document_globs(patterns: &[String]) -> ReflintResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = GlobBuilder::new(pattern)
			.literal_separator(true)
			.build()
			.map_err(|e| {
				ReflintError::InvalidPattern {
					pattern: pattern.clone(),
					reason: e.to_string(),
				}
			})?;
		builder.add(glob);
	}

	builder.build().map_err(|e| {
		ReflintError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Keep the files whose path relative to `root` matches `documents`.
pub fn select_documents(root: &Path, files: &[PathBuf], documents: &GlobSet) -> Vec<PathBuf> {
	files
		.iter()
		.filter(|file| {
			let relative = path_to_slash(file.strip_prefix(root).unwrap_or(file));
			documents.is_match(relative)
		})
		.cloned()
		.collect()
}

/// Collect markdown files under each existing directory of `dirs`, relative
/// to `root`, skipping ignored segments. Entries that exist but are not
/// directories are returned separately.
pub fn collect_dir_markdown(
	root: &Path,
	dirs: &[String],
	ignore_dirs: &[String],
) -> (Vec<PathBuf>, Vec<PathBuf>) {
	let mut files = Vec::new();
	let mut not_dirs = Vec::new();
	let mut visited_dirs = HashSet::new();
	let gitignore = Gitignore::empty();

	for dir in dirs {
		let path = root.join(dir);
		if !path.exists() {
			tracing::debug!("no {} directory under {}", dir, root.display());
			continue;
		}
		if !path.is_dir() {
			not_dirs.push(path);
			continue;
		}
		visit(root, &path, ignore_dirs, &gitignore, &mut visited_dirs, &mut files);
	}

	files.sort();
	files.dedup();
	(files, not_dirs)
}
