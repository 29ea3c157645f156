use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

/// Resource directories checked when none are configured.
pub const DEFAULT_RESOURCE_DIRS: [&str; 3] = ["assets", "references", "scripts"];

/// Files found under the resource directories of a project root.
#[derive(Debug, Clone, Default)]
pub struct ResourceScan {
	/// Absolute paths of discovered files, sorted.
	pub files: Vec<PathBuf>,
	/// Directories that could not be listed, with the reason.
	pub unreadable: Vec<(PathBuf, String)>,
}

/// Returns `true` if any component of `path` equals one of `ignore_dirs`.
///
/// Matching is on whole segments: an entry `git` excludes `a/git/b` but not
/// `a/scripts-git/b`.
pub fn has_ignored_segment(path: &Path, ignore_dirs: &[String]) -> bool {
	path.components().any(|component| {
		let segment = component.as_os_str().to_string_lossy();
		ignore_dirs.iter().any(|ignored| *ignored == segment)
	})
}

/// Enumerate every file under each existing `resource_dirs` entry of
/// `project_root`, skipping paths with an ignored segment.
///
/// Missing resource directories are skipped silently. Directories that
/// cannot be read are reported in [`ResourceScan::unreadable`].
pub fn scan_resource_files(
	project_root: &Path,
	resource_dirs: &[String],
	ignore_dirs: &[String],
) -> ResourceScan {
	let mut scan = ResourceScan::default();
	let mut visited_dirs = HashSet::new();

	for dir_name in resource_dirs {
		let dir = project_root.join(dir_name);
		if !dir.is_dir() {
			continue;
		}
		walk_dir(project_root, &dir, ignore_dirs, &mut visited_dirs, &mut scan);
	}

	scan.files.sort();
	scan.files.dedup();
	tracing::debug!(
		"found {} resource file(s) under {}",
		scan.files.len(),
		project_root.display()
	);
	scan
}

fn walk_dir(
	root: &Path,
	dir: &Path,
	ignore_dirs: &[String],
	visited_dirs: &mut HashSet<PathBuf>,
	scan: &mut ResourceScan,
) {
	let relative = dir.strip_prefix(root).unwrap_or(dir);
	if has_ignored_segment(relative, ignore_dirs) {
		return;
	}

	// Symlinked directories pointing back up the tree are visited once.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		tracing::debug!("skipping already visited directory {}", dir.display());
		return;
	}

	let entries = match std::fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(error) => {
			scan.unreadable.push((dir.to_path_buf(), error.to_string()));
			return;
		}
	};

	for entry in entries {
		let path = match entry {
			Ok(entry) => entry.path(),
			Err(error) => {
				scan.unreadable.push((dir.to_path_buf(), error.to_string()));
				continue;
			}
		};

		if path.is_dir() {
			walk_dir(root, &path, ignore_dirs, visited_dirs, scan);
			continue;
		}

		let relative = path.strip_prefix(root).unwrap_or(&path);
		if path.is_file() && !has_ignored_segment(relative, ignore_dirs) {
			scan.files.push(path);
		}
	}
}
