use std::borrow::Borrow;
use std::path::Component;
use std::path::Path;

use derive_more::Deref;
use derive_more::Display;
use serde::Serialize;

/// A normalized, project-root-relative path with `/` separators and no `.`
/// or `..` segments. Two references point at the same target iff their
/// canonical paths are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, Display, Serialize)]
#[serde(transparent)]
pub struct CanonicalPath(String);

impl CanonicalPath {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_string(self) -> String {
		self.0
	}

	/// Returns `true` if the path ends with `suffix`. An empty suffix never
	/// matches.
	///
	/// `docs/assets/logo.png` and `myassets/logo.png` both end with
	/// `assets/logo.png`.
	pub fn ends_with_path(&self, suffix: &str) -> bool {
		!suffix.is_empty() && self.0.ends_with(suffix)
	}

	/// Returns `true` if the path has a markdown extension.
	pub fn is_markdown(&self) -> bool {
		is_markdown_path(Path::new(&self.0))
	}
}

impl Borrow<str> for CanonicalPath {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for CanonicalPath {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for CanonicalPath {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for CanonicalPath {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

/// Push the segments of `path` onto `stack`, dropping `.` and empty segments
/// and popping on `..`. Returns `false` if a `..` had nothing to pop.
fn push_segments<'a>(stack: &mut Vec<&'a str>, path: &'a str) -> bool {
	let mut contained = true;
	for segment in path.split('/') {
		match segment {
			"" | "." => {}
			".." => {
				if stack.pop().is_none() {
					contained = false;
				}
			}
			other => stack.push(other),
		}
	}
	contained
}

/// Normalize a `/`-separated path: drop `.` segments, resolve `..` against
/// the preceding segment and drop a `..` that has nothing left to pop.
///
/// Normalization is idempotent and never yields a leading `..`.
pub fn normalize_path(path: &str) -> String {
	let path = path.replace('\\', "/");
	let mut stack = Vec::new();
	push_segments(&mut stack, &path);
	stack.join("/")
}

/// Resolve a raw reference found in `source_file` to a canonical path
/// relative to `project_root`.
///
/// A reference starting with `/` is resolved against the project root;
/// anything else against the directory containing `source_file`. Returns
/// `None` when the reference is empty or would climb above the project root,
/// or when `source_file` does not live under `project_root`.
pub fn resolve_reference(
	raw: &str,
	source_file: &Path,
	project_root: &Path,
) -> Option<CanonicalPath> {
	let raw = raw.trim().replace('\\', "/");
	if raw.is_empty() {
		return None;
	}

	let base = if raw.starts_with('/') {
		String::new()
	} else {
		let relative = match source_file.strip_prefix(project_root) {
			Ok(relative) => relative,
			Err(_) if source_file.is_relative() => source_file,
			Err(_) => return None,
		};
		relative.parent().map(path_to_slash).unwrap_or_default()
	};

	let mut stack = Vec::new();
	if !push_segments(&mut stack, &base) || !push_segments(&mut stack, &raw) {
		return None;
	}

	if stack.is_empty() {
		return None;
	}

	Some(CanonicalPath(stack.join("/")))
}

/// Resolve an already project-relative path string, as used for the second
/// resolution of a canonical path.
pub fn canonicalize_relative(path: &str) -> Option<CanonicalPath> {
	let mut stack = Vec::new();
	let path = path.replace('\\', "/");
	if !push_segments(&mut stack, &path) || stack.is_empty() {
		return None;
	}
	Some(CanonicalPath(stack.join("/")))
}

/// Express a relative path with `/` separators, dropping `.` components.
pub fn path_to_slash(path: &Path) -> String {
	path.components()
		.filter_map(|component| {
			match component {
				Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
				Component::ParentDir => Some("..".to_string()),
				Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
			}
		})
		.collect::<Vec<_>>()
		.join("/")
}

/// Returns `true` if `path` has a markdown extension.
pub fn is_markdown_path(path: &Path) -> bool {
	let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
		return false;
	};

	matches!(
		ext.to_ascii_lowercase().as_str(),
		"md" | "mdx" | "markdown"
	)
}
