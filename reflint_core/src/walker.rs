use std::collections::BTreeSet;
use std::collections::HashSet;
use std::path::Path;

use derive_more::Deref;
use serde::Serialize;

use crate::Finding;
use crate::Findings;
use crate::RuleCode;
use crate::Severity;
use crate::Tally;
use crate::extractor::RawReference;
use crate::extractor::extract_references;
use crate::finding::report_path;
use crate::lines::normalize_line_endings;
use crate::resolver::CanonicalPath;
use crate::resolver::canonicalize_relative;
use crate::resolver::path_to_slash;
use crate::resolver::resolve_reference;

/// Deduplicated canonical paths reachable from an entry document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, Serialize)]
#[serde(transparent)]
pub struct ReferenceSet(BTreeSet<CanonicalPath>);

impl ReferenceSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, path: CanonicalPath) -> bool {
		self.0.insert(path)
	}

	/// Returns `true` if the set contains exactly `path`.
	pub fn contains_path(&self, path: &str) -> bool {
		self.0.contains(path)
	}

	/// Returns `true` if `path` is referenced, either exactly or by a
	/// reference that ends with it.
	pub fn references(&self, path: &str) -> bool {
		self.contains_path(path) || self.0.iter().any(|reference| reference.ends_with_path(path))
	}
}

impl FromIterator<CanonicalPath> for ReferenceSet {
	fn from_iter<T: IntoIterator<Item = CanonicalPath>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Result of walking the references of one entry document.
#[derive(Debug, Clone, Default)]
pub struct ReferenceWalk {
	pub references: ReferenceSet,
	pub tally: Tally,
}

/// Builds the canonical reference set of an entry document, following one
/// extra hop into every markdown file it references.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceWalker<'a> {
	project_root: &'a Path,
	report_base: &'a Path,
}

impl<'a> ReferenceWalker<'a> {
	/// `project_root` anchors resolution; `report_base` is the directory
	/// finding paths are reported relative to.
	pub fn new(project_root: &'a Path, report_base: &'a Path) -> Self {
		Self {
			project_root,
			report_base,
		}
	}

	/// Walk `content`, which belongs to `source_file`. `line_offset` is the
	/// number of lines preceding `content` in the file.
	pub fn walk(
		&self,
		content: &str,
		source_file: &Path,
		line_offset: usize,
		findings: &mut Findings,
	) -> ReferenceWalk {
		let mut walk = ReferenceWalk::default();
		let mut opened: HashSet<CanonicalPath> = HashSet::new();

		if let Ok(relative) = source_file.strip_prefix(self.project_root) {
			if let Some(entry) = canonicalize_relative(&path_to_slash(relative)) {
				opened.insert(entry);
			}
		}

		let direct = self.resolve_all(content, source_file);
		for (_, path) in &direct {
			walk.references.insert(path.clone());
		}

		for (raw, path) in direct {
			if !path.is_markdown() || !opened.insert(path.clone()) {
				continue;
			}

			let nested_file = self.project_root.join(path.as_str());
			match std::fs::read_to_string(&nested_file) {
				Ok(nested) => {
					let nested = normalize_line_endings(&nested);
					let nested_references = self.resolve_all(&nested, &nested_file);
					tracing::debug!(
						"followed `{path}` from {}: {} reference(s)",
						source_file.display(),
						nested_references.len()
					);
					for (_, nested_path) in nested_references {
						walk.references.insert(nested_path);
					}
				}
				Err(error) => {
					tracing::warn!("cannot read nested markdown `{path}`: {error}");
					walk.tally += findings.push(
						Finding::new(
							Severity::Warning,
							RuleCode::ReferenceResolutionFailed,
							format!("Failed to read referenced markdown file '{path}': {error}"),
						)
						.with_file(report_path(source_file, self.report_base))
						.with_line(raw.line + line_offset),
					);
				}
			}
		}

		walk
	}

	/// Extract and resolve every reference in `content`, dropping the ones
	/// that cannot be resolved inside the project root.
	fn resolve_all(
		&self,
		content: &str,
		source_file: &Path,
	) -> Vec<(RawReference, CanonicalPath)> {
		extract_references(content)
			.into_iter()
			.filter_map(|raw| {
				let resolved = resolve_reference(&raw.value, source_file, self.project_root);
				if resolved.is_none() {
					tracing::debug!("discarded unresolvable reference `{}`", raw.value);
				}
				resolved.map(|path| (raw, path))
			})
			.collect()
	}
}
