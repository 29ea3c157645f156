use std::path::Path;
use std::path::PathBuf;

use crate::Finding;
use crate::Findings;
use crate::RuleCode;
use crate::Severity;
use crate::Tally;
use crate::finding::report_path;
use crate::resolver::path_to_slash;
use crate::scanner::scan_resource_files;
use crate::walker::ReferenceSet;

/// Reconciles resource files on disk against the canonical reference set of
/// an entry document.
#[derive(Debug, Clone, Copy)]
pub struct UnreferencedFileCheck<'a> {
	/// Root that resource directories and references are relative to.
	pub project_root: &'a Path,
	/// Directory that finding paths are reported relative to.
	pub report_base: &'a Path,
	pub resource_dirs: &'a [String],
	pub ignore_dirs: &'a [String],
	/// Severity of each `unreferenced-resource-file` finding.
	pub severity: Severity,
}

impl UnreferencedFileCheck<'_> {
	/// Scan the resource directories and report every file that no reference
	/// in `references` points at. `entry_file` is named in the message.
	pub fn run(&self, entry_file: &Path, references: &ReferenceSet, findings: &mut Findings) -> Tally {
		let mut tally = Tally::default();
		let scan = scan_resource_files(self.project_root, self.resource_dirs, self.ignore_dirs);

		for (dir, reason) in &scan.unreadable {
			tally += findings.push(
				Finding::new(
					Severity::Warning,
					RuleCode::FileReadError,
					format!("Cannot read resource directory: {reason}"),
				)
				.with_file(report_path(dir, self.report_base)),
			);
		}

		if scan.files.is_empty() {
			tracing::debug!(
				"no resource files under {} in {:?}",
				self.project_root.display(),
				self.resource_dirs
			);
			return tally;
		}

		tally += check_files(
			&scan.files,
			references,
			self.project_root,
			self.report_base,
			entry_file,
			self.severity,
			findings,
		);
		tally
	}
}

/// Emit one `unreferenced-resource-file` finding per entry of `files` that
/// `references` does not cover, matching on the path relative to
/// `project_root` either exactly or as a plain string suffix.
pub fn check_files(
	files: &[PathBuf],
	references: &ReferenceSet,
	project_root: &Path,
	report_base: &Path,
	entry_file: &Path,
	severity: Severity,
	findings: &mut Findings,
) -> Tally {
	let mut tally = Tally::default();
	let entry_name = entry_file
		.file_name()
		.map_or_else(|| entry_file.display().to_string(), |name| name.to_string_lossy().into_owned());

	for file in files {
		let relative = path_to_slash(file.strip_prefix(project_root).unwrap_or(file));
		if references.references(&relative) {
			continue;
		}

		tally += findings.push(
			Finding::new(
				severity,
				RuleCode::UnreferencedResourceFile,
				format!("File '{relative}' is not referenced in {entry_name}"),
			)
			.with_file(report_path(file, report_base)),
		);
	}

	tally
}
