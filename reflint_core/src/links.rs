use std::path::Path;

use crate::Finding;
use crate::Findings;
use crate::RuleCode;
use crate::Severity;
use crate::Tally;
use crate::extractor::extract_inline_paths;
use crate::extractor::extract_link_targets;
use crate::resolver::resolve_reference;

/// Check that every inline backtick path in `content` exists relative to at
/// least one of `base_dirs`, tried in order. A leading `/` is stripped before
/// joining.
///
/// `file` is the path findings are reported against and `line_offset` the
/// number of lines preceding `content`.
pub fn check_file_links(
	content: &str,
	file: &Path,
	line_offset: usize,
	base_dirs: &[&Path],
	findings: &mut Findings,
) -> Tally {
	let mut tally = Tally::default();

	for reference in extract_inline_paths(content) {
		let link = reference.value.trim_start_matches('/');
		if base_dirs.iter().any(|base| base.join(link).exists()) {
			continue;
		}

		let bases = base_dirs
			.iter()
			.map(|base| base.display().to_string())
			.collect::<Vec<_>>()
			.join(", ");
		tally += findings.push(
			Finding::new(
				Severity::Error,
				RuleCode::FileLinkNotFound,
				format!(
					"File link '{}' not found in any of the base directories: {bases}",
					reference.value
				),
			)
			.with_file(file)
			.with_line(reference.line + line_offset),
		);
	}

	tally
}

/// Check that every markdown link, HTML image and attachment target in the
/// file at `source_file` exists under `root`.
///
/// Targets are resolved like any other reference: relative to the source
/// file's directory, or to `root` when they start with `/`. Targets that
/// escape `root` are skipped.
pub fn check_reference_targets(
	content: &str,
	source_file: &Path,
	root: &Path,
	report_file: &Path,
	line_offset: usize,
	findings: &mut Findings,
) -> Tally {
	let mut tally = Tally::default();

	for reference in extract_link_targets(content) {
		let Some(target) = resolve_reference(&reference.value, source_file, root) else {
			tracing::debug!("skipping unresolvable target `{}`", reference.value);
			continue;
		};

		if root.join(target.as_str()).exists() {
			continue;
		}

		tally += findings.push(
			Finding::new(
				Severity::Error,
				RuleCode::FileReferenceNotFound,
				format!("Referenced file not found: {}", reference.value),
			)
			.with_file(report_file)
			.with_line(reference.line + line_offset),
		);
	}

	tally
}
