use std::fmt;
use std::ops::AddAssign;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::ReflintError;

/// Severity of a [`Finding`].
///
/// Variants are ordered from least to most verbose so that a display
/// threshold can be compared directly: a finding is shown when
/// `finding.severity <= threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Severity {
	Error,
	Warning,
	Info,
}

impl Severity {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Error => "ERROR",
			Self::Warning => "WARNING",
			Self::Info => "INFO",
		}
	}

	/// Returns `true` when a finding of this severity passes the display
	/// `threshold`.
	pub fn is_visible_at(self, threshold: Severity) -> bool {
		self <= threshold
	}
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Severity {
	type Err = ReflintError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.trim().to_ascii_uppercase().as_str() {
			"ERROR" | "ERR" => Ok(Self::Error),
			"WARNING" | "WARN" => Ok(Self::Warning),
			"INFO" | "INFORMATION" => Ok(Self::Info),
			_ => Err(ReflintError::InvalidSeverity(value.to_string())),
		}
	}
}

impl TryFrom<String> for Severity {
	type Error = ReflintError;

	fn try_from(value: String) -> Result<Self, ReflintError> {
		value.parse()
	}
}

impl From<Severity> for String {
	fn from(value: Severity) -> Self {
		value.as_str().to_string()
	}
}

/// Stable identifiers for every rule that can produce a [`Finding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "&'static str")]
#[non_exhaustive]
pub enum RuleCode {
	/// A file inside a resource directory is not referenced by the entry
	/// document or the markdown files it links to.
	UnreferencedResourceFile,
	/// An inline backtick path in an entry document does not exist under any
	/// candidate base directory.
	FileLinkNotFound,
	/// A link, image or attachment in a prompt or agent file does not exist.
	FileReferenceNotFound,
	TooComplexContent,
	ContentComplexity,
	TooManyLines,
	CodeSnippetTooLarge,
	/// A markdown file reached through a reference could not be read.
	ReferenceResolutionFailed,
	FileReadError,
	AgentsFileMissing,
	AgentFrontMatterFound,
	AgentContentMissing,
	DirectoryNotFound,
}

impl RuleCode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::UnreferencedResourceFile => "unreferenced-resource-file",
			Self::FileLinkNotFound => "file-link-not-found",
			Self::FileReferenceNotFound => "file-reference-not-found",
			Self::TooComplexContent => "too-complex-content",
			Self::ContentComplexity => "content-complexity",
			Self::TooManyLines => "too-many-lines",
			Self::CodeSnippetTooLarge => "code-snippet-too-large",
			Self::ReferenceResolutionFailed => "reference-resolution-failed",
			Self::FileReadError => "file-read-error",
			Self::AgentsFileMissing => "agents-file-missing",
			Self::AgentFrontMatterFound => "agent-front-matter-found",
			Self::AgentContentMissing => "agent-content-missing",
			Self::DirectoryNotFound => "directory-not-found",
		}
	}
}

impl fmt::Display for RuleCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<RuleCode> for &'static str {
	fn from(value: RuleCode) -> Self {
		value.as_str()
	}
}

/// One reported validation issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
	pub severity: Severity,
	pub rule: RuleCode,
	pub message: String,
	/// Path relative to the caller's report base. `None` when the finding is
	/// not tied to a file.
	pub file: Option<PathBuf>,
	/// 1-indexed line number.
	pub line: Option<usize>,
	/// The source line the finding points at, shown by the digest format.
	pub line_content: Option<String>,
}

impl Finding {
	pub fn new(severity: Severity, rule: RuleCode, message: impl Into<String>) -> Self {
		Self {
			severity,
			rule,
			message: message.into(),
			file: None,
			line: None,
			line_content: None,
		}
	}

	#[must_use]
	pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
		self.file = Some(file.into());
		self
	}

	#[must_use]
	pub fn with_line(mut self, line: usize) -> Self {
		self.line = Some(line);
		self
	}

	#[must_use]
	pub fn with_line_content(mut self, content: impl Into<String>) -> Self {
		self.line_content = Some(content.into());
		self
	}

	/// The file path used for display, `<unknown>` when absent.
	pub fn display_file(&self) -> String {
		self.file.as_deref().map_or_else(
			|| UNKNOWN_FILE.to_string(),
			|file| file.to_string_lossy().replace('\\', "/"),
		)
	}
}

/// Placeholder used when a finding has no associated file.
pub const UNKNOWN_FILE: &str = "<unknown>";

/// Warning and error counts produced by a check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
	pub warnings: usize,
	pub errors: usize,
}

impl Tally {
	pub fn of(severity: Severity) -> Self {
		match severity {
			Severity::Error => Self {
				warnings: 0,
				errors: 1,
			},
			Severity::Warning => Self {
				warnings: 1,
				errors: 0,
			},
			Severity::Info => Self::default(),
		}
	}

	pub fn is_clean(&self) -> bool {
		self.warnings == 0 && self.errors == 0
	}
}

impl AddAssign for Tally {
	fn add_assign(&mut self, rhs: Self) {
		self.warnings += rhs.warnings;
		self.errors += rhs.errors;
	}
}

/// Run-scoped, ordered collection of findings.
///
/// Created once per run and passed by `&mut` into every check. Findings are
/// only appended; the caller drains them with [`Findings::take`] after
/// rendering.
#[derive(Debug, Default)]
pub struct Findings {
	items: Vec<Finding>,
	tally: Tally,
}

impl Findings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a finding and return its contribution to the run totals.
	pub fn push(&mut self, finding: Finding) -> Tally {
		let tally = Tally::of(finding.severity);
		self.tally += tally;
		self.items.push(finding);
		tally
	}

	pub fn warning_count(&self) -> usize {
		self.tally.warnings
	}

	pub fn error_count(&self) -> usize {
		self.tally.errors
	}

	pub fn tally(&self) -> Tally {
		self.tally
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
		self.items.iter()
	}

	pub fn as_slice(&self) -> &[Finding] {
		&self.items
	}

	/// Count findings with the given rule code.
	pub fn count_rule(&self, rule: RuleCode) -> usize {
		self.items.iter().filter(|finding| finding.rule == rule).count()
	}

	/// Drain all findings, resetting the totals.
	pub fn take(&mut self) -> Vec<Finding> {
		self.tally = Tally::default();
		std::mem::take(&mut self.items)
	}

	/// Discard all findings, resetting the totals. Used between runs that
	/// share one collector.
	pub fn clear(&mut self) {
		self.tally = Tally::default();
		self.items.clear();
	}
}

impl<'a> IntoIterator for &'a Findings {
	type IntoIter = std::slice::Iter<'a, Finding>;
	type Item = &'a Finding;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}

/// Express `path` relative to `base` for reporting. Paths outside `base` are
/// returned unchanged.
pub fn report_path(path: &Path, base: &Path) -> PathBuf {
	path.strip_prefix(base).unwrap_or(path).to_path_buf()
}
