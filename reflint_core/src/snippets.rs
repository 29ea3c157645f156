use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::Finding;
use crate::Findings;
use crate::RuleCode;
use crate::Severity;
use crate::Tally;
use crate::lines::LineTable;

pub const DEFAULT_CODE_SNIPPET_MAX_LINES: usize = 3;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?s)```(?:\w+)?\n(.*?)```").unwrap_or_else(|e| panic!("fenced block regex: {e}"))
});

/// A fenced code block found in markdown content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSnippet<'a> {
	/// 1-indexed line of the opening fence.
	pub line: usize,
	/// The opening fence line, e.g. ```` ```rust ````.
	pub fence: &'a str,
	/// Number of non-blank lines in the block body.
	pub lines: usize,
}

/// Find every fenced code block in `content`.
pub fn find_code_snippets(content: &str) -> Vec<CodeSnippet<'_>> {
	let table = LineTable::new(content);

	FENCED_BLOCK
		.captures_iter(content)
		.filter_map(|captures| {
			let whole = captures.get(0)?;
			let body = captures.get(1)?;
			let line = table.line_of(whole.start());
			Some(CodeSnippet {
				line,
				fence: table.line_text(line).trim(),
				lines: body
					.as_str()
					.lines()
					.filter(|line| !line.trim().is_empty())
					.count(),
			})
		})
		.collect()
}

/// Report each fenced block of `content` with more than `max_lines`
/// non-blank lines as `code-snippet-too-large`.
///
/// `line_offset` is the number of lines preceding `content` in `file`.
pub fn check_code_snippets(
	content: &str,
	file: &Path,
	line_offset: usize,
	max_lines: usize,
	findings: &mut Findings,
) -> Tally {
	let mut tally = Tally::default();

	for snippet in find_code_snippets(content) {
		if snippet.lines <= max_lines {
			continue;
		}

		let line = snippet.line + line_offset;
		tally += findings.push(
			Finding::new(
				Severity::Warning,
				RuleCode::CodeSnippetTooLarge,
				format!(
					"Code snippet at line {line} has {} lines (max: {max_lines}). Consider moving \
					 this code block to an external file to limit context size.",
					snippet.lines
				),
			)
			.with_file(file)
			.with_line(line)
			.with_line_content(snippet.fence),
		);
	}

	tally
}
