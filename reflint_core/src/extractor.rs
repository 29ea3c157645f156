use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::lines::LineTable;

/// The syntax a reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceSyntax {
	/// `` `path/to/file` ``
	InlineCode,
	/// `[text](target)` or `![alt](target)`
	MarkdownLink,
	/// `<img src="target">`
	HtmlImage,
	/// `<attachment filePath="target">`
	Attachment,
}

/// A reference string exactly as it appeared in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawReference {
	pub value: String,
	pub syntax: ReferenceSyntax,
	/// Byte offset of the match in the scanned text.
	pub offset: usize,
	/// 1-indexed line of the match within the scanned text.
	pub line: usize,
}

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"!?\[[^\]]*\]\(([^)]+)\)").unwrap_or_else(|e| panic!("markdown link regex: {e}"))
});

static HTML_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"<img[^>]+src=["']([^"']+)["']"#)
		.unwrap_or_else(|e| panic!("html image regex: {e}"))
});

static ATTACHMENT: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"<attachment[^>]+filePath=["']([^"']+)["']"#)
		.unwrap_or_else(|e| panic!("attachment regex: {e}"))
});

/// Prefixes of targets that point outside the file system.
const EXTERNAL_PREFIXES: &[&str] = &["http://", "https://", "mailto:", "data:", "#"];

/// Characters that disqualify inline code from being read as a path.
const NON_PATH_CHARS: &[char] = &['*', '?', '\\', '<', '>', '$', '|', ':', '"', '\''];

/// Extract every file reference from `content`.
///
/// Duplicated values are collapsed, keeping the first occurrence. The result
/// is ordered by offset. Malformed or unterminated syntax is skipped.
pub fn extract_references(content: &str) -> Vec<RawReference> {
	collect_references(content, true)
}

/// Extract markdown link, HTML image and attachment targets, leaving inline
/// code alone.
pub fn extract_link_targets(content: &str) -> Vec<RawReference> {
	collect_references(content, false)
}

fn collect_references(content: &str, include_inline: bool) -> Vec<RawReference> {
	let table = LineTable::new(content);
	let mut found = Vec::new();

	if include_inline {
		for (offset, value) in inline_code_spans(content) {
			if is_path_like(value) {
				found.push((offset, value.to_string(), ReferenceSyntax::InlineCode));
			}
		}
	}

	for captures in MARKDOWN_LINK.captures_iter(content) {
		let (Some(whole), Some(target)) = (captures.get(0), captures.get(1)) else {
			continue;
		};
		let target = strip_fragment(target.as_str().trim());
		if let Some(target) = local_target(target) {
			found.push((whole.start(), target.to_string(), ReferenceSyntax::MarkdownLink));
		}
	}

	for (pattern, syntax) in [
		(&*HTML_IMAGE, ReferenceSyntax::HtmlImage),
		(&*ATTACHMENT, ReferenceSyntax::Attachment),
	] {
		for captures in pattern.captures_iter(content) {
			let (Some(whole), Some(target)) = (captures.get(0), captures.get(1)) else {
				continue;
			};
			if let Some(target) = local_target(target.as_str().trim()) {
				found.push((whole.start(), target.to_string(), syntax));
			}
		}
	}

	found.sort_by_key(|(offset, ..)| *offset);

	let mut seen = HashSet::new();
	found
		.into_iter()
		.filter(|(_, value, _)| seen.insert(value.clone()))
		.map(|(offset, value, syntax)| RawReference {
			value,
			syntax,
			offset,
			line: table.line_of(offset),
		})
		.collect()
}

/// Extract only the inline backtick path references from `content`.
///
/// Unlike [`extract_references`], a value that also appears as a link
/// target is still returned here.
pub fn extract_inline_paths(content: &str) -> Vec<RawReference> {
	let table = LineTable::new(content);
	let mut seen = HashSet::new();

	inline_code_spans(content)
		.into_iter()
		.filter(|(_, value)| is_path_like(value) && seen.insert(*value))
		.map(|(offset, value)| RawReference {
			value: value.to_string(),
			syntax: ReferenceSyntax::InlineCode,
			offset,
			line: table.line_of(offset),
		})
		.collect()
}

/// Returns `true` if inline code text looks like a file path: it contains a
/// `/` and none of the wildcard or shell metacharacters.
pub fn is_path_like(text: &str) -> bool {
	text.contains('/') && !text.contains(NON_PATH_CHARS)
}

/// Find single-backtick code spans on one line. A backtick adjacent to
/// another backtick never opens or closes a span, so double-backtick spans
/// and fences are left alone.
///
/// Returns the byte offset of the opening backtick and the enclosed text.
fn inline_code_spans(content: &str) -> Vec<(usize, &str)> {
	let bytes = content.as_bytes();
	let mut spans = Vec::new();
	let mut cursor = 0;

	while cursor < bytes.len() {
		if bytes[cursor] != b'`' || (cursor > 0 && bytes[cursor - 1] == b'`') {
			cursor += 1;
			continue;
		}

		let start = cursor + 1;
		let end = bytes[start..]
			.iter()
			.position(|&byte| byte == b'`' || byte == b'\n')
			.map(|position| start + position);

		let Some(end) = end else {
			break;
		};

		let closes = bytes[end] == b'`'
			&& end > start
			&& bytes.get(end + 1).is_none_or(|&next| next != b'`');

		if closes {
			spans.push((cursor, &content[start..end]));
			cursor = end + 1;
		} else {
			cursor += 1;
		}
	}

	spans
}

/// Drop any `#fragment` or `?query` suffix.
fn strip_fragment(target: &str) -> &str {
	target
		.find(&['#', '?'][..])
		.map_or(target, |index| &target[..index])
}

/// Filter out empty and external targets.
fn local_target(target: &str) -> Option<&str> {
	if target.is_empty()
		|| EXTERNAL_PREFIXES
			.iter()
			.any(|prefix| target.starts_with(prefix))
	{
		return None;
	}

	Some(target)
}
