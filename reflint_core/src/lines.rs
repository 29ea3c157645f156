/// Pre-computed table of line-start byte offsets for efficient offset-to-line
/// conversion. Building the table is O(n); each lookup is a binary search.
pub(crate) struct LineTable<'a> {
	content: &'a str,
	/// Byte offsets of the start of each line. `line_starts[0]` is always 0.
	line_starts: Vec<usize>,
}

impl<'a> LineTable<'a> {
	pub(crate) fn new(content: &'a str) -> Self {
		let mut line_starts = vec![0];
		for (i, byte) in content.bytes().enumerate() {
			if byte == b'\n' {
				line_starts.push(i + 1);
			}
		}
		Self {
			content,
			line_starts,
		}
	}

	/// 1-indexed line containing the byte `offset`.
	pub(crate) fn line_of(&self, offset: usize) -> usize {
		match self.line_starts.binary_search(&offset) {
			Ok(exact) => exact + 1,
			Err(insert) => insert.max(1),
		}
	}

	/// Text of the 1-indexed `line`, without its trailing newline.
	pub(crate) fn line_text(&self, line: usize) -> &'a str {
		let Some(&start) = self.line_starts.get(line.saturating_sub(1)) else {
			return "";
		};
		let end = self
			.line_starts
			.get(line)
			.map_or(self.content.len(), |next| next - 1);
		self.content[start..end].trim_end_matches('\r')
	}
}

/// Number of lines in `content`: newline count plus one.
pub fn count_lines(content: &str) -> usize {
	content.bytes().filter(|byte| *byte == b'\n').count() + 1
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}
