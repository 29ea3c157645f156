/// Name of the agent guidance document expected at a project root.
pub const AGENTS_FILE_NAME: &str = "AGENTS.md";

const FRONT_MATTER_DELIMITER: &str = "---";

/// A markdown document split into optional front matter and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
	/// Text between the `---` delimiters, without them.
	pub front_matter: Option<&'a str>,
	/// Everything after the closing delimiter.
	pub body: &'a str,
	/// Number of lines of the file that precede `body`.
	pub body_line_offset: usize,
}

impl<'a> Document<'a> {
	/// Split `content` on a leading `---` … `---` block. Content that does not
	/// start with a delimiter line, or whose block is never closed, is all
	/// body.
	pub fn parse(content: &'a str) -> Self {
		let whole = Self {
			front_matter: None,
			body: content,
			body_line_offset: 0,
		};

		let Some(rest) = strip_delimiter_line(content) else {
			return whole;
		};

		let mut cursor = 0;
		let mut consumed = 1;
		for line in rest.split_inclusive('\n') {
			consumed += 1;
			if line.trim_end() == FRONT_MATTER_DELIMITER {
				return Self {
					front_matter: Some(&rest[..cursor]),
					body: &rest[cursor + line.len()..],
					body_line_offset: consumed,
				};
			}
			cursor += line.len();
		}

		whole
	}

	pub fn has_front_matter(&self) -> bool {
		self.front_matter.is_some()
	}

	/// Returns `true` if the body is empty or only whitespace.
	pub fn is_body_empty(&self) -> bool {
		self.body.trim().is_empty()
	}

	/// 1-indexed line of the file at which the body starts.
	pub fn body_start_line(&self) -> usize {
		self.body_line_offset + 1
	}
}

fn strip_delimiter_line(content: &str) -> Option<&str> {
	let rest = content.strip_prefix(FRONT_MATTER_DELIMITER)?;
	let rest = rest.trim_start_matches(&[' ', '\t'][..]);
	rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}
