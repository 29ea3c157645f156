use std::path::Path;

use crate::Finding;
use crate::Findings;
use crate::RuleCode;
use crate::Severity;
use crate::Tally;
use crate::lines::count_lines;

pub const DEFAULT_MAX_TOKENS: usize = 5000;
pub const DEFAULT_MAX_LINES: usize = 500;

/// Counts tokens in a block of text.
pub trait TokenCounter: std::fmt::Debug {
	fn count(&self, content: &str) -> usize;

	/// Short name used in log output.
	fn name(&self) -> &'static str;
}

/// Approximates one token per four characters of content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateTokenCounter;

impl TokenCounter for ApproximateTokenCounter {
	fn count(&self, content: &str) -> usize {
		content.chars().count() / 4
	}

	fn name(&self) -> &'static str {
		"approximate"
	}
}

/// Exact token counts from a `tokenizer.json` model.
#[cfg(feature = "precise-tokens")]
#[derive(Debug)]
pub struct PreciseTokenCounter {
	tokenizer: tokenizers::Tokenizer,
}

#[cfg(feature = "precise-tokens")]
impl PreciseTokenCounter {
	pub fn from_file(path: &Path) -> Result<Self, String> {
		let tokenizer = tokenizers::Tokenizer::from_file(path).map_err(|e| e.to_string())?;
		Ok(Self { tokenizer })
	}
}

#[cfg(feature = "precise-tokens")]
impl TokenCounter for PreciseTokenCounter {
	fn count(&self, content: &str) -> usize {
		match self.tokenizer.encode(content, false) {
			Ok(encoding) => encoding.len(),
			Err(error) => {
				tracing::debug!("tokenizer failed, approximating: {error}");
				ApproximateTokenCounter.count(content)
			}
		}
	}

	fn name(&self) -> &'static str {
		"precise"
	}
}

/// Load the best available token counter.
///
/// Falls back to [`ApproximateTokenCounter`] when no tokenizer path is
/// given, the `precise-tokens` feature is disabled, or the model cannot be
/// loaded. The fallback is never an error.
pub fn load_token_counter(tokenizer: Option<&Path>) -> Box<dyn TokenCounter> {
	let Some(path) = tokenizer else {
		return Box::new(ApproximateTokenCounter);
	};

	#[cfg(feature = "precise-tokens")]
	{
		match PreciseTokenCounter::from_file(path) {
			Ok(counter) => {
				tracing::debug!("loaded tokenizer from {}", path.display());
				return Box::new(counter);
			}
			Err(error) => {
				tracing::debug!(
					"cannot load tokenizer {}: {error}; using approximate counts",
					path.display()
				);
			}
		}
	}

	#[cfg(not(feature = "precise-tokens"))]
	tracing::debug!(
		"tokenizer {} ignored: built without `precise-tokens`",
		path.display()
	);

	Box::new(ApproximateTokenCounter)
}

/// Token and line ceilings for a block of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBudget {
	pub max_tokens: usize,
	pub max_lines: usize,
}

impl Default for ContentBudget {
	fn default() -> Self {
		Self {
			max_tokens: DEFAULT_MAX_TOKENS,
			max_lines: DEFAULT_MAX_LINES,
		}
	}
}

/// Check `content` against `budget`. The token and line checks are
/// independent and may both fire.
///
/// `file` is the path findings are reported against and `line` the line the
/// content starts at.
pub fn check_content_budget(
	content: &str,
	file: &Path,
	line: usize,
	budget: ContentBudget,
	counter: &dyn TokenCounter,
	findings: &mut Findings,
) -> Tally {
	let mut tally = Tally::default();

	let tokens = counter.count(content);
	let finding = if tokens > budget.max_tokens {
		Finding::new(
			Severity::Warning,
			RuleCode::TooComplexContent,
			format!("Content is too complex ({tokens}/{} tokens).", budget.max_tokens),
		)
	} else {
		Finding::new(
			Severity::Info,
			RuleCode::ContentComplexity,
			format!("Content token count: {tokens}/{} tokens.", budget.max_tokens),
		)
	};
	tally += findings.push(finding.with_file(file).with_line(line));

	let lines = count_lines(content);
	if lines > budget.max_lines {
		tally += findings.push(
			Finding::new(
				Severity::Error,
				RuleCode::TooManyLines,
				format!("Content has too many lines ({lines}/{} lines).", budget.max_lines),
			)
			.with_file(file)
			.with_line(line),
		);
	}

	tally
}
