use std::ops::AddAssign;
use std::path::Path;

use globset::GlobSet;

use crate::Finding;
use crate::Findings;
use crate::ReflintConfig;
use crate::ReflintError;
use crate::ReflintResult;
use crate::RuleCode;
use crate::Severity;
use crate::Tally;
use crate::budget::TokenCounter;
use crate::budget::check_content_budget;
use crate::budget::load_token_counter;
use crate::consistency::UnreferencedFileCheck;
use crate::document::AGENTS_FILE_NAME;
use crate::document::Document;
use crate::finding::report_path;
use crate::lines::normalize_line_endings;
use crate::links::check_file_links;
use crate::links::check_reference_targets;
use crate::project::build_document_globs;
use crate::project::collect_dir_markdown;
use crate::project::discover_markdown_files;
use crate::project::select_documents;
use crate::snippets::check_code_snippets;
use crate::walker::ReferenceWalker;

/// Warning and error totals of a lint run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintSummary {
	pub warnings: usize,
	pub errors: usize,
}

impl LintSummary {
	/// A run passes when it has no errors and, if a warning budget is set,
	/// no more warnings than the budget allows.
	pub fn passes(&self, max_warnings: Option<usize>) -> bool {
		self.errors == 0 && max_warnings.is_none_or(|max| self.warnings <= max)
	}
}

impl From<Tally> for LintSummary {
	fn from(tally: Tally) -> Self {
		Self {
			warnings: tally.warnings,
			errors: tally.errors,
		}
	}
}

impl AddAssign<Tally> for LintSummary {
	fn add_assign(&mut self, rhs: Tally) {
		self.warnings += rhs.warnings;
		self.errors += rhs.errors;
	}
}

impl AddAssign for LintSummary {
	fn add_assign(&mut self, rhs: Self) {
		self.warnings += rhs.warnings;
		self.errors += rhs.errors;
	}
}

/// Runs every check over a project root.
#[derive(Debug)]
pub struct Linter {
	config: ReflintConfig,
	documents: GlobSet,
	counter: Box<dyn TokenCounter>,
}

impl Linter {
	/// Build a linter from a validated config. Fails only on invalid
	/// `documents` patterns.
	pub fn new(config: ReflintConfig) -> ReflintResult<Self> {
		config.validate()?;
		let documents = build_document_globs(&config.documents)?;
		let counter = load_token_counter(config.tokenizer.as_deref());
		tracing::debug!("counting tokens with the {} counter", counter.name());

		Ok(Self {
			config,
			documents,
			counter,
		})
	}

	/// Replace the token counter chosen from the config.
	#[must_use]
	pub fn with_token_counter(mut self, counter: Box<dyn TokenCounter>) -> Self {
		self.counter = counter;
		self
	}

	pub fn config(&self) -> &ReflintConfig {
		&self.config
	}

	/// Lint the project at `root`, reporting paths relative to `relative_to`
	/// (or `root` when absent).
	///
	/// Returns [`ReflintError::ProjectNotFound`] when `root` is not a
	/// directory. Every other problem becomes a finding.
	pub fn lint_project(
		&self,
		root: &Path,
		relative_to: Option<&Path>,
		findings: &mut Findings,
	) -> ReflintResult<LintSummary> {
		if !root.is_dir() {
			return Err(ReflintError::ProjectNotFound {
				path: root.display().to_string(),
			});
		}

		let report_base = relative_to.unwrap_or(root);
		let mut summary = LintSummary::default();
		tracing::info!("linting {}", root.display());

		let files = discover_markdown_files(root, &self.config.ignore_dirs, self.config.disable_gitignore)?;
		let documents = select_documents(root, &files, &self.documents);
		tracing::info!(
			"found {} entry document(s) among {} markdown file(s)",
			documents.len(),
			files.len()
		);

		summary += self.check_agents_file(root, report_base, findings);

		for document in &documents {
			summary += self.lint_document(document, root, report_base, findings);
		}

		for file in &files {
			summary += self.lint_snippets(file, report_base, findings);
		}

		summary += self.lint_prompt_agent_dirs(root, report_base, findings);

		tracing::info!(
			"{}: {} warning(s), {} error(s)",
			root.display(),
			summary.warnings,
			summary.errors
		);
		Ok(summary)
	}

	/// Lint one entry document: front matter, inline file links, content
	/// budget and the unreferenced resource check against the document's
	/// own directory.
	pub fn lint_document(
		&self,
		document: &Path,
		root: &Path,
		report_base: &Path,
		findings: &mut Findings,
	) -> Tally {
		let mut tally = Tally::default();
		let report_file = report_path(document, report_base);

		let Some(content) = read_markdown(document, &report_file, findings, &mut tally) else {
			return tally;
		};

		let parsed = Document::parse(&content);
		let file_name = document
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_default();
		let is_agents_file = file_name == AGENTS_FILE_NAME;
		tracing::debug!("linting entry document {}", report_file.display());

		if is_agents_file && parsed.has_front_matter() {
			tally += findings.push(
				Finding::new(
					Severity::Error,
					RuleCode::AgentFrontMatterFound,
					format!("{AGENTS_FILE_NAME} should not contain front matter"),
				)
				.with_file(&report_file)
				.with_line(1),
			);
		}

		if parsed.is_body_empty() {
			if is_agents_file {
				tally += findings.push(
					Finding::new(
						Severity::Error,
						RuleCode::AgentContentMissing,
						format!("{AGENTS_FILE_NAME} content is missing"),
					)
					.with_file(&report_file),
				);
			}
			return tally;
		}

		let document_dir = document.parent().unwrap_or(root);

		tally += check_file_links(
			parsed.body,
			&report_file,
			parsed.body_line_offset,
			&[document_dir, root],
			findings,
		);

		tally += check_content_budget(
			parsed.body,
			&report_file,
			parsed.body_start_line(),
			self.config.content_budget(),
			self.counter.as_ref(),
			findings,
		);

		let walk = ReferenceWalker::new(document_dir, report_base).walk(&content, document, 0, findings);
		tally += walk.tally;

		let check = UnreferencedFileCheck {
			project_root: document_dir,
			report_base,
			resource_dirs: &self.config.resource_dirs,
			ignore_dirs: &self.config.ignore_dirs,
			severity: self.config.unreferenced_file_level,
		};
		tally += check.run(document, &walk.references, findings);

		tally
	}

	fn lint_snippets(&self, file: &Path, report_base: &Path, findings: &mut Findings) -> Tally {
		let mut tally = Tally::default();
		let report_file = report_path(file, report_base);

		if let Some(content) = read_markdown(file, &report_file, findings, &mut tally) {
			tally += check_code_snippets(
				&content,
				&report_file,
				0,
				self.config.code_snippet_max_lines,
				findings,
			);
		}

		tally
	}

	/// Report a missing root `AGENTS.md` at the configured severity.
	fn check_agents_file(&self, root: &Path, report_base: &Path, findings: &mut Findings) -> Tally {
		let agents_file = root.join(AGENTS_FILE_NAME);
		if agents_file.is_file() {
			return Tally::default();
		}

		findings.push(
			Finding::new(
				self.config.missing_agents_file_level,
				RuleCode::AgentsFileMissing,
				format!(
					"{AGENTS_FILE_NAME} file is missing in the root directory. Consider creating one \
					 to provide AI assistant guidance."
				),
			)
			.with_file(report_path(&agents_file, report_base)),
		)
	}

	/// Check every markdown file under the prompt and agent directories for
	/// size and for link targets that do not exist.
	fn lint_prompt_agent_dirs(
		&self,
		root: &Path,
		report_base: &Path,
		findings: &mut Findings,
	) -> Tally {
		let mut tally = Tally::default();
		let dirs: Vec<String> = self
			.config
			.prompt_dirs
			.iter()
			.chain(&self.config.agent_dirs)
			.cloned()
			.collect();
		let (files, not_dirs) = collect_dir_markdown(root, &dirs, &self.config.ignore_dirs);

		for path in not_dirs {
			tally += findings.push(
				Finding::new(
					Severity::Error,
					RuleCode::DirectoryNotFound,
					format!("'{}' is not a directory", report_path(&path, report_base).display()),
				)
				.with_file(report_path(&path, report_base)),
			);
		}

		for file in files {
			let report_file = report_path(&file, report_base);
			let Some(content) = read_markdown(&file, &report_file, findings, &mut tally) else {
				continue;
			};

			tally += check_content_budget(
				&content,
				&report_file,
				1,
				self.config.content_budget(),
				self.counter.as_ref(),
				findings,
			);
			tally += check_reference_targets(&content, &file, root, &report_file, 0, findings);
		}

		tally
	}
}

/// Read a markdown file with normalized line endings. A read failure is
/// recorded as a `file-read-error` warning.
fn read_markdown(
	path: &Path,
	report_file: &Path,
	findings: &mut Findings,
	tally: &mut Tally,
) -> Option<String> {
	match std::fs::read_to_string(path) {
		Ok(content) => Some(normalize_line_endings(&content)),
		Err(error) => {
			tracing::warn!("cannot read {}: {error}", path.display());
			*tally += findings.push(
				Finding::new(
					Severity::Warning,
					RuleCode::FileReadError,
					format!("Failed to read file: {error}"),
				)
				.with_file(report_file),
			);
			None
		}
	}
}
