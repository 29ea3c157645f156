use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::OutputFormat;
use crate::ReflintError;
use crate::ReflintResult;
use crate::Severity;
use crate::budget::ContentBudget;
use crate::budget::DEFAULT_MAX_LINES;
use crate::budget::DEFAULT_MAX_TOKENS;
use crate::scanner::DEFAULT_RESOURCE_DIRS;
use crate::snippets::DEFAULT_CODE_SNIPPET_MAX_LINES;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["reflint.yaml", ".reflint.yaml", ".config/reflint.yaml"];

/// Configuration loaded from a `reflint.yaml` file.
///
/// ```yaml
/// level: WARNING
/// max_warnings: 10
/// ignore_dirs: [.git, __pycache__, node_modules]
/// resource_dirs: [assets, references, scripts]
/// unreferenced_file_level: ERROR
/// missing_agents_file_level: WARNING
/// code_snippet_max_lines: 3
/// max_tokens: 5000
/// max_lines: 500
/// documents: ["**/AGENTS.md", "**/SKILL.md"]
/// prompt_dirs: [.github/prompts]
/// agent_dirs: [.github/agents]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReflintConfig {
	/// Least severe finding that is displayed.
	#[serde(alias = "log_level")]
	pub level: Severity,
	/// Warnings tolerated before the run fails. Unlimited when absent.
	pub max_warnings: Option<usize>,
	/// Directory names excluded wherever they appear as a path segment.
	pub ignore_dirs: Vec<String>,
	/// Directories, relative to each entry document, whose files must be
	/// referenced.
	pub resource_dirs: Vec<String>,
	/// Severity of `unreferenced-resource-file`. `INFO` is rejected.
	pub unreferenced_file_level: Severity,
	/// Severity of `agents-file-missing`. `INFO` reports without counting.
	pub missing_agents_file_level: Severity,
	pub code_snippet_max_lines: usize,
	pub max_tokens: usize,
	pub max_lines: usize,
	/// Glob patterns, relative to the lint root, selecting entry documents.
	pub documents: Vec<String>,
	pub prompt_dirs: Vec<String>,
	pub agent_dirs: Vec<String>,
	/// Path to a `tokenizer.json` used for exact token counts.
	pub tokenizer: Option<PathBuf>,
	pub format: Option<OutputFormat>,
	/// When true, `.gitignore` files are not used for filtering markdown
	/// discovery.
	pub disable_gitignore: bool,
}

impl Default for ReflintConfig {
	fn default() -> Self {
		Self {
			level: Severity::Info,
			max_warnings: None,
			ignore_dirs: vec![".git".to_string(), "__pycache__".to_string()],
			resource_dirs: DEFAULT_RESOURCE_DIRS.iter().map(ToString::to_string).collect(),
			unreferenced_file_level: Severity::Error,
			missing_agents_file_level: Severity::Warning,
			code_snippet_max_lines: DEFAULT_CODE_SNIPPET_MAX_LINES,
			max_tokens: DEFAULT_MAX_TOKENS,
			max_lines: DEFAULT_MAX_LINES,
			documents: vec!["**/AGENTS.md".to_string(), "**/SKILL.md".to_string()],
			prompt_dirs: vec![".github/prompts".to_string()],
			agent_dirs: vec![".github/agents".to_string()],
			tokenizer: None,
			format: None,
			disable_gitignore: false,
		}
	}
}

impl ReflintConfig {
	/// Find the first existing config file under `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config discovered under `root`, if any.
	pub fn load(root: &Path) -> ReflintResult<Option<ReflintConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			tracing::debug!("no config file under {}", root.display());
			return Ok(None);
		};

		Self::load_from(&config_path).map(Some)
	}

	/// Load and validate the config at `path`.
	pub fn load_from(path: &Path) -> ReflintResult<ReflintConfig> {
		let content = std::fs::read_to_string(path)?;
		let config = Self::from_yaml(&content)?;
		tracing::info!("loaded config from {}", path.display());
		Ok(config)
	}

	/// Parse and validate YAML config text. An empty document yields the
	/// defaults.
	pub fn from_yaml(content: &str) -> ReflintResult<ReflintConfig> {
		let config: ReflintConfig = if content.trim().is_empty() {
			ReflintConfig::default()
		} else {
			serde_yaml_ng::from_str(content).map_err(|e| ReflintError::ConfigParse(e.to_string()))?
		};

		config.validate()?;
		Ok(config)
	}

	/// Reject values that parse but make no sense.
	pub fn validate(&self) -> ReflintResult<()> {
		if self.unreferenced_file_level == Severity::Info {
			return Err(ReflintError::InvalidSeverity(format!(
				"{} (unreferenced_file_level must be ERROR or WARNING)",
				Severity::Info
			)));
		}

		Ok(())
	}

	pub fn content_budget(&self) -> ContentBudget {
		ContentBudget {
			max_tokens: self.max_tokens,
			max_lines: self.max_lines,
		}
	}

	/// `tokenizer` resolved against `root` when relative.
	pub fn tokenizer_path(&self, root: &Path) -> Option<PathBuf> {
		self.tokenizer.as_ref().map(|path| {
			if path.is_absolute() {
				path.clone()
			} else {
				root.join(path)
			}
		})
	}
}

/// Commented sample written by `reflint init`.
pub const SAMPLE_CONFIG: &str = "\
# reflint configuration
#
# Least severe finding to display: ERROR, WARNING or INFO.
level: INFO

# Fail the run when more warnings than this are reported.
# max_warnings: 0

# Directory names skipped wherever they appear in a path.
ignore_dirs:
  - .git
  - __pycache__

# Directories next to each entry document whose files must be referenced.
resource_dirs:
  - assets
  - references
  - scripts

unreferenced_file_level: ERROR
missing_agents_file_level: WARNING

code_snippet_max_lines: 3
max_tokens: 5000
max_lines: 500

documents:
  - \"**/AGENTS.md\"
  - \"**/SKILL.md\"

prompt_dirs:
  - .github/prompts
agent_dirs:
  - .github/agents
";
