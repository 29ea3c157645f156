use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use reflint_core::OutputFormat;
use reflint_core::ReflintConfig;
use reflint_core::Severity;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Check that markdown documentation trees reference their resources and stay small.",
	long_about = "reflint lints a tree of markdown documents (AGENTS.md, SKILL.md and \
	              friends).\n\nIt reports files in assets/, references/ and scripts/ that no \
	              document references, links that point at missing files, documents that \
	              exceed token or line budgets, and code snippets that should live in their \
	              own files.\n\nQuick start:\n  reflint init   Create a reflint.yaml\n  reflint \
	              check  Lint the current directory"
)]
pub struct ReflintCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to a config file. When absent, `reflint.yaml`,
	/// `.reflint.yaml` and `.config/reflint.yaml` are looked up in each
	/// lint root.
	#[arg(long, short, global = true)]
	pub config: Option<PathBuf>,

	/// Output format: `file-digest`, `logfmt`, `yaml` or `json`.
	#[arg(long, short, global = true)]
	pub format: Option<OutputFormat>,

	/// Least severe finding to display: `ERROR`, `WARNING` or `INFO`.
	#[arg(long, short, global = true)]
	pub level: Option<Severity>,

	/// Fail when more warnings than this are reported.
	#[arg(long, global = true)]
	pub max_warnings: Option<usize>,

	/// Directory names to skip wherever they appear in a path. Replaces the
	/// configured list. Accepts a comma separated list or repeated flags.
	#[arg(long, global = true, value_delimiter = ',')]
	pub ignore_dirs: Vec<String>,

	/// Report file paths relative to this directory instead of the lint
	/// root.
	#[arg(long, global = true)]
	pub relative_to: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

impl ReflintCli {
	/// Layer the command line flags over a loaded config.
	pub fn apply_overrides(&self, config: &mut ReflintConfig) {
		if let Some(level) = self.level {
			config.level = level;
		}

		if let Some(format) = self.format {
			config.format = Some(format);
		}

		if self.max_warnings.is_some() {
			config.max_warnings = self.max_warnings;
		}

		if !self.ignore_dirs.is_empty() {
			config.ignore_dirs.clone_from(&self.ignore_dirs);
		}
	}
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a commented sample `reflint.yaml`.
	///
	/// Writes the file into the given directory (the current directory by
	/// default). If a `reflint.yaml` already exists this command leaves it
	/// untouched and exits successfully.
	Init {
		/// Directory to create the config file in.
		#[arg(default_value = ".")]
		path: PathBuf,
	},
	/// Lint one or more documentation roots.
	///
	/// Every root is linted with its own config. Findings from all roots
	/// are rendered once at the end. Exits with `1` when any errors are
	/// found or the warning budget is exceeded, and with `2` when a root
	/// cannot be linted at all.
	Check {
		/// Directories to lint. Duplicates are collapsed.
		#[arg(default_value = ".")]
		paths: Vec<PathBuf>,

		/// Watch the roots for file changes and re-run the checks
		/// automatically.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
}
