use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use owo_colors::OwoColorize;
use reflint_cli::Commands;
use reflint_cli::ReflintCli;
use reflint_core::AnyEmptyResult;
use reflint_core::AnyResult;
use reflint_core::CONFIG_FILE_CANDIDATES;
use reflint_core::Findings;
use reflint_core::LintSummary;
use reflint_core::Linter;
use reflint_core::OutputFormat;
use reflint_core::ReflintConfig;
use reflint_core::ReflintError;
use reflint_core::ReflintResult;
use reflint_core::RenderOptions;
use reflint_core::SAMPLE_CONFIG;
use reflint_core::Severity;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = ReflintCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init { path }) => run_init(path),
		Some(Commands::Check { paths, watch }) => run_check(&args, paths, *watch),
		None => {
			eprintln!("No subcommand specified. Run `reflint --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<ReflintError>() {
			Ok(reflint_err) => report_error(*reflint_err),
			Err(e) => eprintln!("{} {e}", colored!("error:", red)),
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.init();
}

fn report_error(error: ReflintError) {
	let report: miette::Report = error.into();
	eprintln!("{report:?}");
}

fn run_init(path: &Path) -> AnyEmptyResult {
	if let Some(existing) = ReflintConfig::resolve_path(path) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	std::fs::create_dir_all(path)?;
	let config_path = path.join(CONFIG_FILE_CANDIDATES[0]);
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created {}", make_relative(&config_path, path));

	println!();
	println!("Next steps:");
	println!("  1. Adjust the directories and budgets in reflint.yaml");
	println!("  2. Run `reflint check` to lint the project");

	Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckOutcome {
	Pass,
	Fail,
	Fatal,
}

impl CheckOutcome {
	fn exit_code(self) -> i32 {
		match self {
			Self::Pass => 0,
			Self::Fail => 1,
			Self::Fatal => 2,
		}
	}
}

fn run_check(args: &ReflintCli, paths: &[PathBuf], watch: bool) -> AnyEmptyResult {
	let roots = resolve_roots(paths);
	let mut findings = Findings::new();
	let outcome = run_check_once(args, &roots, &mut findings)?;

	if !watch {
		if outcome != CheckOutcome::Pass {
			process::exit(outcome.exit_code());
		}
		return Ok(());
	}

	let watched: Vec<&PathBuf> = roots.iter().filter(|root| root.is_dir()).collect();
	if watched.is_empty() {
		process::exit(outcome.exit_code());
	}

	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let (tx, rx) = mpsc::channel();
	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_)
						| notify::EventKind::Create(_)
						| notify::EventKind::Remove(_)
				) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	for root in watched {
		tracing::debug!("watching {}", root.display());
		watcher.watch(root, notify::RecursiveMode::Recursive)?;
	}

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, checking...");
		if let Err(e) = run_check_once(args, &roots, &mut findings) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

/// Collapse duplicate roots. Existing roots are canonicalized so that the
/// same directory spelled two ways is linted once.
fn resolve_roots(paths: &[PathBuf]) -> Vec<PathBuf> {
	let mut seen = HashSet::new();
	let mut roots = Vec::new();

	for path in paths {
		let root = path.canonicalize().unwrap_or_else(|_| path.clone());
		if seen.insert(root.clone()) {
			roots.push(root);
		}
	}

	roots
}

/// Lint every root, render the findings once and decide the outcome.
/// `findings` is cleared first so watch runs can reuse it.
fn run_check_once(
	args: &ReflintCli,
	roots: &[PathBuf],
	findings: &mut Findings,
) -> AnyResult<CheckOutcome> {
	findings.clear();

	let relative_to = args
		.relative_to
		.as_ref()
		.map(|path| path.canonicalize().unwrap_or_else(|_| path.clone()));

	let mut summary = LintSummary::default();
	let mut display: Option<(OutputFormat, Severity)> = None;
	let mut max_warnings: Option<usize> = None;
	let mut fatal = false;

	for root in roots {
		match lint_root(args, root, relative_to.as_deref(), findings) {
			Ok((root_summary, config)) => {
				summary += root_summary;
				display.get_or_insert((config.format.unwrap_or_default(), config.level));
				max_warnings = match (max_warnings, config.max_warnings) {
					(Some(current), Some(limit)) => Some(current.min(limit)),
					(current, limit) => current.or(limit),
				};
			}
			Err(e) => {
				report_error(e);
				fatal = true;
			}
		}
	}

	let (format, threshold) = display.unwrap_or_else(|| {
		(
			args.format.unwrap_or_default(),
			args.level.unwrap_or(Severity::Info),
		)
	});
	let options = RenderOptions {
		threshold,
		color: color_enabled()
			&& supports_color::on(supports_color::Stream::Stdout).is_some(),
	};
	print!("{}", format.render(findings.as_slice(), &options)?);

	let passes = summary.passes(max_warnings);
	let status = if fatal {
		colored!("aborted", red)
	} else if passes {
		colored!("passed", green)
	} else {
		colored!("failed", red)
	};
	let warnings = format!("{} warning(s)", summary.warnings);
	eprintln!(
		"{status}: {}, {} error(s)",
		colored!(warnings, yellow),
		summary.errors
	);
	if let Some(limit) = max_warnings.filter(|limit| summary.warnings > *limit) {
		eprintln!("warning budget exceeded: {} > {limit}", summary.warnings);
	}

	let outcome = if fatal {
		CheckOutcome::Fatal
	} else if passes {
		CheckOutcome::Pass
	} else {
		CheckOutcome::Fail
	};
	Ok(outcome)
}

/// Load the config for `root`, apply command line overrides and lint it.
fn lint_root(
	args: &ReflintCli,
	root: &Path,
	relative_to: Option<&Path>,
	findings: &mut Findings,
) -> ReflintResult<(LintSummary, ReflintConfig)> {
	if !root.is_dir() {
		return Err(ReflintError::ProjectNotFound {
			path: root.display().to_string(),
		});
	}

	let mut config = match &args.config {
		Some(path) => ReflintConfig::load_from(path)?,
		None => ReflintConfig::load(root)?.unwrap_or_default(),
	};
	args.apply_overrides(&mut config);
	config.tokenizer = config.tokenizer_path(root);

	let linter = Linter::new(config.clone())?;
	let summary = linter.lint_project(root, relative_to, findings)?;
	Ok((summary, config))
}

fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
