use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::ReflintConfig;
use crate::Severity;

pub(crate) fn tempdir() -> TempDir {
	tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"))
}

/// Write `content` to `root/relative`, creating parent directories.
pub(crate) fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
	path
}

/// A project with a root `AGENTS.md` that references two of its three
/// resource files, one of them through a nested markdown guide.
pub(crate) fn agents_project() -> TempDir {
	let tmp = tempdir();
	let root = tmp.path();

	write_file(
		root,
		"AGENTS.md",
		"# Agents\n\nRun `scripts/build.sh` before committing.\n\nSee the [guide](docs/guide.md).\n",
	);
	write_file(
		root,
		"docs/guide.md",
		"# Guide\n\n![Logo](../assets/logo.png)\n",
	);
	write_file(root, "scripts/build.sh", "#!/bin/sh\necho build\n");
	write_file(root, "assets/logo.png", "png");
	write_file(root, "assets/orphan.txt", "nobody links here");

	tmp
}

/// Content with `lines` lines and no trailing newline.
pub(crate) fn content_with_lines(lines: usize) -> String {
	(1..=lines)
		.map(|line| format!("line {line}"))
		.collect::<Vec<_>>()
		.join("\n")
}

/// Defaults with the root `AGENTS.md` check silenced.
pub(crate) fn quiet_config() -> ReflintConfig {
	ReflintConfig {
		missing_agents_file_level: Severity::Info,
		..ReflintConfig::default()
	}
}

pub(crate) fn strings(values: &[&str]) -> Vec<String> {
	values.iter().map(ToString::to_string).collect()
}
