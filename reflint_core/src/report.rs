use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;

use owo_colors::OwoColorize;
use serde::Deserialize;
use serde::Serialize;
use serde::ser::SerializeMap;

use crate::Finding;
use crate::ReflintError;
use crate::ReflintResult;
use crate::Severity;
use crate::finding::UNKNOWN_FILE;

/// How findings are rendered. Selected once per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum OutputFormat {
	/// Human-readable, grouped by file and sorted by line.
	#[default]
	FileDigest,
	/// One `key="value"` line per finding.
	Logfmt,
	Yaml,
	Json,
}

impl OutputFormat {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::FileDigest => "file-digest",
			Self::Logfmt => "logfmt",
			Self::Yaml => "yaml",
			Self::Json => "json",
		}
	}

	/// Render `findings` in this format.
	pub fn render(self, findings: &[Finding], options: &RenderOptions) -> ReflintResult<String> {
		match self {
			Self::FileDigest => Ok(render_file_digest(findings, options)),
			Self::Logfmt => Ok(render_logfmt(findings, options)),
			Self::Yaml => render_yaml(findings, options),
			Self::Json => render_json(findings, options),
		}
	}
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OutputFormat {
	type Err = ReflintError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
			"file-digest" | "digest" => Ok(Self::FileDigest),
			"logfmt" => Ok(Self::Logfmt),
			"yaml" | "yml" => Ok(Self::Yaml),
			"json" => Ok(Self::Json),
			_ => Err(ReflintError::UnsupportedFormat(value.to_string())),
		}
	}
}

impl TryFrom<String> for OutputFormat {
	type Error = ReflintError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<OutputFormat> for &'static str {
	fn from(value: OutputFormat) -> Self {
		value.as_str()
	}
}

/// Options shared by every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
	/// Least severe finding that is rendered.
	pub threshold: Severity,
	/// Emit ANSI colours. Only the file digest is coloured.
	pub color: bool,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			threshold: Severity::Info,
			color: false,
		}
	}
}

fn visible<'a>(findings: &'a [Finding], options: &RenderOptions) -> Vec<&'a Finding> {
	findings
		.iter()
		.filter(|finding| finding.severity.is_visible_at(options.threshold))
		.collect()
}

/// Group findings by display file. Files are sorted, findings within a file
/// are sorted by line (findings without a line first), and file-less findings
/// come last under `<unknown>` in collection order.
fn group_by_file<'a>(findings: &[&'a Finding]) -> Vec<(String, Vec<&'a Finding>)> {
	let mut groups: BTreeMap<String, Vec<&'a Finding>> = BTreeMap::new();
	let mut unknown = Vec::new();

	for finding in findings {
		if finding.file.is_some() {
			groups.entry(finding.display_file()).or_default().push(finding);
		} else {
			unknown.push(*finding);
		}
	}

	let mut grouped: Vec<_> = groups
		.into_iter()
		.map(|(file, mut items)| {
			items.sort_by_key(|finding| finding.line.unwrap_or(0));
			(file, items)
		})
		.collect();

	if !unknown.is_empty() {
		grouped.push((UNKNOWN_FILE.to_string(), unknown));
	}

	grouped
}

fn paint_severity(text: &str, severity: Severity, color: bool) -> String {
	if !color {
		return text.to_string();
	}

	match severity {
		Severity::Error => text.red().to_string(),
		Severity::Warning => text.yellow().to_string(),
		Severity::Info => text.blue().to_string(),
	}
}

/// Render findings grouped by file:
///
/// ```text
/// docs/AGENTS.md
///   (line 3):
///     ```bash
///     ^-- code-snippet-too-large (WARNING): Code snippet at line 3 has 6 lines (max: 3). …
/// ```
pub fn render_file_digest(findings: &[Finding], options: &RenderOptions) -> String {
	let visible = visible(findings, options);
	let mut output = String::new();

	for (file, items) in group_by_file(&visible) {
		let header = if options.color {
			file.bold().to_string()
		} else {
			file.clone()
		};
		let _ = writeln!(output, "\n{header}");

		for finding in items {
			let pointer = paint_severity(
				&format!(
					"^-- {} ({}): {}",
					finding.rule, finding.severity, finding.message
				),
				finding.severity,
				options.color,
			);

			match finding.line {
				Some(line) => {
					let _ = writeln!(output, "  (line {line}):");
					if let Some(content) = finding.line_content.as_deref() {
						let _ = writeln!(output, "    {content}");
					}
				}
				None if finding.file.is_some() => {
					let _ = writeln!(output, "  (no line number):");
				}
				None => {}
			}
			let _ = writeln!(output, "    {pointer}");
			output.push('\n');
		}
	}

	output
}

fn logfmt_value(value: &str) -> String {
	let escaped = value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n");
	format!("\"{escaped}\"")
}

/// Render one `key="value"` line per finding, in collection order.
pub fn render_logfmt(findings: &[Finding], options: &RenderOptions) -> String {
	let mut output = String::new();

	for finding in visible(findings, options) {
		let _ = write!(
			output,
			"level={} rule={} path={}",
			logfmt_value(finding.severity.as_str()),
			logfmt_value(finding.rule.as_str()),
			logfmt_value(&finding.display_file()),
		);
		if let Some(line) = finding.line {
			let _ = write!(output, " line={}", logfmt_value(&line.to_string()));
		}
		let _ = writeln!(output, " message={}", logfmt_value(&finding.message));
	}

	output
}

#[derive(Serialize)]
struct StructuredFinding<'a> {
	level: Severity,
	rule: &'static str,
	message: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	line: Option<usize>,
}

/// File groups serialized as an ordered map.
struct FileGroups<'a>(Vec<(String, Vec<StructuredFinding<'a>>)>);

impl Serialize for FileGroups<'_> {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.0.len()))?;
		for (file, findings) in &self.0 {
			map.serialize_entry(file, findings)?;
		}
		map.end()
	}
}

#[derive(Serialize)]
struct StructuredReport<'a> {
	files: FileGroups<'a>,
}

fn structured<'a>(findings: &'a [Finding], options: &RenderOptions) -> StructuredReport<'a> {
	let visible = visible(findings, options);
	let files = group_by_file(&visible)
		.into_iter()
		.map(|(file, items)| {
			let items = items
				.into_iter()
				.map(|finding| {
					StructuredFinding {
						level: finding.severity,
						rule: finding.rule.as_str(),
						message: &finding.message,
						line: finding.line,
					}
				})
				.collect();
			(file, items)
		})
		.collect();

	StructuredReport {
		files: FileGroups(files),
	}
}

/// Render findings as a YAML document with a `files` mapping.
pub fn render_yaml(findings: &[Finding], options: &RenderOptions) -> ReflintResult<String> {
	serde_yaml_ng::to_string(&structured(findings, options))
		.map_err(|e| ReflintError::Render(e.to_string()))
}

/// Render findings as pretty-printed JSON with the same shape as the YAML
/// output.
pub fn render_json(findings: &[Finding], options: &RenderOptions) -> ReflintResult<String> {
	let mut output = serde_json::to_string_pretty(&structured(findings, options))
		.map_err(|e| ReflintError::Render(e.to_string()))?;
	output.push('\n');
	Ok(output)
}
