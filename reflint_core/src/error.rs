use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ReflintError {
	#[error(transparent)]
	#[diagnostic(code(reflint::io_error))]
	Io(#[from] std::io::Error),

	#[error("project directory `{path}` does not exist or is not a directory")]
	#[diagnostic(
		code(reflint::project_not_found),
		help("pass an existing directory to `reflint check`")
	)]
	ProjectNotFound { path: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(reflint::config_parse),
		help("check that reflint.yaml is a valid YAML mapping of known keys")
	)]
	ConfigParse(String),

	#[error("invalid severity: `{0}`")]
	#[diagnostic(
		code(reflint::invalid_severity),
		help("supported severities: ERROR, WARNING, INFO")
	)]
	InvalidSeverity(String),

	#[error("invalid pattern `{pattern}`: {reason}")]
	#[diagnostic(code(reflint::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("unsupported output format: `{0}`")]
	#[diagnostic(
		code(reflint::unsupported_format),
		help("supported formats: file-digest, logfmt, yaml, json")
	)]
	UnsupportedFormat(String),

	#[error("failed to render findings: {0}")]
	#[diagnostic(code(reflint::render))]
	Render(String),
}

pub type ReflintResult<T> = Result<T, ReflintError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
