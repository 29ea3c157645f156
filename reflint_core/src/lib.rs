//! `reflint_core` is the engine behind the `reflint` markdown linter. It
//! checks that a documentation tree is internally consistent: files referenced
//! from markdown exist, files placed in resource directories are referenced
//! from somewhere, and documents and code snippets stay within size budgets.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Entry document (AGENTS.md, SKILL.md, ...)
//!   -> Extractor (inline code paths, links, images, attachments)
//!   -> Resolver (raw reference + source file -> canonical project path)
//!   -> Walker (one extra hop into referenced markdown files)
//!   -> Scanner (files under assets/, references/, scripts/)
//!   -> Consistency check (files on disk vs. canonical reference set)
//! ```
//!
//! Every check appends to a run-scoped [`Findings`] collector and returns a
//! [`Tally`] of the warnings and errors it added. Rendering happens once at
//! the end through [`OutputFormat::render`].
//!
//! ## Modules
//!
//! - [`extractor`]: raw reference extraction in four syntaxes.
//! - [`resolver`]: path normalization and canonical paths.
//! - [`walker`]: reference set construction with one-hop following.
//! - [`scanner`]: resource file enumeration with segment-based ignores.
//! - [`consistency`]: unreferenced resource detection.
//! - [`budget`]: token and line ceilings, with an optional exact tokenizer.
//! - [`lint`]: the [`Linter`] that runs every check over a project root.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use reflint_core::Findings;
//! use reflint_core::Linter;
//! use reflint_core::OutputFormat;
//! use reflint_core::ReflintConfig;
//! use reflint_core::RenderOptions;
//!
//! let root = Path::new(".");
//! let config = ReflintConfig::load(root).unwrap().unwrap_or_default();
//! let linter = Linter::new(config).unwrap();
//!
//! let mut findings = Findings::new();
//! let summary = linter.lint_project(root, None, &mut findings).unwrap();
//! let output = OutputFormat::FileDigest
//! 	.render(findings.as_slice(), &RenderOptions::default())
//! 	.unwrap();
//! print!("{output}");
//!
//! if !summary.passes(linter.config().max_warnings) {
//! 	std::process::exit(1);
//! }
//! ```

pub use config::*;
pub use error::*;
pub use finding::*;
pub use lines::count_lines;
pub use lint::*;
pub use report::*;

pub mod budget;
pub mod config;
pub mod consistency;
pub mod document;
#[allow(unused_assignments)]
mod error;
pub mod extractor;
mod finding;
pub(crate) mod lines;
mod lint;
pub mod links;
pub mod project;
mod report;
pub mod resolver;
pub mod scanner;
pub mod snippets;
pub mod walker;

#[cfg(test)]
mod __fixtures;
