//! Result rendering: JSON payloads on stdout, human context on stderr.

use colored::Colorize;
use serde::Serialize;

use wv::ops::membership::MembershipReport;
use wv::{CollectionResult, Diagnostic, DiagnosticLevel};

/// Prints resolver diagnostics to stderr, colored by severity.
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
	for diag in diagnostics {
		let line = match &diag.source {
			Some(source) => format!("[{source}] {}", diag.message),
			None => diag.message.clone(),
		};
		match diag.level {
			DiagnosticLevel::Info => eprintln!("{}", line.dimmed()),
			DiagnosticLevel::Warning => eprintln!("{}", line.yellow()),
			DiagnosticLevel::Error => eprintln!("{}", line.red()),
		}
	}
}

/// Emits a collection result as pretty JSON plus a stderr summary.
pub fn emit_collection<T: Serialize>(kind: &str, result: &CollectionResult<T>) -> anyhow::Result<()> {
	for warning in &result.warnings {
		eprintln!("{}", warning.yellow());
	}

	println!("{}", serde_json::to_string_pretty(result)?);

	let continuation = if result.next_cursor.is_some() {
		"more available (pass --cursor to continue)"
	} else {
		"end of results"
	};
	eprintln!(
		"{}",
		format!(
			"{} {kind} over {} page(s); {continuation}",
			result.items.len(),
			result.pages_fetched
		)
		.dimmed()
	);
	Ok(())
}

/// Emits a membership report as pretty JSON plus a stderr summary.
pub fn emit_membership(report: &MembershipReport) -> anyhow::Result<()> {
	println!("{}", serde_json::to_string_pretty(report)?);

	let s = report.summary;
	let line = format!(
		"{}: {} added, {} already, {} removed, {} error(s) of {} processed",
		report.group, s.added, s.already, s.removed, s.errors, s.processed
	);
	if s.errors > 0 {
		eprintln!("{}", line.yellow());
	} else {
		eprintln!("{}", line.green());
	}
	Ok(())
}
