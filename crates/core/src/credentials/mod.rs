//! Layered credential resolution for authenticated sessions.
//!
//! Resolution order is explicit pair, then the persisted record, then
//! extraction from external cookie stores in caller priority order. The
//! resolver never throws for the expected "nothing worked" outcome; it
//! returns [`Resolution::Missing`] with the diagnostics it accumulated.

use serde::{Deserialize, Serialize};

use crate::error::Result;

mod resolve;
mod store;

pub use resolve::{CredentialResolver, Resolution, ResolveRequest};
pub use store::CredentialStore;

/// Session cookie the platform requires on authenticated routes.
pub const SESSION_COOKIE: &str = "weave_session";
/// CSRF companion cookie; both must be present for a usable credential.
pub const CSRF_COOKIE: &str = "weave_csrf";

/// Source identifier recorded for explicitly supplied pairs.
pub const EXPLICIT_SOURCE: &str = "explicit";

/// One browser cookie in storage-state field layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
	pub name: String,
	pub value: String,
	pub domain: String,
	#[serde(default = "root_path")]
	pub path: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires: Option<f64>,
	#[serde(default)]
	pub http_only: bool,
	#[serde(default)]
	pub secure: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub same_site: Option<String>,
}

fn root_path() -> String {
	"/".to_string()
}

impl CookieRecord {
	/// A host-wide secure cookie, the shape the platform sets.
	pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			domain: domain.into(),
			path: root_path(),
			expires: None,
			http_only: true,
			secure: true,
			same_site: Some("Lax".to_string()),
		}
	}
}

/// The persisted credential record; replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
	pub cookies: Vec<CookieRecord>,
	pub source: String,
	pub created_at: String,
}

impl Credential {
	pub fn new(cookies: Vec<CookieRecord>, source: impl Into<String>) -> Self {
		Self {
			cookies,
			source: source.into(),
			created_at: chrono::Utc::now().to_rfc3339(),
		}
	}

	/// True when both required named cookies are present and non-empty.
	pub fn has_required_pair(&self) -> bool {
		has_required_pair(&self.cookies)
	}

	/// The cookies worth injecting into a fresh browsing context.
	pub fn injectable(&self) -> &[CookieRecord] {
		&self.cookies
	}
}

pub(crate) fn has_required_pair(cookies: &[CookieRecord]) -> bool {
	let has = |name: &str| cookies.iter().any(|c| c.name == name && !c.value.is_empty());
	has(SESSION_COOKIE) && has(CSRF_COOKIE)
}

/// External cookie-store collaborator (desktop browsers, exports).
///
/// Failures of any shape — missing store, permission denial, empty result
/// — are treated uniformly as "no credential from this attempt".
pub trait CookieSource: Send + Sync {
	/// Stable identifier, e.g. `browser:chrome`.
	fn id(&self) -> &str;

	fn extract(&self, domain: &str, profile_hint: Option<&str>) -> Result<Vec<CookieRecord>>;
}

/// Severity of a resolution diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
	Info,
	Warning,
	Error,
}

/// One resolution step's outcome, surfaced to the caller for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
	pub level: DiagnosticLevel,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
}

impl Diagnostic {
	pub fn info(message: impl Into<String>, source: Option<&str>) -> Self {
		Self::new(DiagnosticLevel::Info, message, source)
	}

	pub fn warning(message: impl Into<String>, source: Option<&str>) -> Self {
		Self::new(DiagnosticLevel::Warning, message, source)
	}

	pub fn error(message: impl Into<String>, source: Option<&str>) -> Self {
		Self::new(DiagnosticLevel::Error, message, source)
	}

	fn new(level: DiagnosticLevel, message: impl Into<String>, source: Option<&str>) -> Self {
		Self {
			level,
			message: message.into(),
			source: source.map(str::to_string),
		}
	}
}
