//! Route building and reference validation for the target application.

use url::Url;

use crate::error::{Result, WvError};

/// Default platform origin; overridable for staging mirrors.
pub const DEFAULT_BASE_URL: &str = "https://weave.social";

/// URL builder rooted at the platform origin.
#[derive(Debug, Clone)]
pub struct Routes {
	base: Url,
}

impl Default for Routes {
	fn default() -> Self {
		Self {
			base: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
		}
	}
}

impl Routes {
	pub fn new(base: &str) -> Result<Self> {
		let base = Url::parse(base).map_err(|e| WvError::InvalidReference(format!("base url {base:?}: {e}")))?;
		if base.host_str().is_none() {
			return Err(WvError::InvalidReference(format!("base url {base} has no host")));
		}
		Ok(Self { base })
	}

	/// Cookie domain for credential extraction.
	pub fn domain(&self) -> &str {
		self.base.host_str().unwrap_or_default()
	}

	pub fn home(&self) -> String {
		self.join("/home")
	}

	pub fn login(&self) -> String {
		self.join("/login")
	}

	pub fn profile(&self, handle: &str) -> String {
		self.join(&format!("/@{handle}"))
	}

	pub fn news(&self) -> String {
		self.join("/explore/news")
	}

	pub fn bookmarks(&self) -> String {
		self.join("/bookmarks")
	}

	pub fn post(&self, id: &str) -> String {
		self.join(&format!("/posts/{id}"))
	}

	pub fn search_accounts(&self, query: &str) -> String {
		self.search("users", query)
	}

	pub fn search_groups(&self, query: &str) -> String {
		self.search("groups", query)
	}

	fn search(&self, kind: &str, query: &str) -> String {
		let mut url = self.base.clone();
		url.set_path("/search");
		url.query_pairs_mut().append_pair("kind", kind).append_pair("q", query);
		url.to_string()
	}

	fn join(&self, path: &str) -> String {
		let mut url = self.base.clone();
		url.set_path(path);
		url.to_string()
	}
}

/// Normalizes a user reference (`handle`, `@handle`, or profile URL) to a
/// bare handle.
pub fn parse_handle(input: &str) -> Result<String> {
	let trimmed = input.trim();
	let candidate = if let Ok(url) = Url::parse(trimmed) {
		url.path_segments()
			.and_then(|mut segments| segments.next().map(str::to_string))
			.unwrap_or_default()
	} else {
		trimmed.to_string()
	};
	let handle = candidate.trim_start_matches('@');

	if handle.is_empty() {
		return Err(WvError::InvalidReference(format!("empty handle in {input:?}")));
	}
	if !handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
		return Err(WvError::InvalidReference(format!("{input:?} is not a valid handle")));
	}
	Ok(handle.to_string())
}

/// Normalizes a post reference (bare id or permalink URL) to a post id.
pub fn parse_post_ref(input: &str) -> Result<String> {
	let trimmed = input.trim();
	if trimmed.is_empty() {
		return Err(WvError::InvalidReference("empty post reference".into()));
	}

	if let Ok(url) = Url::parse(trimmed) {
		let id = url
			.path_segments()
			.and_then(|segments| {
				let parts: Vec<_> = segments.collect();
				match parts.as_slice() {
					["posts", id, ..] if !id.is_empty() => Some((*id).to_string()),
					_ => None,
				}
			})
			.ok_or_else(|| WvError::InvalidReference(format!("{trimmed:?} is not a post permalink")))?;
		return Ok(id);
	}

	if trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
		Ok(trimmed.to_string())
	} else {
		Err(WvError::InvalidReference(format!("{trimmed:?} is not a post id")))
	}
}
