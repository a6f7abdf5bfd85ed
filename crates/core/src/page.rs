//! Capability boundary over the external page-automation collaborator.
//!
//! The engine drives exactly one page per logical operation and only ever
//! talks to it through these traits: navigate, read, interact, wait. No
//! automation-library types cross this boundary; concrete drivers live in
//! the binary crate.

use async_trait::async_trait;

use crate::credentials::CookieRecord;
use crate::error::Result;

/// Navigation and session-state capabilities.
#[async_trait]
pub trait Navigable: Send + Sync {
	/// Navigates the page and waits for the load to settle.
	async fn goto(&self, url: &str) -> Result<()>;

	/// Returns the page's current URL.
	async fn current_url(&self) -> Result<String>;

	/// Reads the cookies visible to the given URL.
	async fn cookies(&self, url: &str) -> Result<Vec<CookieRecord>>;

	/// Injects cookies into the browsing context before authenticated
	/// navigation.
	async fn inject_cookies(&self, cookies: &[CookieRecord]) -> Result<()>;
}

/// Read-only DOM query capabilities.
#[async_trait]
pub trait Queryable: Send + Sync {
	/// Evaluates a JS expression in the page and returns its JSON value.
	async fn eval_json(&self, expression: &str) -> Result<serde_json::Value>;

	/// True when at least one element matches the selector right now.
	async fn exists(&self, selector: &str) -> Result<bool>;

	/// Text content of the first match, if any.
	async fn text_of(&self, selector: &str) -> Result<Option<String>>;
}

/// User-gesture capabilities.
#[async_trait]
pub trait Interactable: Send + Sync {
	/// Clicks the first element matching the selector.
	async fn click(&self, selector: &str) -> Result<()>;

	/// Types text into the first element matching the selector.
	async fn type_text(&self, selector: &str, text: &str) -> Result<()>;

	/// Scrolls to the bottom of the document and returns the post-scroll
	/// scrollable height. Collection passes compare successive heights to
	/// decide whether further content can still load.
	async fn scroll_to_bottom(&self) -> Result<f64>;
}

/// Bounded waiting capabilities.
#[async_trait]
pub trait Waitable: Send + Sync {
	/// Waits until the selector matches, failing with a recoverable
	/// [`WvError::RenderTimeout`](crate::WvError::RenderTimeout) once the
	/// budget is exhausted.
	async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()>;
}

/// The full capability set one browser page must provide.
#[async_trait]
pub trait PageDriver: Navigable + Queryable + Interactable + Waitable {
	/// Releases the underlying page and browser resources.
	async fn close(&self) -> Result<()>;
}
