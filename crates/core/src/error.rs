//! Error taxonomy shared across the engine.

use thiserror::Error;

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WvError>;

/// Failures surfaced by engine operations.
#[derive(Debug, Error)]
pub enum WvError {
	/// A user-supplied identifier or URL could not be understood.
	#[error("invalid reference: {0}")]
	InvalidReference(String),

	/// A pagination token was empty, malformed, or from an unknown schema.
	#[error("invalid cursor: {0}")]
	InvalidCursor(String),

	/// A cursor offset outside the encodable range was supplied.
	#[error("cursor offset must be non-negative, got {0}")]
	InvalidOffset(i64),

	/// The session is not logged in and the route requires it.
	#[error("not logged in; run `wv auth login` or pass --session/--csrf")]
	AuthRequired,

	/// Expected content never rendered within the wait budget.
	///
	/// `recoverable` marks timeouts that are worth one retry in headed
	/// mode; [`WvError::into_final`] clears it before an error leaves the
	/// session controller.
	#[error("timed out after {ms}ms waiting for {what}")]
	RenderTimeout {
		what: String,
		ms: u64,
		recoverable: bool,
	},

	/// An expected UI affordance was absent; the site layout may have changed.
	#[error("element not found: {selector} ({context}); the site layout may have changed")]
	SelectorNotFound { selector: String, context: String },

	/// Every credential source was tried and none produced a usable pair.
	#[error("no usable credential: {0}")]
	ExtractionFailure(String),

	/// A single membership toggle failed; collected per target, never fatal
	/// to a batch.
	#[error("membership change failed for {target}: {detail}")]
	Membership { target: String, detail: String },

	/// Browser launch or protocol-level failure.
	#[error("browser error: {0}")]
	Browser(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl WvError {
	/// Builds a render timeout that the session controller may retry in
	/// headed mode.
	pub fn render_timeout(what: impl Into<String>, ms: u64) -> Self {
		Self::RenderTimeout {
			what: what.into(),
			ms,
			recoverable: true,
		}
	}

	/// True when a headless attempt may be re-run headed.
	pub fn is_headless_recoverable(&self) -> bool {
		matches!(self, Self::RenderTimeout { recoverable: true, .. })
	}

	/// Strips the internal recoverability marker before an error reaches
	/// the caller.
	pub fn into_final(self) -> Self {
		match self {
			Self::RenderTimeout { what, ms, .. } => Self::RenderTimeout {
				what,
				ms,
				recoverable: false,
			},
			other => other,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn render_timeout_is_recoverable_until_finalized() {
		let err = WvError::render_timeout("[data-testid=\"post-item\"]", 8000);
		assert!(err.is_headless_recoverable());

		let finalized = err.into_final();
		assert!(!finalized.is_headless_recoverable());
		assert!(matches!(
			finalized,
			WvError::RenderTimeout { recoverable: false, ms: 8000, .. }
		));
	}

	#[test]
	fn into_final_leaves_other_variants_alone() {
		let err = WvError::AuthRequired.into_final();
		assert!(matches!(err, WvError::AuthRequired));
	}
}
