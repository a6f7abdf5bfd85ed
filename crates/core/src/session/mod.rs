//! Browser-session lifecycle for one logical operation.
//!
//! The controller owns exactly one [`SessionHandle`] per operation,
//! guarantees teardown on every exit path, and implements the
//! headless→headed retry protocol for recoverable render failures.

use async_trait::async_trait;

/// Headless/headed one-shot retry orchestration.
pub mod controller;
/// Login-state detection against authenticated routes.
pub mod login;

pub use controller::{SessionConfig, SessionController};
pub use login::{LoginState, detect_login_state, ensure_authenticated};

use crate::error::Result;
use crate::page::PageDriver;

/// Whether a browser session renders to a visible surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
	Headless,
	Headed,
}

impl std::fmt::Display for SessionMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Headless => write!(f, "headless"),
			Self::Headed => write!(f, "headed"),
		}
	}
}

/// Launch seam implemented by the concrete browser driver.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
	async fn launch(&self, mode: SessionMode) -> Result<SessionHandle>;
}

/// One live browser page, owned for the duration of a single operation.
/// Never shared across concurrent operations.
pub struct SessionHandle {
	page: Box<dyn PageDriver>,
	mode: SessionMode,
}

impl SessionHandle {
	pub fn new(page: Box<dyn PageDriver>, mode: SessionMode) -> Self {
		Self { page, mode }
	}

	pub fn page(&self) -> &dyn PageDriver {
		self.page.as_ref()
	}

	pub fn mode(&self) -> SessionMode {
		self.mode
	}

	/// Releases the underlying browser resources.
	pub async fn close(&self) -> Result<()> {
		self.page.close().await
	}
}
