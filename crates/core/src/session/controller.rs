//! Session acquisition and the headless→headed retry protocol.

use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use super::{BrowserLauncher, SessionHandle, SessionMode};
use crate::error::{Result, WvError};

/// Mode selection and wait budgets for sessions built by a controller.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
	/// Mode for the first attempt.
	pub mode: SessionMode,
	/// True when the caller forced a mode; disables the headed retry.
	pub mode_pinned: bool,
	/// Budget for navigations and login detection, in milliseconds.
	pub nav_timeout_ms: u64,
	/// Budget for individual element waits, in milliseconds.
	pub wait_timeout_ms: u64,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			mode: SessionMode::Headless,
			mode_pinned: false,
			nav_timeout_ms: 30_000,
			wait_timeout_ms: 10_000,
		}
	}
}

impl SessionConfig {
	/// Pins the given mode, opting out of the headed retry.
	pub fn pinned(mode: SessionMode) -> Self {
		Self {
			mode,
			mode_pinned: true,
			..Self::default()
		}
	}
}

/// Runs logical operations inside scoped browser sessions.
pub struct SessionController<L> {
	launcher: L,
	config: SessionConfig,
}

impl<L: BrowserLauncher> SessionController<L> {
	pub fn new(launcher: L, config: SessionConfig) -> Self {
		Self { launcher, config }
	}

	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	/// Returns the launcher backing this controller.
	pub fn launcher(&self) -> &L {
		&self.launcher
	}

	/// Runs `op` in a fresh session, retrying the entire operation once in
	/// headed mode when a headless attempt fails with a recoverable render
	/// failure. The recoverability marker never escapes this method.
	pub async fn run<T, F>(&self, op: F) -> Result<T>
	where
		F: for<'a> Fn(&'a SessionHandle) -> BoxFuture<'a, Result<T>>,
	{
		let first = self.attempt(self.config.mode, &op).await;
		match first {
			Err(err) if self.headed_retry_applies(&err) => {
				info!(
					target = "wv.session",
					error = %err,
					"headless attempt failed with a recoverable render failure; retrying headed"
				);
				self.attempt(SessionMode::Headed, &op).await.map_err(WvError::into_final)
			}
			other => other.map_err(WvError::into_final),
		}
	}

	fn headed_retry_applies(&self, err: &WvError) -> bool {
		err.is_headless_recoverable()
			&& !self.config.mode_pinned
			&& self.config.mode == SessionMode::Headless
	}

	async fn attempt<T, F>(&self, mode: SessionMode, op: &F) -> Result<T>
	where
		F: for<'a> Fn(&'a SessionHandle) -> BoxFuture<'a, Result<T>>,
	{
		let handle = self.launcher.launch(mode).await?;
		debug!(target = "wv.session", %mode, "session acquired");

		let result = op(&handle).await;

		// Teardown runs on every exit path; a close failure must not mask
		// the operation's own outcome.
		if let Err(close_err) = handle.close().await {
			warn!(target = "wv.session", error = %close_err, "session teardown failed");
		}
		debug!(target = "wv.session", %mode, ok = result.is_ok(), "session released");

		result
	}
}

#[cfg(test)]
mod tests {
	use futures::FutureExt;

	use super::*;
	use crate::page::{Navigable as _, Waitable as _};
	use crate::testing::{FakeLauncher, FakePage};

	const MARKER: &str = "[data-testid=\"post-item\"]";

	fn controller_with(pages: Vec<FakePage>, config: SessionConfig) -> SessionController<FakeLauncher> {
		SessionController::new(FakeLauncher::new(pages), config)
	}

	#[tokio::test]
	async fn successful_operation_uses_one_headless_session() {
		let page = FakePage::new();
		page.add_selector(MARKER);
		let controller = controller_with(vec![page.clone()], SessionConfig::default());

		let out = controller
			.run(|session| {
				async move {
					session.page().wait_for_selector(MARKER, 100).await?;
					Ok(11)
				}
				.boxed()
			})
			.await
			.unwrap();

		assert_eq!(out, 11);
		assert_eq!(controller.launcher.launch_modes(), vec![SessionMode::Headless]);
		assert!(page.closed(), "session must be released on success");
	}

	#[tokio::test]
	async fn recoverable_render_failure_retries_entire_operation_headed() {
		let blank = FakePage::new();
		let rendered = FakePage::new();
		rendered.add_selector(MARKER);
		let controller = controller_with(vec![blank.clone(), rendered.clone()], SessionConfig::default());

		let out = controller
			.run(|session| {
				async move {
					session.page().goto("https://weave.social/home").await?;
					session.page().wait_for_selector(MARKER, 100).await?;
					Ok("collected")
				}
				.boxed()
			})
			.await
			.unwrap();

		assert_eq!(out, "collected");
		assert_eq!(
			controller.launcher.launch_modes(),
			vec![SessionMode::Headless, SessionMode::Headed]
		);
		assert_eq!(blank.visited().len(), 1, "first attempt ran the operation");
		assert_eq!(rendered.visited().len(), 1, "second attempt re-ran it from scratch");
		assert!(blank.closed() && rendered.closed(), "both sessions released");
	}

	#[tokio::test]
	async fn pinned_mode_disables_the_headed_retry() {
		let blank = FakePage::new();
		let controller = controller_with(vec![blank.clone()], SessionConfig::pinned(SessionMode::Headless));

		let err = controller
			.run(|session| {
				async move {
					session.page().wait_for_selector(MARKER, 100).await?;
					Ok(())
				}
				.boxed()
			})
			.await
			.unwrap_err();

		assert_eq!(controller.launcher.launch_modes(), vec![SessionMode::Headless]);
		assert!(
			matches!(err, WvError::RenderTimeout { recoverable: false, .. }),
			"marker must be stripped before the caller sees the error"
		);
		assert!(blank.closed(), "session released on the failure path");
	}

	#[tokio::test]
	async fn second_failure_is_final_and_stripped() {
		let first = FakePage::new();
		let second = FakePage::new();
		let controller = controller_with(vec![first, second], SessionConfig::default());

		let err = controller
			.run(|session| {
				async move {
					session.page().wait_for_selector(MARKER, 100).await?;
					Ok(())
				}
				.boxed()
			})
			.await
			.unwrap_err();

		assert_eq!(
			controller.launcher.launch_modes(),
			vec![SessionMode::Headless, SessionMode::Headed]
		);
		assert!(matches!(err, WvError::RenderTimeout { recoverable: false, .. }));
	}

	#[tokio::test]
	async fn non_recoverable_failures_do_not_retry() {
		let page = FakePage::new();
		let controller = controller_with(vec![page], SessionConfig::default());

		let err = controller
			.run(|_| async { Err::<(), _>(WvError::AuthRequired) }.boxed())
			.await
			.unwrap_err();

		assert_eq!(controller.launcher.launch_modes(), vec![SessionMode::Headless]);
		assert!(matches!(err, WvError::AuthRequired));
	}
}
