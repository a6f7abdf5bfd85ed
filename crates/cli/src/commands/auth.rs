//! Credential management commands.
//!
//! `login` opens a headed browser for a manual sign-in and captures the
//! resulting cookie pair through the credential store; `status` and
//! `clear` inspect and drop the persisted record.

use anyhow::bail;
use colored::Colorize;
use futures::FutureExt;
use tracing::info;

use wv::page::Navigable as _;
use wv::session::SessionConfig;
use wv::{Credential, SessionMode};

use super::AppContext;

/// Source identifier recorded for interactively captured sessions.
const MANUAL_SOURCE: &str = "manual";

/// Opens a headed browser at the login page, waits for the user to sign
/// in, then captures and persists the session cookies.
pub async fn login(ctx: &AppContext, timeout_secs: u64) -> anyhow::Result<()> {
	let routes = ctx.routes.clone();
	info!(target = "wv", url = %routes.login(), "starting interactive login");

	// Interactive login always runs headed, whatever the global flags say.
	let config = SessionConfig {
		mode: SessionMode::Headed,
		mode_pinned: true,
		..ctx.config
	};
	let controller = wv::SessionController::new(crate::browser::ChromiumLauncher::new(), config);

	let base = routes.home();
	let cookies = controller
		.run(move |session| {
			let routes = routes.clone();
			let base = base.clone();
			async move {
				session.page().goto(&routes.login()).await?;

				println!("Browser opened at: {}", routes.login());
				println!();
				println!("Log in manually, then press Enter to save the session.");
				println!("(Or wait {timeout_secs} seconds for auto-save)");

				let stdin_future = tokio::task::spawn_blocking(|| {
					let mut input = String::new();
					std::io::stdin().read_line(&mut input).ok();
				});
				let timeout_future = tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs));

				tokio::select! {
					_ = stdin_future => println!("Saving session..."),
					_ = timeout_future => println!("\nTimeout reached, saving session..."),
				}

				session.page().cookies(&base).await
			}
			.boxed()
		})
		.await?;

	let credential = Credential::new(cookies, MANUAL_SOURCE);
	if !credential.has_required_pair() {
		bail!(
			"the browser session did not contain the {} and {} cookies; was the login completed?",
			wv::credentials::SESSION_COOKIE,
			wv::credentials::CSRF_COOKIE
		);
	}

	ctx.store.save(&credential)?;
	println!();
	println!("Credential saved to: {}", ctx.store.path().display());
	println!("  Cookies captured: {}", credential.cookies.len());
	Ok(())
}

/// Prints a summary of the persisted credential.
pub fn status(ctx: &AppContext) -> anyhow::Result<()> {
	let Some(credential) = ctx.store.load() else {
		println!("No stored credential ({})", ctx.store.path().display());
		return Ok(());
	};

	println!("Credential file: {}", ctx.store.path().display());
	println!("  Source:  {}", credential.source);
	println!("  Created: {}", credential.created_at);
	println!(
		"  Required pair: {}",
		if credential.has_required_pair() {
			"present".green()
		} else {
			"missing".red()
		}
	);
	println!("  Cookies ({}):", credential.cookies.len());
	for cookie in &credential.cookies {
		let value = if cookie.value.len() > 12 {
			format!("{}...", &cookie.value[..12])
		} else {
			cookie.value.clone()
		};
		println!("    {:<20} {:<16} {}", cookie.name, value, cookie.domain);
	}
	Ok(())
}

/// Removes the persisted credential.
pub fn clear(ctx: &AppContext) -> anyhow::Result<()> {
	if ctx.store.clear()? {
		println!("Credential removed: {}", ctx.store.path().display());
	} else {
		println!("No stored credential to remove");
	}
	Ok(())
}
