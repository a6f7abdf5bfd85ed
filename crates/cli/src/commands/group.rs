//! Group membership commands.

use futures::FutureExt;
use tracing::info;

use wv::ensure_authenticated;
use wv::ops::membership;

use super::AppContext;
use crate::output;

/// Applies one desired membership state to every target, then reports
/// per-target outcomes. Individual failures never abort the batch, so the
/// command itself only fails on setup or session errors.
pub async fn toggle(ctx: &AppContext, group: String, targets: Vec<String>, desired: bool) -> anyhow::Result<()> {
	info!(
		target = "wv",
		%group,
		targets = targets.len(),
		desired,
		"toggling group membership"
	);
	let credential = ctx.resolve_credential()?;
	let routes = ctx.routes.clone();
	let nav = ctx.config.nav_timeout_ms;
	let wait = ctx.config.wait_timeout_ms;

	let report = ctx
		.controller()
		.run(move |session| {
			let routes = routes.clone();
			let credential = credential.clone();
			let group = group.clone();
			let targets = targets.clone();
			async move {
				ensure_authenticated(session.page(), &routes, &credential, nav).await?;
				Ok(membership::apply_batch(session.page(), &routes, &group, &targets, desired, wait).await)
			}
			.boxed()
		})
		.await?;

	output::emit_membership(&report)
}
