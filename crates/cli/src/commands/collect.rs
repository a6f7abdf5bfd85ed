//! Collection command handlers.

use futures::FutureExt;
use tracing::info;

use wv::ops::bookmarks::BookmarkParams;
use wv::ops::{accounts as accounts_op, bookmarks as bookmarks_op, groups as groups_op, news as news_op, posts as posts_op};
use wv::{CollectParams, ensure_authenticated};

use super::AppContext;
use crate::output;

pub async fn posts(ctx: &AppContext, user: String, params: CollectParams) -> anyhow::Result<()> {
	info!(target = "wv", %user, "collecting posts");
	let credential = ctx.resolve_credential()?;
	let routes = ctx.routes.clone();
	let nav = ctx.config.nav_timeout_ms;
	let wait = ctx.config.wait_timeout_ms;

	let result = ctx
		.controller()
		.run(move |session| {
			let routes = routes.clone();
			let credential = credential.clone();
			let params = params.clone();
			let user = user.clone();
			async move {
				ensure_authenticated(session.page(), &routes, &credential, nav).await?;
				posts_op::fetch_user_posts(session.page(), &routes, &user, &params, wait).await
			}
			.boxed()
		})
		.await?;

	output::emit_collection("posts", &result)
}

pub async fn accounts(ctx: &AppContext, query: String, params: CollectParams) -> anyhow::Result<()> {
	info!(target = "wv", %query, "searching accounts");
	let credential = ctx.resolve_credential()?;
	let routes = ctx.routes.clone();
	let nav = ctx.config.nav_timeout_ms;
	let wait = ctx.config.wait_timeout_ms;

	let result = ctx
		.controller()
		.run(move |session| {
			let routes = routes.clone();
			let credential = credential.clone();
			let params = params.clone();
			let query = query.clone();
			async move {
				ensure_authenticated(session.page(), &routes, &credential, nav).await?;
				accounts_op::search_accounts(session.page(), &routes, &query, &params, wait).await
			}
			.boxed()
		})
		.await?;

	output::emit_collection("accounts", &result)
}

pub async fn groups(ctx: &AppContext, query: String, params: CollectParams) -> anyhow::Result<()> {
	info!(target = "wv", %query, "searching groups");
	let credential = ctx.resolve_credential()?;
	let routes = ctx.routes.clone();
	let nav = ctx.config.nav_timeout_ms;
	let wait = ctx.config.wait_timeout_ms;

	let result = ctx
		.controller()
		.run(move |session| {
			let routes = routes.clone();
			let credential = credential.clone();
			let params = params.clone();
			let query = query.clone();
			async move {
				ensure_authenticated(session.page(), &routes, &credential, nav).await?;
				groups_op::search_groups(session.page(), &routes, &query, &params, wait).await
			}
			.boxed()
		})
		.await?;

	output::emit_collection("groups", &result)
}

pub async fn news(ctx: &AppContext, params: CollectParams) -> anyhow::Result<()> {
	info!(target = "wv", "collecting news");
	let credential = ctx.resolve_credential()?;
	let routes = ctx.routes.clone();
	let nav = ctx.config.nav_timeout_ms;
	let wait = ctx.config.wait_timeout_ms;

	let result = ctx
		.controller()
		.run(move |session| {
			let routes = routes.clone();
			let credential = credential.clone();
			let params = params.clone();
			async move {
				ensure_authenticated(session.page(), &routes, &credential, nav).await?;
				news_op::fetch_news(session.page(), &routes, &params, wait).await
			}
			.boxed()
		})
		.await?;

	output::emit_collection("news", &result)
}

pub async fn bookmarks(ctx: &AppContext, params: BookmarkParams) -> anyhow::Result<()> {
	info!(target = "wv", "collecting bookmarks");
	let credential = ctx.resolve_credential()?;
	let routes = ctx.routes.clone();
	let nav = ctx.config.nav_timeout_ms;
	let wait = ctx.config.wait_timeout_ms;

	let result = ctx
		.controller()
		.run(move |session| {
			let routes = routes.clone();
			let credential = credential.clone();
			let params = params.clone();
			async move {
				ensure_authenticated(session.page(), &routes, &credential, nav).await?;
				bookmarks_op::fetch_bookmarks(session.page(), &routes, &params, wait).await
			}
			.boxed()
		})
		.await?;

	output::emit_collection("bookmarks", &result)
}
