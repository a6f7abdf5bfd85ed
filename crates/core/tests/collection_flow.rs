//! End-to-end engine flows against the scripted fake driver: session
//! acquisition, login, multi-pass collection, continuation, and the
//! headed retry protocol working together.

use futures::FutureExt;
use serde_json::json;

use wv::ops::posts::{self, TIMELINE};
use wv::session::login::AUTHED_MARKER;
use wv::testing::{FakeLauncher, FakePage, ScriptedPass};
use wv::{
	CollectParams, CookieRecord, Credential, SessionConfig, SessionController, SessionMode, cursor,
	ensure_authenticated,
};

fn post_json(id: &str) -> serde_json::Value {
	json!({
		"id": id,
		"author": "ada",
		"text": format!("post {id}"),
		"createdAt": "2026-07-01T10:00:00Z",
		"url": format!("https://weave.social/posts/{id}"),
	})
}

fn credential() -> Credential {
	Credential::new(
		vec![
			CookieRecord::new("weave_session", "sess", ".weave.social"),
			CookieRecord::new("weave_csrf", "csrf", ".weave.social"),
		],
		"browser:chrome",
	)
}

fn authed_feed_page(passes: Vec<ScriptedPass>) -> FakePage {
	let page = FakePage::with_passes(passes);
	page.add_selector(AUTHED_MARKER);
	page.add_selector(TIMELINE);
	page
}

#[tokio::test]
async fn authenticated_all_mode_collection_dedupes_across_passes() {
	let page = authed_feed_page(vec![
		ScriptedPass::new(json!([post_json("p1"), post_json("p2")]), 100.0),
		ScriptedPass::new(json!([post_json("p2"), post_json("p3")]), 200.0),
		ScriptedPass::new(json!([post_json("p2"), post_json("p3")]), 200.0),
		ScriptedPass::new(json!([post_json("p2"), post_json("p3")]), 200.0),
	]);
	let controller = SessionController::new(FakeLauncher::new(vec![page.clone()]), SessionConfig::default());
	let routes = wv::Routes::default();
	let cred = credential();

	let result = controller
		.run(|session| {
			let routes = routes.clone();
			let cred = cred.clone();
			async move {
				ensure_authenticated(session.page(), &routes, &cred, 100).await?;
				let params = CollectParams { all: true, ..CollectParams::default() };
				posts::fetch_user_posts(session.page(), &routes, "ada", &params, 100).await
			}
			.boxed()
		})
		.await
		.unwrap();

	let ids: Vec<&str> = result.items.iter().map(|p| p.id.as_str()).collect();
	assert_eq!(ids, vec!["p1", "p2", "p3"]);
	assert_eq!(page.injected_cookies().len(), 2);
	assert!(page.closed(), "session released after the operation");
}

#[tokio::test]
async fn continuation_cursor_paginates_across_independent_operations() {
	let feed = json!([
		post_json("p1"),
		post_json("p2"),
		post_json("p3"),
		post_json("p4"),
		post_json("p5"),
	]);
	let first_page = authed_feed_page(vec![ScriptedPass::new(feed.clone(), 100.0)]);
	let second_page = authed_feed_page(vec![ScriptedPass::new(feed, 100.0)]);
	let routes = wv::Routes::default();

	let run_with = |page: FakePage, cursor_token: Option<String>| {
		let routes = routes.clone();
		async move {
			let controller = SessionController::new(FakeLauncher::new(vec![page]), SessionConfig::default());
			controller
				.run(move |session| {
					let routes = routes.clone();
					let cursor_token = cursor_token.clone();
					async move {
						let params = CollectParams {
							count: 2,
							cursor: cursor_token,
							..CollectParams::default()
						};
						posts::fetch_user_posts(session.page(), &routes, "ada", &params, 100).await
					}
					.boxed()
				})
				.await
		}
	};

	let first = run_with(first_page, None).await.unwrap();
	let ids: Vec<&str> = first.items.iter().map(|p| p.id.as_str()).collect();
	assert_eq!(ids, vec!["p1", "p2"]);

	let token = first.next_cursor.expect("more items remain");
	assert_eq!(cursor::decode(&token).unwrap(), 2);

	let second = run_with(second_page, Some(token)).await.unwrap();
	let ids: Vec<&str> = second.items.iter().map(|p| p.id.as_str()).collect();
	assert_eq!(ids, vec!["p3", "p4"]);
	assert!(second.next_cursor.is_some(), "p5 still unread");
}

#[tokio::test]
async fn headless_render_failure_reruns_the_whole_read_headed() {
	// Headless page never renders the timeline; the headed page does.
	let broken = FakePage::new();
	broken.add_selector(AUTHED_MARKER);
	let rendered = authed_feed_page(vec![ScriptedPass::new(json!([post_json("p1")]), 100.0)]);

	let controller = SessionController::new(
		FakeLauncher::new(vec![broken.clone(), rendered.clone()]),
		SessionConfig::default(),
	);
	let routes = wv::Routes::default();

	let result = controller
		.run(|session| {
			let routes = routes.clone();
			async move {
				posts::fetch_user_posts(session.page(), &routes, "ada", &CollectParams::default(), 100).await
			}
			.boxed()
		})
		.await
		.unwrap();

	assert_eq!(result.items.len(), 1);
	assert_eq!(
		controller.launcher().launch_modes(),
		vec![SessionMode::Headless, SessionMode::Headed]
	);
	assert!(broken.closed() && rendered.closed());
}
