//! Post collection from profile timelines and conversation pages.

use async_trait::async_trait;

use super::{open_feed, parse_items};
use crate::collect::{PageExtractor, collect};
use crate::error::Result;
use crate::model::{CollectParams, CollectionResult, Post};
use crate::page::{PageDriver, Queryable as _};
use crate::routes::{Routes, parse_handle};

/// Container rendered around a profile's timeline.
pub const TIMELINE: &str = "[data-testid=\"profile-timeline\"]";

pub(crate) const POSTS_SNIPPET: &str = r#"Array.from(document.querySelectorAll('[data-testid="post-item"]')).map((el) => ({
	id: el.getAttribute('data-post-id'),
	author: el.querySelector('[data-testid="post-author"]')?.getAttribute('data-handle'),
	authorName: el.querySelector('[data-testid="post-author"]')?.textContent?.trim(),
	text: el.querySelector('[data-testid="post-text"]')?.textContent ?? '',
	createdAt: el.querySelector('time')?.getAttribute('datetime'),
	url: el.querySelector('a[data-testid="post-permalink"]')?.href,
}))"#;

/// Reads the posts currently rendered on the page.
pub struct PostExtractor;

#[async_trait]
impl PageExtractor for PostExtractor {
	type Item = Post;

	fn label(&self) -> &'static str {
		"posts"
	}

	async fn extract(&self, page: &dyn PageDriver) -> Result<Vec<Post>> {
		let payload = page.eval_json(POSTS_SNIPPET).await?;
		Ok(parse_items(payload, "post"))
	}
}

/// Collects a window of the given user's posts.
pub async fn fetch_user_posts(
	page: &dyn PageDriver,
	routes: &Routes,
	user: &str,
	params: &CollectParams,
	wait_timeout_ms: u64,
) -> Result<CollectionResult<Post>> {
	let handle = parse_handle(user)?;
	open_feed(page, &routes.profile(&handle), TIMELINE, wait_timeout_ms).await?;
	collect(page, &PostExtractor, params).await
}
