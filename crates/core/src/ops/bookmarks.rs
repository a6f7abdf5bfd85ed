//! Bookmark collection with per-item conversation expansion.
//!
//! The bookmark list is one collection; every bookmarked post then gets
//! its conversation page collected separately and filtered around the
//! bookmark as pivot.

use std::collections::HashSet;

use super::open_feed;
use super::posts::PostExtractor;
use crate::collect::collect;
use crate::conversation::{ExpandFlags, ThreadPost, expand};
use crate::error::Result;
use crate::model::{CollectParams, CollectionResult};
use crate::page::PageDriver;
use crate::routes::Routes;

pub const BOOKMARK_LIST: &str = "[data-testid=\"bookmark-list\"]";
pub const CONVERSATION: &str = "[data-testid=\"conversation\"]";

/// Pass budget for one conversation page; threads are short compared to
/// feeds.
const CONVERSATION_MAX_PAGES: u32 = 5;

/// Parameters for one bookmark read.
#[derive(Debug, Clone, Default)]
pub struct BookmarkParams {
	/// Pagination over the bookmark list itself.
	pub collect: CollectParams,
	/// Expansion applied around each bookmark within its conversation.
	pub flags: ExpandFlags,
	/// Re-sort the flattened output by post timestamp.
	pub chronological: bool,
}

/// Collects bookmarks, expands each one inside its conversation, and
/// returns the flattened selection. The continuation cursor paginates the
/// bookmark list, not the expanded output.
pub async fn fetch_bookmarks(
	page: &dyn PageDriver,
	routes: &Routes,
	params: &BookmarkParams,
	wait_timeout_ms: u64,
) -> Result<CollectionResult<ThreadPost>> {
	open_feed(page, &routes.bookmarks(), BOOKMARK_LIST, wait_timeout_ms).await?;
	let bookmarks = collect(page, &PostExtractor, &params.collect).await?;

	let thread_params = CollectParams {
		count: usize::MAX,
		all: true,
		max_pages: Some(CONVERSATION_MAX_PAGES),
		cursor: None,
		delay_ms: params.collect.delay_ms,
	};

	let mut warnings = bookmarks.warnings.clone();
	let mut seen: HashSet<String> = HashSet::new();
	let mut items: Vec<ThreadPost> = Vec::new();

	for pivot in &bookmarks.items {
		open_feed(page, &routes.post(&pivot.id), CONVERSATION, wait_timeout_ms).await?;
		let conversation = collect(page, &PostExtractor, &thread_params).await?;
		warnings.extend(conversation.warnings);

		for selected in expand(&conversation.items, pivot, &params.flags) {
			if seen.insert(selected.post.id.clone()) {
				items.push(selected);
			}
		}
	}

	if params.chronological {
		items.sort_by(|a, b| a.post.created_at.cmp(&b.post.created_at));
	}

	Ok(CollectionResult {
		items,
		next_cursor: bookmarks.next_cursor,
		pages_fetched: bookmarks.pages_fetched,
		warnings,
	})
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::super::posts::POSTS_SNIPPET;
	use super::*;
	use crate::testing::FakePage;

	fn post_json(id: &str, author: &str, created_at: &str) -> serde_json::Value {
		json!({
			"id": id,
			"author": author,
			"text": format!("{id} text"),
			"createdAt": created_at,
			"url": format!("https://weave.social/posts/{id}"),
		})
	}

	#[tokio::test]
	async fn expands_each_bookmark_inside_its_conversation() {
		let page = FakePage::new();
		page.add_selector(BOOKMARK_LIST);
		page.add_selector(CONVERSATION);

		// First eval serves the bookmark list; later evals serve the
		// conversation page.
		page.script_eval(
			POSTS_SNIPPET,
			json!([post_json("b1", "ada", "2026-07-02T00:00:00Z")]),
		);
		page.script_eval(
			POSTS_SNIPPET,
			json!([
				post_json("root", "ada", "2026-07-01T00:00:00Z"),
				post_json("b1", "ada", "2026-07-02T00:00:00Z"),
				post_json("reply", "brin", "2026-07-03T00:00:00Z"),
			]),
		);

		let params = BookmarkParams {
			collect: CollectParams { count: 5, ..CollectParams::default() },
			flags: ExpandFlags { author_chain: true, thread_meta: true, ..Default::default() },
			chronological: false,
		};
		let result = fetch_bookmarks(&page, &Routes::default(), &params, 100).await.unwrap();

		let ids: Vec<&str> = result.items.iter().map(|t| t.post.id.as_str()).collect();
		assert_eq!(ids, vec!["root", "b1"]);
		let pivot_meta = result.items[1].thread.unwrap();
		assert!(pivot_meta.pivot);
		assert_eq!(pivot_meta.position, 1);

		assert_eq!(
			page.visited(),
			vec![
				"https://weave.social/bookmarks",
				"https://weave.social/posts/b1",
			]
		);
	}

	#[tokio::test]
	async fn chronological_sort_is_an_explicit_opt_in() {
		let page = FakePage::new();
		page.add_selector(BOOKMARK_LIST);
		page.add_selector(CONVERSATION);

		page.script_eval(
			POSTS_SNIPPET,
			json!([post_json("late", "ada", "2026-07-09T00:00:00Z")]),
		);
		page.script_eval(
			POSTS_SNIPPET,
			json!([
				post_json("late", "ada", "2026-07-09T00:00:00Z"),
				post_json("early", "ada", "2026-07-01T00:00:00Z"),
			]),
		);

		let params = BookmarkParams {
			collect: CollectParams { count: 5, ..CollectParams::default() },
			flags: ExpandFlags { author_only: true, ..Default::default() },
			chronological: true,
		};
		let result = fetch_bookmarks(&page, &Routes::default(), &params, 100).await.unwrap();

		let ids: Vec<&str> = result.items.iter().map(|t| t.post.id.as_str()).collect();
		assert_eq!(ids, vec!["early", "late"], "explicit re-sort by timestamp");
	}

	#[tokio::test]
	async fn empty_bookmark_list_visits_no_conversations() {
		let page = FakePage::new();
		page.add_selector(BOOKMARK_LIST);
		page.script_eval(POSTS_SNIPPET, json!([]));

		let params = BookmarkParams::default();
		let result = fetch_bookmarks(&page, &Routes::default(), &params, 100).await.unwrap();

		assert!(result.items.is_empty());
		assert!(result.next_cursor.is_none());
		assert_eq!(page.visited(), vec!["https://weave.social/bookmarks"]);
	}
}
