//! Group search collection.

use async_trait::async_trait;

use super::{open_feed, parse_items};
use crate::collect::{PageExtractor, collect};
use crate::error::Result;
use crate::model::{CollectParams, CollectionResult, Group};
use crate::page::{PageDriver, Queryable as _};
use crate::routes::Routes;

pub const SEARCH_RESULTS: &str = "[data-testid=\"search-results\"]";

const GROUPS_SNIPPET: &str = r#"Array.from(document.querySelectorAll('[data-testid="group-item"]')).map((el) => {
	const count = el.getAttribute('data-member-count');
	return {
		id: el.getAttribute('data-group-id'),
		name: el.querySelector('[data-testid="group-name"]')?.textContent?.trim(),
		memberCount: count === null ? null : Number(count),
		url: el.querySelector('a')?.href,
	};
})"#;

pub struct GroupExtractor;

#[async_trait]
impl PageExtractor for GroupExtractor {
	type Item = Group;

	fn label(&self) -> &'static str {
		"groups"
	}

	async fn extract(&self, page: &dyn PageDriver) -> Result<Vec<Group>> {
		let payload = page.eval_json(GROUPS_SNIPPET).await?;
		Ok(parse_items(payload, "group"))
	}
}

/// Collects a window of group search results for `query`.
pub async fn search_groups(
	page: &dyn PageDriver,
	routes: &Routes,
	query: &str,
	params: &CollectParams,
	wait_timeout_ms: u64,
) -> Result<CollectionResult<Group>> {
	open_feed(page, &routes.search_groups(query), SEARCH_RESULTS, wait_timeout_ms).await?;
	collect(page, &GroupExtractor, params).await
}
