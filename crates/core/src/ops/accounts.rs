//! Account search collection.

use async_trait::async_trait;

use super::{open_feed, parse_items};
use crate::collect::{PageExtractor, collect};
use crate::error::Result;
use crate::model::{Account, CollectParams, CollectionResult};
use crate::page::{PageDriver, Queryable as _};
use crate::routes::Routes;

pub const SEARCH_RESULTS: &str = "[data-testid=\"search-results\"]";

const ACCOUNTS_SNIPPET: &str = r#"Array.from(document.querySelectorAll('[data-testid="account-item"]')).map((el) => ({
	handle: el.getAttribute('data-handle'),
	displayName: el.querySelector('[data-testid="account-name"]')?.textContent?.trim(),
	bio: el.querySelector('[data-testid="account-bio"]')?.textContent?.trim(),
	url: el.querySelector('a')?.href,
}))"#;

pub struct AccountExtractor;

#[async_trait]
impl PageExtractor for AccountExtractor {
	type Item = Account;

	fn label(&self) -> &'static str {
		"accounts"
	}

	async fn extract(&self, page: &dyn PageDriver) -> Result<Vec<Account>> {
		let payload = page.eval_json(ACCOUNTS_SNIPPET).await?;
		Ok(parse_items(payload, "account"))
	}
}

/// Collects a window of account search results for `query`.
pub async fn search_accounts(
	page: &dyn PageDriver,
	routes: &Routes,
	query: &str,
	params: &CollectParams,
	wait_timeout_ms: u64,
) -> Result<CollectionResult<Account>> {
	open_feed(page, &routes.search_accounts(query), SEARCH_RESULTS, wait_timeout_ms).await?;
	collect(page, &AccountExtractor, params).await
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::testing::FakePage;

	#[tokio::test]
	async fn collects_accounts_from_search() {
		let page = FakePage::new();
		page.add_selector(SEARCH_RESULTS);
		page.script_eval(
			ACCOUNTS_SNIPPET,
			json!([
				{
					"handle": "ada",
					"displayName": "Ada",
					"bio": "systems",
					"url": "https://weave.social/@ada"
				},
				{ "handle": "brin", "url": "https://weave.social/@brin" },
			]),
		);

		let result = search_accounts(&page, &Routes::default(), "rust", &CollectParams::default(), 100)
			.await
			.unwrap();

		assert_eq!(result.items.len(), 2);
		assert_eq!(result.items[0].handle, "ada");
		assert_eq!(result.items[1].display_name, None);
		assert_eq!(
			page.visited(),
			vec!["https://weave.social/search?kind=users&q=rust"]
		);
	}
}
