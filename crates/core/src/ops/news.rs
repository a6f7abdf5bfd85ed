//! News feed collection.

use async_trait::async_trait;

use super::{open_feed, parse_items};
use crate::collect::{PageExtractor, collect};
use crate::error::Result;
use crate::model::{CollectParams, CollectionResult, NewsItem};
use crate::page::{PageDriver, Queryable as _};
use crate::routes::Routes;

pub const NEWS_FEED: &str = "[data-testid=\"news-feed\"]";

const NEWS_SNIPPET: &str = r#"Array.from(document.querySelectorAll('[data-testid="news-item"]')).map((el) => ({
	id: el.getAttribute('data-news-id'),
	title: el.querySelector('[data-testid="news-title"]')?.textContent?.trim(),
	topic: el.querySelector('[data-testid="news-topic"]')?.textContent?.trim(),
	publishedAt: el.querySelector('time')?.getAttribute('datetime'),
	url: el.querySelector('a')?.href,
}))"#;

pub struct NewsExtractor;

#[async_trait]
impl PageExtractor for NewsExtractor {
	type Item = NewsItem;

	fn label(&self) -> &'static str {
		"news"
	}

	async fn extract(&self, page: &dyn PageDriver) -> Result<Vec<NewsItem>> {
		let payload = page.eval_json(NEWS_SNIPPET).await?;
		Ok(parse_items(payload, "news"))
	}
}

/// Collects a window of the news feed.
pub async fn fetch_news(
	page: &dyn PageDriver,
	routes: &Routes,
	params: &CollectParams,
	wait_timeout_ms: u64,
) -> Result<CollectionResult<NewsItem>> {
	open_feed(page, &routes.news(), NEWS_FEED, wait_timeout_ms).await?;
	collect(page, &NewsExtractor, params).await
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::testing::FakePage;

	#[tokio::test]
	async fn collects_news_items() {
		let page = FakePage::new();
		page.add_selector(NEWS_FEED);
		page.script_eval(
			NEWS_SNIPPET,
			json!([
				{
					"id": "n1",
					"title": "Platform update",
					"topic": "product",
					"publishedAt": "2026-07-30T08:00:00Z",
					"url": "https://weave.social/news/n1"
				},
			]),
		);

		let result = fetch_news(&page, &Routes::default(), &CollectParams::default(), 100)
			.await
			.unwrap();

		assert_eq!(result.items.len(), 1);
		assert_eq!(result.items[0].title, "Platform update");
		assert_eq!(page.visited(), vec!["https://weave.social/explore/news"]);
	}
}
