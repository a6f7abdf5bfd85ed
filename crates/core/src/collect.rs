//! Scroll-driven, deduplicating, windowed collection engine.
//!
//! One engine serves every list-shaped read (posts, accounts, groups,
//! news). A pass reads the currently rendered items through a
//! [`PageExtractor`], inserts unseen ones into an identity-keyed,
//! insertion-ordered accumulator, and in `all` mode scrolls for more until
//! the feed stagnates or the pass budget runs out. The returned window and
//! continuation cursor follow the offset model in [`crate::cursor`].

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::cursor;
use crate::error::{Result, WvError};
use crate::model::{CollectParams, CollectionResult, Identified};
use crate::page::{Interactable as _, PageDriver};

/// One read-and-parse pass over the currently rendered items.
///
/// Implementations must degrade, not crash: entries that no longer parse
/// after a layout change are skipped with a debug line.
#[async_trait]
pub trait PageExtractor: Send + Sync {
	type Item: Identified + Clone + Send + Sync;

	/// Human-readable label used in logs and timeout messages.
	fn label(&self) -> &'static str;

	async fn extract(&self, page: &dyn PageDriver) -> Result<Vec<Self::Item>>;
}

/// Number of consecutive stagnant passes that ends `all`-mode collection.
const STAGNATION_PASSES: u32 = 2;

/// Collects one window of items from the page.
///
/// Ordering guarantee: items appear in first-seen traversal order across
/// passes; no re-sort happens here.
pub async fn collect<E>(
	page: &dyn PageDriver,
	extractor: &E,
	params: &CollectParams,
) -> Result<CollectionResult<E::Item>>
where
	E: PageExtractor,
{
	let offset = match params.cursor.as_deref() {
		Some(token) => usize::try_from(cursor::decode(token)?)
			.map_err(|_| WvError::InvalidCursor("offset exceeds addressable range".into()))?,
		None => 0,
	};
	let page_limit = params.page_limit();

	let mut items: Vec<E::Item> = Vec::new();
	let mut seen: HashSet<String> = HashSet::new();
	let mut pages_fetched: u32 = 0;
	let mut prev_height: Option<f64> = None;
	let mut stagnant_streak: u32 = 0;
	let mut exhausted = false;

	loop {
		let pass = extractor.extract(page).await?;
		let mut new_this_pass = 0usize;
		for item in pass {
			if seen.insert(item.identity().to_string()) {
				items.push(item);
				new_this_pass += 1;
			}
		}
		pages_fetched += 1;
		debug!(
			target = "wv.collect",
			kind = extractor.label(),
			pass = pages_fetched,
			new = new_this_pass,
			total = items.len(),
			"collection pass"
		);

		if !params.all && items.len() >= offset.saturating_add(params.count) {
			break;
		}
		if !params.all {
			// Non-all mode never scrolls; one pass is all we get.
			break;
		}
		if pages_fetched >= page_limit {
			break;
		}

		let height = page.scroll_to_bottom().await?;
		tokio::time::sleep(Duration::from_millis(params.delay_ms)).await;

		let height_grew = prev_height.is_none_or(|h| height > h);
		prev_height = Some(height);
		if !height_grew && new_this_pass == 0 {
			stagnant_streak += 1;
		} else {
			stagnant_streak = 0;
		}
		trace!(
			target = "wv.collect",
			kind = extractor.label(),
			height,
			stagnant_streak,
			"scroll settled"
		);
		if stagnant_streak >= STAGNATION_PASSES {
			exhausted = true;
			break;
		}
	}

	let hit_limit = !exhausted && pages_fetched >= page_limit && params.all;
	let total = items.len();

	// `all` without a cursor returns everything accumulated; every other
	// shape slices the requested window out of the accumulator.
	let (window, window_start) = if params.all && params.cursor.is_none() {
		(items, 0)
	} else {
		let start = offset.min(total);
		let end = offset.saturating_add(params.count).min(total);
		(items[start..end].to_vec(), start)
	};

	let reached_requested = !params.all && total >= offset.saturating_add(params.count);
	let more_available = total > window_start + window.len();
	let next_cursor = if !window.is_empty() && (more_available || hit_limit || reached_requested) {
		Some(cursor::encode((window_start + window.len()) as i64)?)
	} else {
		None
	};

	let mut warnings = Vec::new();
	if hit_limit {
		warnings.push(format!(
			"stopped after {pages_fetched} pages before the feed was exhausted; results may be incomplete"
		));
	}

	Ok(CollectionResult {
		items: window,
		next_cursor,
		pages_fetched,
		warnings,
	})
}
