//! Read operations and membership flows against the rendered application.
//!
//! Each operation owns its route, container selector, and extraction
//! snippet, and hands pagination to the collection engine. Extraction
//! parses per entry and skips what no longer parses; a changed layout
//! degrades instead of crashing.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Result;
use crate::page::{Navigable as _, PageDriver, Waitable as _};

pub mod accounts;
pub mod bookmarks;
pub mod groups;
pub mod membership;
pub mod news;
pub mod posts;

/// Parses an extraction payload entry-by-entry, skipping entries that no
/// longer match the expected shape.
pub(crate) fn parse_items<T: DeserializeOwned>(value: serde_json::Value, kind: &str) -> Vec<T> {
	let Some(entries) = value.as_array() else {
		debug!(target = "wv.extract", kind, "extraction payload was not an array");
		return Vec::new();
	};

	let mut items = Vec::with_capacity(entries.len());
	for entry in entries {
		match serde_json::from_value::<T>(entry.clone()) {
			Ok(item) => items.push(item),
			Err(err) => {
				debug!(target = "wv.extract", kind, error = %err, "skipping unparsable entry");
			}
		}
	}
	items
}

/// Navigates to a feed route and waits for its container to render.
pub(crate) async fn open_feed(
	page: &dyn PageDriver,
	url: &str,
	container: &str,
	wait_timeout_ms: u64,
) -> Result<()> {
	page.goto(url).await?;
	page.wait_for_selector(container, wait_timeout_ms).await
}

#[cfg(test)]
mod tests {
	use serde::Deserialize;
	use serde_json::json;

	use super::*;

	#[derive(Debug, Deserialize, PartialEq)]
	struct Entry {
		id: String,
	}

	#[test]
	fn parse_items_skips_malformed_entries() {
		let payload = json!([
			{ "id": "a" },
			{ "id": null },
			{ "unrelated": true },
			{ "id": "b" },
		]);
		let items: Vec<Entry> = parse_items(payload, "entry");
		assert_eq!(items, vec![Entry { id: "a".into() }, Entry { id: "b".into() }]);
	}

	#[test]
	fn parse_items_tolerates_non_array_payloads() {
		let items: Vec<Entry> = parse_items(json!({ "whole": "object" }), "entry");
		assert!(items.is_empty());

		let items: Vec<Entry> = parse_items(serde_json::Value::Null, "entry");
		assert!(items.is_empty());
	}
}
