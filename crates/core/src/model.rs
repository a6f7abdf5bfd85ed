//! Typed records produced by collection and the result envelope around
//! them.

use serde::{Deserialize, Serialize};

/// Stable-identity key used for deduplication across collection passes.
pub trait Identified {
	fn identity(&self) -> &str;
}

/// A post as rendered in a feed or conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	pub id: String,
	/// Author handle, without the leading `@`.
	pub author: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub author_name: Option<String>,
	pub text: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	pub url: String,
}

impl Identified for Post {
	fn identity(&self) -> &str {
		&self.id
	}
}

/// An account row from search or member listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
	pub handle: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bio: Option<String>,
	pub url: String,
}

impl Identified for Account {
	fn identity(&self) -> &str {
		&self.handle
	}
}

/// A group (member list) as rendered in group search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
	pub id: String,
	pub name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub member_count: Option<u64>,
	pub url: String,
}

impl Identified for Group {
	fn identity(&self) -> &str {
		&self.id
	}
}

/// An item from the news feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
	pub id: String,
	pub title: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub topic: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub published_at: Option<String>,
	pub url: String,
}

impl Identified for NewsItem {
	fn identity(&self) -> &str {
		&self.id
	}
}

/// Caller-facing pagination parameters for one collection call.
#[derive(Debug, Clone)]
pub struct CollectParams {
	/// Window size for the returned page of items.
	pub count: usize,
	/// Keep loading until the feed is exhausted instead of stopping at
	/// `count`.
	pub all: bool,
	/// Upper bound on passes; defaults to 25 in `all` mode, 1 otherwise.
	pub max_pages: Option<u32>,
	/// Opaque continuation token from a previous call.
	pub cursor: Option<String>,
	/// Settle delay between scroll passes, in milliseconds.
	pub delay_ms: u64,
}

impl Default for CollectParams {
	fn default() -> Self {
		Self {
			count: 20,
			all: false,
			max_pages: None,
			cursor: None,
			delay_ms: 500,
		}
	}
}

impl CollectParams {
	/// Effective pass limit for this call.
	pub fn page_limit(&self) -> u32 {
		self.max_pages.unwrap_or(if self.all { 25 } else { 1 })
	}
}

/// One page of collected items plus continuation state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResult<T> {
	pub items: Vec<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub next_cursor: Option<String>,
	pub pages_fetched: u32,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub warnings: Vec<String>,
}
