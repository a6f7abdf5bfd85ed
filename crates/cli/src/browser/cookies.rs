//! Cookie extraction from desktop browser stores.
//!
//! Each store is one [`CookieSource`]; the resolver treats a locked
//! database, a missing browser, and an empty result the same way, so this
//! module only maps rows and reports failures as extraction errors.

use tracing::debug;

use wv::{CookieRecord, CookieSource, Result, WvError};

#[derive(Debug, Clone, Copy)]
enum DesktopBrowser {
	Chrome,
	Firefox,
	Edge,
	Brave,
}

impl DesktopBrowser {
	fn id(self) -> &'static str {
		match self {
			Self::Chrome => "browser:chrome",
			Self::Firefox => "browser:firefox",
			Self::Edge => "browser:edge",
			Self::Brave => "browser:brave",
		}
	}
}

struct DesktopCookieSource {
	browser: DesktopBrowser,
}

impl CookieSource for DesktopCookieSource {
	fn id(&self) -> &str {
		self.browser.id()
	}

	fn extract(&self, domain: &str, profile_hint: Option<&str>) -> Result<Vec<CookieRecord>> {
		if profile_hint.is_some() {
			debug!(
				target = "wv.credentials",
				source = self.id(),
				"desktop stores ignore profile hints"
			);
		}

		let domains = Some(vec![domain.to_string()]);
		let rows = match self.browser {
			DesktopBrowser::Chrome => rookie::chrome(domains),
			DesktopBrowser::Firefox => rookie::firefox(domains),
			DesktopBrowser::Edge => rookie::edge(domains),
			DesktopBrowser::Brave => rookie::brave(domains),
		}
		.map_err(|e| WvError::ExtractionFailure(format!("{}: {e}", self.id())))?;

		Ok(rows.into_iter().map(record_from_row).collect())
	}
}

fn record_from_row(row: rookie::enums::Cookie) -> CookieRecord {
	CookieRecord {
		name: row.name,
		value: row.value,
		domain: row.domain,
		path: row.path,
		expires: row.expires.map(|e| e as f64),
		http_only: row.http_only,
		secure: row.secure,
		same_site: match row.same_site {
			2 => Some("Strict".to_string()),
			1 => Some("Lax".to_string()),
			_ => None,
		},
	}
}

/// Every desktop store this build can extract from, registered under its
/// `browser:*` id.
pub fn desktop_sources() -> Vec<Box<dyn CookieSource>> {
	[
		DesktopBrowser::Chrome,
		DesktopBrowser::Firefox,
		DesktopBrowser::Edge,
		DesktopBrowser::Brave,
	]
	.into_iter()
	.map(|browser| Box::new(DesktopCookieSource { browser }) as Box<dyn CookieSource>)
	.collect()
}
