//! Chromium driver implementing the engine's page capabilities.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, TimeSinceEpoch};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use wv::page::{Interactable, Navigable, PageDriver, Queryable, Waitable};
use wv::session::{BrowserLauncher, SessionHandle, SessionMode};
use wv::{CookieRecord, Result, WvError};

const SELECTOR_POLL: Duration = Duration::from_millis(250);

/// Launches one Chromium instance per session.
#[derive(Debug, Default)]
pub struct ChromiumLauncher;

impl ChromiumLauncher {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
	async fn launch(&self, mode: SessionMode) -> Result<SessionHandle> {
		let mut builder = BrowserConfig::builder();
		if mode == SessionMode::Headed {
			builder = builder.with_head();
		}
		let config = builder.build().map_err(WvError::Browser)?;

		let (browser, mut handler) = Browser::launch(config).await.map_err(browser_err)?;
		let handler_task = tokio::spawn(async move {
			while let Some(event) = handler.next().await {
				if event.is_err() {
					break;
				}
			}
		});

		let page = browser.new_page("about:blank").await.map_err(browser_err)?;
		debug!(target = "wv.browser", %mode, "chromium session started");

		Ok(SessionHandle::new(
			Box::new(ChromiumPage {
				browser: Mutex::new(browser),
				page,
				handler_task: Mutex::new(Some(handler_task)),
			}),
			mode,
		))
	}
}

/// One live Chromium page plus the browser process owning it.
pub struct ChromiumPage {
	browser: Mutex<Browser>,
	page: Page,
	handler_task: Mutex<Option<JoinHandle<()>>>,
}

fn browser_err(err: impl std::fmt::Display) -> WvError {
	WvError::Browser(err.to_string())
}

fn escape_js_string(value: &str) -> String {
	value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[async_trait]
impl Navigable for ChromiumPage {
	async fn goto(&self, url: &str) -> Result<()> {
		self.page.goto(url).await.map_err(browser_err)?;
		self.page.wait_for_navigation().await.map_err(browser_err)?;
		Ok(())
	}

	async fn current_url(&self) -> Result<String> {
		let url = self.page.url().await.map_err(browser_err)?;
		Ok(url.unwrap_or_else(|| "about:blank".to_string()))
	}

	async fn cookies(&self, _url: &str) -> Result<Vec<CookieRecord>> {
		let cookies = self.page.get_cookies().await.map_err(browser_err)?;
		Ok(cookies
			.into_iter()
			.map(|c| CookieRecord {
				name: c.name,
				value: c.value,
				domain: c.domain,
				path: c.path,
				expires: Some(c.expires),
				http_only: c.http_only,
				secure: c.secure,
				same_site: c.same_site.map(|s| format!("{s:?}")),
			})
			.collect())
	}

	async fn inject_cookies(&self, cookies: &[CookieRecord]) -> Result<()> {
		let params: Vec<CookieParam> = cookies
			.iter()
			.map(|c| {
				let mut builder = CookieParam::builder()
					.name(c.name.clone())
					.value(c.value.clone())
					.domain(c.domain.clone())
					.path(c.path.clone())
					.secure(c.secure)
					.http_only(c.http_only);
				if let Some(expires) = c.expires {
					builder = builder.expires(TimeSinceEpoch::new(expires));
				}
				builder.build().map_err(WvError::Browser)
			})
			.collect::<Result<_>>()?;

		self.page.set_cookies(params).await.map_err(browser_err)?;
		Ok(())
	}
}

#[async_trait]
impl Queryable for ChromiumPage {
	async fn eval_json(&self, expression: &str) -> Result<serde_json::Value> {
		let result = self.page.evaluate(expression).await.map_err(browser_err)?;
		result.into_value().map_err(|e| WvError::Browser(format!("evaluation result: {e}")))
	}

	async fn exists(&self, selector: &str) -> Result<bool> {
		let escaped = escape_js_string(selector);
		let value = self
			.eval_json(&format!("document.querySelector('{escaped}') !== null"))
			.await?;
		Ok(value.as_bool().unwrap_or(false))
	}

	async fn text_of(&self, selector: &str) -> Result<Option<String>> {
		let escaped = escape_js_string(selector);
		let value = self
			.eval_json(&format!("document.querySelector('{escaped}')?.textContent ?? null"))
			.await?;
		Ok(value.as_str().map(str::to_string))
	}
}

#[async_trait]
impl Interactable for ChromiumPage {
	async fn click(&self, selector: &str) -> Result<()> {
		let element = self.page.find_element(selector).await.map_err(|_| WvError::SelectorNotFound {
			selector: selector.to_string(),
			context: "click".to_string(),
		})?;
		element.click().await.map_err(browser_err)?;
		Ok(())
	}

	async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
		let element = self.page.find_element(selector).await.map_err(|_| WvError::SelectorNotFound {
			selector: selector.to_string(),
			context: "type".to_string(),
		})?;
		element.click().await.map_err(browser_err)?;
		element.type_str(text).await.map_err(browser_err)?;
		Ok(())
	}

	async fn scroll_to_bottom(&self) -> Result<f64> {
		let value = self
			.eval_json(
				"(() => { window.scrollTo(0, document.body.scrollHeight); return document.body.scrollHeight; })()",
			)
			.await?;
		Ok(value.as_f64().unwrap_or(0.0))
	}
}

#[async_trait]
impl Waitable for ChromiumPage {
	async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()> {
		let deadline = Instant::now() + Duration::from_millis(timeout_ms);
		loop {
			if self.exists(selector).await? {
				return Ok(());
			}
			if Instant::now() >= deadline {
				return Err(WvError::render_timeout(selector.to_string(), timeout_ms));
			}
			tokio::time::sleep(SELECTOR_POLL).await;
		}
	}
}

#[async_trait]
impl PageDriver for ChromiumPage {
	async fn close(&self) -> Result<()> {
		{
			let mut browser = self.browser.lock().await;
			browser.close().await.map_err(browser_err)?;
		}
		if let Some(task) = self.handler_task.lock().await.take() {
			task.abort();
		}
		debug!(target = "wv.browser", "chromium session closed");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn js_string_escaping_covers_quotes_and_backslashes() {
		assert_eq!(
			escape_js_string(r#"a[data-x='v'] \ b"#),
			r#"a[data-x=\'v\'] \\ b"#
		);
	}
}
