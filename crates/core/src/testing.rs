//! Scripted in-memory page driver for tests.
//!
//! [`FakePage`] plays back a script instead of driving a real browser:
//! collection passes advance on scroll, selector presence is a set, and
//! keyed eval responses cover dialog flows. Interactions are recorded so
//! tests can assert on the exact sequence the engine performed.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::credentials::CookieRecord;
use crate::error::{Result, WvError};
use crate::page::{Interactable, Navigable, PageDriver, Queryable, Waitable};
use crate::session::{BrowserLauncher, SessionHandle, SessionMode};

/// One collection pass: the JSON payload item extraction sees, and the
/// scroll height reported after the pass.
#[derive(Debug, Clone)]
pub struct ScriptedPass {
	pub payload: serde_json::Value,
	pub scroll_height: f64,
}

impl ScriptedPass {
	pub fn new(payload: serde_json::Value, scroll_height: f64) -> Self {
		Self { payload, scroll_height }
	}
}

#[derive(Default)]
struct FakeState {
	passes: Vec<ScriptedPass>,
	pass_index: usize,
	passes_consumed: usize,
	responses: HashMap<String, VecDeque<serde_json::Value>>,
	present: HashSet<String>,
	visited: Vec<String>,
	clicked: Vec<String>,
	typed: Vec<(String, String)>,
	cookie_jar: Vec<CookieRecord>,
	current_url_override: Option<String>,
	closed: bool,
}

/// Scripted page driver. Cloning shares the same underlying state.
#[derive(Clone, Default)]
pub struct FakePage {
	state: Arc<Mutex<FakeState>>,
}

impl FakePage {
	pub fn new() -> Self {
		Self::default()
	}

	/// A page whose collection reads walk through the given passes.
	pub fn with_passes(passes: Vec<ScriptedPass>) -> Self {
		let page = Self::new();
		page.state.lock().passes = passes;
		page
	}

	/// Marks a selector as present for `exists`/`wait_for_selector`.
	pub fn add_selector(&self, selector: &str) -> &Self {
		self.state.lock().present.insert(selector.to_string());
		self
	}

	pub fn remove_selector(&self, selector: &str) -> &Self {
		self.state.lock().present.remove(selector);
		self
	}

	/// Queues a response for an exact eval expression. Repeated queues for
	/// the same expression are consumed in order; the last one sticks.
	pub fn script_eval(&self, expression: &str, value: serde_json::Value) -> &Self {
		self.state
			.lock()
			.responses
			.entry(expression.to_string())
			.or_default()
			.push_back(value);
		self
	}

	pub fn seed_cookies(&self, cookies: Vec<CookieRecord>) -> &Self {
		self.state.lock().cookie_jar = cookies;
		self
	}

	/// Simulates a server-side redirect: `current_url` reports this value
	/// instead of the last `goto` target.
	pub fn set_current_url(&self, url: &str) -> &Self {
		self.state.lock().current_url_override = Some(url.to_string());
		self
	}

	pub fn passes_consumed(&self) -> usize {
		self.state.lock().passes_consumed
	}

	pub fn visited(&self) -> Vec<String> {
		self.state.lock().visited.clone()
	}

	pub fn clicked(&self) -> Vec<String> {
		self.state.lock().clicked.clone()
	}

	pub fn typed(&self) -> Vec<(String, String)> {
		self.state.lock().typed.clone()
	}

	pub fn injected_cookies(&self) -> Vec<CookieRecord> {
		self.state.lock().cookie_jar.clone()
	}

	pub fn closed(&self) -> bool {
		self.state.lock().closed
	}
}

#[async_trait]
impl Navigable for FakePage {
	async fn goto(&self, url: &str) -> Result<()> {
		self.state.lock().visited.push(url.to_string());
		Ok(())
	}

	async fn current_url(&self) -> Result<String> {
		let state = self.state.lock();
		if let Some(url) = &state.current_url_override {
			return Ok(url.clone());
		}
		Ok(state.visited.last().cloned().unwrap_or_else(|| "about:blank".to_string()))
	}

	async fn cookies(&self, _url: &str) -> Result<Vec<CookieRecord>> {
		Ok(self.state.lock().cookie_jar.clone())
	}

	async fn inject_cookies(&self, cookies: &[CookieRecord]) -> Result<()> {
		self.state.lock().cookie_jar.extend_from_slice(cookies);
		Ok(())
	}
}

#[async_trait]
impl Queryable for FakePage {
	async fn eval_json(&self, expression: &str) -> Result<serde_json::Value> {
		let mut state = self.state.lock();
		if let Some(queue) = state.responses.get_mut(expression) {
			let value = if queue.len() > 1 {
				queue.pop_front().unwrap_or(serde_json::Value::Null)
			} else {
				queue.front().cloned().unwrap_or(serde_json::Value::Null)
			};
			return Ok(value);
		}

		let index = state.pass_index.min(state.passes.len().saturating_sub(1));
		let payload = state
			.passes
			.get(index)
			.map(|p| p.payload.clone())
			.unwrap_or(serde_json::Value::Null);
		state.passes_consumed += 1;
		Ok(payload)
	}

	async fn exists(&self, selector: &str) -> Result<bool> {
		Ok(self.state.lock().present.contains(selector))
	}

	async fn text_of(&self, selector: &str) -> Result<Option<String>> {
		let state = self.state.lock();
		Ok(state.present.get(selector).map(|_| String::new()))
	}
}

#[async_trait]
impl Interactable for FakePage {
	async fn click(&self, selector: &str) -> Result<()> {
		let mut state = self.state.lock();
		if !state.present.contains(selector) {
			return Err(WvError::SelectorNotFound {
				selector: selector.to_string(),
				context: "fake page".to_string(),
			});
		}
		state.clicked.push(selector.to_string());
		Ok(())
	}

	async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
		self.state.lock().typed.push((selector.to_string(), text.to_string()));
		Ok(())
	}

	async fn scroll_to_bottom(&self) -> Result<f64> {
		let mut state = self.state.lock();
		let index = state.pass_index.min(state.passes.len().saturating_sub(1));
		let height = state.passes.get(index).map(|p| p.scroll_height).unwrap_or(0.0);
		state.pass_index += 1;
		Ok(height)
	}
}

#[async_trait]
impl Waitable for FakePage {
	async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()> {
		if self.state.lock().present.contains(selector) {
			Ok(())
		} else {
			Err(WvError::render_timeout(selector.to_string(), timeout_ms))
		}
	}
}

#[async_trait]
impl PageDriver for FakePage {
	async fn close(&self) -> Result<()> {
		self.state.lock().closed = true;
		Ok(())
	}
}

/// Launcher that hands out pre-scripted pages in order and records the
/// mode of every launch.
#[derive(Default)]
pub struct FakeLauncher {
	pages: Mutex<VecDeque<FakePage>>,
	launches: Mutex<Vec<SessionMode>>,
}

impl FakeLauncher {
	pub fn new(pages: Vec<FakePage>) -> Self {
		Self {
			pages: Mutex::new(pages.into()),
			launches: Mutex::new(Vec::new()),
		}
	}

	/// Modes of every launch performed so far, in order.
	pub fn launch_modes(&self) -> Vec<SessionMode> {
		self.launches.lock().clone()
	}
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
	async fn launch(&self, mode: SessionMode) -> Result<SessionHandle> {
		self.launches.lock().push(mode);
		let page = self
			.pages
			.lock()
			.pop_front()
			.ok_or_else(|| WvError::Browser("fake launcher ran out of scripted pages".into()))?;
		Ok(SessionHandle::new(Box::new(page), mode))
	}
}
