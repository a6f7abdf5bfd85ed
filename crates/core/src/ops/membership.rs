//! Group-membership toggling through the profile dialog.
//!
//! One toggle walks a fixed sequence on the target's profile: open the
//! profile menu, open the membership dialog, locate the group entry,
//! compare its checked state against the desired state, and only then
//! mutate. Every invocation produces a terminal [`MembershipOutcome`];
//! nothing escapes as an unhandled failure.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::parse_items;
use crate::error::Result;
use crate::page::{Interactable as _, Navigable as _, PageDriver, Queryable as _, Waitable as _};
use crate::retry::{RetryPolicy, retry_with_backoff};
use crate::routes::{Routes, parse_handle};

pub const PROFILE_MENU: &str = "[data-testid=\"profile-menu\"]";
pub const MANAGE_GROUPS_ITEM: &str = "[data-testid=\"manage-group-membership\"]";
pub const MEMBERSHIP_DIALOG: &str = "[data-testid=\"group-membership-dialog\"]";
pub const DIALOG_SAVE: &str = "[data-testid=\"group-membership-save\"]";

const ENTRIES_SNIPPET: &str = r#"Array.from(document.querySelectorAll('[data-testid="group-membership-dialog"] [data-testid="group-entry"]')).map((el) => ({
	name: el.querySelector('[data-testid="group-entry-name"]')?.textContent?.trim(),
	checked: el.querySelector('input[type="checkbox"]')?.checked ?? false,
}))"#;

/// Terminal result of one membership toggle. Always produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum MembershipOutcome {
	Added,
	Already,
	Removed,
	Error { detail: String },
}

#[derive(Debug, Deserialize)]
struct GroupEntry {
	name: String,
	#[serde(default)]
	checked: bool,
}

/// One membership toggle request.
#[derive(Debug, Clone, Copy)]
pub struct MembershipRequest<'a> {
	pub group: &'a str,
	pub target: &'a str,
	/// `true` means the target should end up a member.
	pub desired: bool,
}

/// Applies one toggle, absorbing transient dialog-render races with a
/// bounded retry. Thrown failures become an `Error` outcome after the
/// retry budget is spent.
pub async fn apply(
	page: &dyn PageDriver,
	routes: &Routes,
	request: MembershipRequest<'_>,
	policy: RetryPolicy,
	wait_timeout_ms: u64,
) -> MembershipOutcome {
	let handle = match parse_handle(request.target) {
		Ok(handle) => handle,
		Err(err) => {
			return MembershipOutcome::Error { detail: err.to_string() };
		}
	};

	let attempt = || attempt_toggle(page, routes, &handle, request.group, request.desired, wait_timeout_ms);
	match retry_with_backoff(policy, "membership", attempt).await {
		Ok(outcome) => outcome,
		Err(err) => MembershipOutcome::Error {
			detail: err.into_final().to_string(),
		},
	}
}

/// One full profile → menu → dialog → toggle walk.
async fn attempt_toggle(
	page: &dyn PageDriver,
	routes: &Routes,
	handle: &str,
	group: &str,
	desired: bool,
	wait_timeout_ms: u64,
) -> Result<MembershipOutcome> {
	page.goto(&routes.profile(handle)).await?;
	page.wait_for_selector(PROFILE_MENU, wait_timeout_ms).await?;

	page.click(PROFILE_MENU).await?;
	page.wait_for_selector(MANAGE_GROUPS_ITEM, wait_timeout_ms).await?;

	page.click(MANAGE_GROUPS_ITEM).await?;
	page.wait_for_selector(MEMBERSHIP_DIALOG, wait_timeout_ms).await?;

	let entries: Vec<GroupEntry> = parse_items(page.eval_json(ENTRIES_SNIPPET).await?, "group-entry");
	let Some(entry) = entries.iter().find(|e| e.name == group) else {
		// The dialog rendered without the group; more attempts would see
		// the same list.
		return Ok(MembershipOutcome::Error {
			detail: format!("group {group:?} not found in membership dialog"),
		});
	};

	if entry.checked == desired {
		debug!(target = "wv.membership", %handle, group, desired, "already in desired state");
		return Ok(MembershipOutcome::Already);
	}

	page.click(&entry_checkbox_selector(group)).await?;
	page.click(DIALOG_SAVE).await?;
	info!(target = "wv.membership", %handle, group, desired, "membership toggled");

	Ok(if desired { MembershipOutcome::Added } else { MembershipOutcome::Removed })
}

fn entry_checkbox_selector(group: &str) -> String {
	let escaped = group.replace('\\', "\\\\").replace('"', "\\\"");
	format!("{MEMBERSHIP_DIALOG} [data-testid=\"group-entry\"][data-group-name=\"{escaped}\"] input[type=\"checkbox\"]")
}

/// Outcome for one target within a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetOutcome {
	pub target: String,
	#[serde(flatten)]
	pub outcome: MembershipOutcome,
}

/// Aggregated counts over a batch; always sums to `processed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MembershipSummary {
	pub added: u32,
	pub already: u32,
	pub removed: u32,
	pub errors: u32,
	pub processed: u32,
}

impl MembershipSummary {
	fn record(&mut self, outcome: &MembershipOutcome) {
		match outcome {
			MembershipOutcome::Added => self.added += 1,
			MembershipOutcome::Already => self.already += 1,
			MembershipOutcome::Removed => self.removed += 1,
			MembershipOutcome::Error { .. } => self.errors += 1,
		}
		self.processed += 1;
	}
}

/// Per-target outcomes plus the aggregated summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipReport {
	pub group: String,
	pub outcomes: Vec<TargetOutcome>,
	pub summary: MembershipSummary,
}

/// Toggles membership for every target, one at a time. A failed target
/// never stops the rest of the batch.
pub async fn apply_batch(
	page: &dyn PageDriver,
	routes: &Routes,
	group: &str,
	targets: &[String],
	desired: bool,
	wait_timeout_ms: u64,
) -> MembershipReport {
	let mut outcomes = Vec::with_capacity(targets.len());
	let mut summary = MembershipSummary::default();

	for target in targets {
		let outcome = apply(
			page,
			routes,
			MembershipRequest {
				group,
				target: target.as_str(),
				desired,
			},
			RetryPolicy::default(),
			wait_timeout_ms,
		)
		.await;
		summary.record(&outcome);
		outcomes.push(TargetOutcome {
			target: target.clone(),
			outcome,
		});
	}

	MembershipReport {
		group: group.to_string(),
		outcomes,
		summary,
	}
}
