//! Conversation expansion around a pivot post.
//!
//! Pure selection over an ordered conversation; no page access. Flags are
//! independent predicates composed in a fixed order, and the pivot is
//! present in the output exactly once under every combination.

use serde::Serialize;

use crate::model::{Identified, Post};

/// Compatibility flags controlling how much of a conversation survives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandFlags {
	/// Expand only when the pivot is the conversation root.
	pub root_only: bool,
	/// Keep only items by the pivot's author.
	pub author_only: bool,
	/// Keep the maximal contiguous same-author run straddling the pivot.
	pub author_chain: bool,
	/// Force-include the item immediately preceding the pivot.
	pub include_parent: bool,
	/// Annotate survivors with their original position and pivot marker.
	pub thread_meta: bool,
}

impl ExpandFlags {
	fn expands(&self) -> bool {
		self.root_only || self.author_only || self.author_chain || self.include_parent
	}
}

/// Position annotation attached when `thread_meta` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadMeta {
	pub position: usize,
	pub pivot: bool,
}

/// A post surviving expansion, with optional thread annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPost {
	#[serde(flatten)]
	pub post: Post,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub thread: Option<ThreadMeta>,
}

impl Identified for ThreadPost {
	fn identity(&self) -> &str {
		self.post.identity()
	}
}

/// Selects the subset of `conversation` around `pivot`.
///
/// Evaluation order: the `root_only` gate, then candidate selection
/// (`author_chain` wins over `author_only`; a passed `root_only` gate with
/// neither selects the whole conversation), then the `include_parent`
/// force-add, then pivot retention, then `thread_meta` annotation. Output
/// keeps original conversation order and identity uniqueness.
pub fn expand(conversation: &[Post], pivot: &Post, flags: &ExpandFlags) -> Vec<ThreadPost> {
	let pivot_pos = conversation.iter().position(|p| p.identity() == pivot.identity());

	let Some(pivot_pos) = pivot_pos else {
		// Pivot not part of the rendered conversation: it is still the one
		// guaranteed survivor.
		return vec![annotate(pivot.clone(), 0, true, flags)];
	};

	let pivot_only = || vec![annotate(conversation[pivot_pos].clone(), pivot_pos, true, flags)];

	if !flags.expands() {
		return pivot_only();
	}
	if flags.root_only && pivot_pos != 0 {
		return pivot_only();
	}

	let mut keep: Vec<usize> = if flags.author_chain {
		author_chain_indices(conversation, pivot_pos)
	} else if flags.author_only {
		conversation
			.iter()
			.enumerate()
			.filter(|(_, p)| p.author == conversation[pivot_pos].author)
			.map(|(i, _)| i)
			.collect()
	} else if flags.root_only {
		(0..conversation.len()).collect()
	} else {
		vec![pivot_pos]
	};

	if flags.include_parent && pivot_pos > 0 {
		keep.push(pivot_pos - 1);
	}
	keep.push(pivot_pos);
	keep.sort_unstable();
	keep.dedup();

	keep.into_iter()
		.map(|i| annotate(conversation[i].clone(), i, i == pivot_pos, flags))
		.collect()
}

/// Maximal contiguous run of pivot-author items straddling the pivot.
fn author_chain_indices(conversation: &[Post], pivot_pos: usize) -> Vec<usize> {
	let author = &conversation[pivot_pos].author;

	let mut start = pivot_pos;
	while start > 0 && conversation[start - 1].author == *author {
		start -= 1;
	}
	let mut end = pivot_pos;
	while end + 1 < conversation.len() && conversation[end + 1].author == *author {
		end += 1;
	}

	(start..=end).collect()
}

fn annotate(post: Post, position: usize, pivot: bool, flags: &ExpandFlags) -> ThreadPost {
	ThreadPost {
		post,
		thread: flags.thread_meta.then_some(ThreadMeta { position, pivot }),
	}
}
