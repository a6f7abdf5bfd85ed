//! Command-line surface.

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "wv", version, about = "Drive the weave web app from the command line")]
pub struct Cli {
	#[command(flatten)]
	pub global: GlobalArgs,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
	/// Run the browser with a visible window and skip the headless retry.
	#[arg(long, global = true)]
	pub headed: bool,

	/// Force headless mode even when a render failure would retry headed.
	#[arg(long, global = true, conflicts_with = "headed")]
	pub headless: bool,

	/// Explicit session cookie value; with --csrf it overrides every other
	/// credential source.
	#[arg(long, global = true, value_name = "VALUE")]
	pub session: Option<String>,

	/// Explicit CSRF cookie value.
	#[arg(long, global = true, value_name = "VALUE")]
	pub csrf: Option<String>,

	/// Cookie store to extract from, in priority order (e.g.
	/// browser:firefox). Repeatable.
	#[arg(long = "cookie-source", global = true, value_name = "ID")]
	pub cookie_sources: Vec<String>,

	/// Profile hint passed through to cookie stores.
	#[arg(long, global = true, value_name = "NAME")]
	pub profile: Option<String>,

	/// Platform origin override.
	#[arg(long, global = true, env = "WV_BASE_URL", value_name = "URL")]
	pub base_url: Option<String>,

	/// Increase log verbosity (-v info, -vv debug).
	#[arg(short, long, global = true, action = ArgAction::Count)]
	pub verbose: u8,
}

/// Pagination flags shared by every collection command.
#[derive(Debug, Args)]
pub struct CollectArgs {
	/// Window size of the returned page.
	#[arg(long, default_value_t = 20)]
	pub count: usize,

	/// Keep scrolling until the feed is exhausted.
	#[arg(long)]
	pub all: bool,

	/// Upper bound on scroll passes.
	#[arg(long, value_name = "N")]
	pub max_pages: Option<u32>,

	/// Continuation token from a previous invocation.
	#[arg(long, value_name = "TOKEN")]
	pub cursor: Option<String>,

	/// Settle delay between scroll passes.
	#[arg(long, default_value_t = 500, value_name = "MS")]
	pub delay_ms: u64,
}

impl CollectArgs {
	pub fn to_params(&self) -> wv::CollectParams {
		wv::CollectParams {
			count: self.count,
			all: self.all,
			max_pages: self.max_pages,
			cursor: self.cursor.clone(),
			delay_ms: self.delay_ms,
		}
	}
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Collect a user's posts.
	Posts {
		/// User handle, @handle, or profile URL.
		user: String,
		#[command(flatten)]
		collect: CollectArgs,
	},

	/// Search accounts.
	Accounts {
		query: String,
		#[command(flatten)]
		collect: CollectArgs,
	},

	/// Search groups.
	Groups {
		query: String,
		#[command(flatten)]
		collect: CollectArgs,
	},

	/// Collect the news feed.
	News {
		#[command(flatten)]
		collect: CollectArgs,
	},

	/// Collect bookmarks and expand their conversations.
	Bookmarks {
		#[command(flatten)]
		collect: CollectArgs,

		/// Expand only bookmarks that are conversation roots.
		#[arg(long)]
		root_only: bool,

		/// Keep only items by the bookmark's author.
		#[arg(long)]
		author_only: bool,

		/// Keep the contiguous same-author run around the bookmark.
		#[arg(long)]
		author_chain: bool,

		/// Always include the item directly above the bookmark.
		#[arg(long)]
		include_parent: bool,

		/// Annotate output with thread positions.
		#[arg(long)]
		thread_meta: bool,

		/// Sort the flattened output by post timestamp.
		#[arg(long)]
		chronological: bool,
	},

	/// Manage group membership.
	Group {
		#[command(subcommand)]
		action: GroupAction,
	},

	/// Manage stored credentials.
	Auth {
		#[command(subcommand)]
		action: AuthAction,
	},
}

#[derive(Debug, Subcommand)]
pub enum GroupAction {
	/// Add users to a group.
	Add {
		group: String,
		#[arg(required = true)]
		targets: Vec<String>,
	},

	/// Remove users from a group.
	Remove {
		group: String,
		#[arg(required = true)]
		targets: Vec<String>,
	},
}

#[derive(Debug, Subcommand)]
pub enum AuthAction {
	/// Open a headed browser, log in manually, and save the session
	/// cookies.
	Login {
		/// Auto-save after this many seconds without input.
		#[arg(long, default_value_t = 180, value_name = "SECS")]
		timeout_secs: u64,
	},

	/// Show the persisted credential.
	Status,

	/// Delete the persisted credential.
	Clear,
}
