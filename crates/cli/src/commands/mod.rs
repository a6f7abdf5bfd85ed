//! Command handlers and shared execution context.

use anyhow::bail;

use wv::credentials::{CredentialResolver, ResolveRequest};
use wv::ops::bookmarks::BookmarkParams;
use wv::{Credential, CredentialStore, ExpandFlags, Resolution, Routes, SessionConfig, SessionMode};

use crate::browser::{ChromiumLauncher, desktop_sources};
use crate::cli::{AuthAction, Cli, Command, GlobalArgs, GroupAction};
use crate::output;

pub mod auth;
pub mod collect;
pub mod group;

/// Dispatches a parsed invocation.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
	let ctx = AppContext::new(cli.global)?;

	match cli.command {
		Command::Posts { user, collect: args } => collect::posts(&ctx, user, args.to_params()).await,
		Command::Accounts { query, collect: args } => collect::accounts(&ctx, query, args.to_params()).await,
		Command::Groups { query, collect: args } => collect::groups(&ctx, query, args.to_params()).await,
		Command::News { collect: args } => collect::news(&ctx, args.to_params()).await,
		Command::Bookmarks {
			collect: args,
			root_only,
			author_only,
			author_chain,
			include_parent,
			thread_meta,
			chronological,
		} => {
			let params = BookmarkParams {
				collect: args.to_params(),
				flags: ExpandFlags {
					root_only,
					author_only,
					author_chain,
					include_parent,
					thread_meta,
				},
				chronological,
			};
			collect::bookmarks(&ctx, params).await
		}
		Command::Group { action } => match action {
			GroupAction::Add { group, targets } => group::toggle(&ctx, group, targets, true).await,
			GroupAction::Remove { group, targets } => group::toggle(&ctx, group, targets, false).await,
		},
		Command::Auth { action } => match action {
			AuthAction::Login { timeout_secs } => auth::login(&ctx, timeout_secs).await,
			AuthAction::Status => auth::status(&ctx),
			AuthAction::Clear => auth::clear(&ctx),
		},
	}
}

/// Resolved per-invocation state shared by every handler.
pub struct AppContext {
	pub routes: Routes,
	pub config: SessionConfig,
	pub store: CredentialStore,
	global: GlobalArgs,
}

impl AppContext {
	pub fn new(global: GlobalArgs) -> anyhow::Result<Self> {
		let routes = match global.base_url.as_deref() {
			Some(base) => Routes::new(base)?,
			None => Routes::default(),
		};
		let config = if global.headed {
			SessionConfig::pinned(SessionMode::Headed)
		} else if global.headless {
			SessionConfig::pinned(SessionMode::Headless)
		} else {
			SessionConfig::default()
		};

		Ok(Self {
			routes,
			config,
			store: CredentialStore::at_default_path(),
			global,
		})
	}

	pub fn controller(&self) -> wv::SessionController<ChromiumLauncher> {
		wv::SessionController::new(ChromiumLauncher::new(), self.config)
	}

	/// Runs the layered resolver and surfaces its diagnostics. A missing
	/// credential is a setup failure raised before any browser work.
	pub fn resolve_credential(&self) -> anyhow::Result<Credential> {
		let registry = desktop_sources();
		let resolver = CredentialResolver::new(&self.store, &registry, self.routes.domain());
		let request = ResolveRequest {
			session: self.global.session.as_deref(),
			csrf: self.global.csrf.as_deref(),
			sources: (!self.global.cookie_sources.is_empty()).then_some(self.global.cookie_sources.as_slice()),
			profile_hint: self.global.profile.as_deref(),
		};

		match resolver.resolve(&request) {
			Resolution::Found { credential, diagnostics } => {
				output::print_diagnostics(&diagnostics);
				Ok(credential)
			}
			Resolution::Missing { diagnostics } => {
				output::print_diagnostics(&diagnostics);
				bail!("no usable credential; log in with `wv auth login` or pass --session/--csrf");
			}
		}
	}
}
