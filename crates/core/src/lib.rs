//! Engine for driving the weave web application through an automated
//! browser session.
//!
//! The platform exposes no stable programmatic API, so every read goes
//! through a rendered DOM: the session controller owns one page per
//! logical operation, the collection engine turns scroll passes into
//! deduplicated, windowed result sets, and the credential resolver keeps
//! the session usable as cookies rot. Concrete browser drivers live
//! outside this crate, behind the capability traits in [`page`].

/// Scroll-driven, deduplicating, windowed collector.
pub mod collect;
/// Conversation expansion around a pivot post.
pub mod conversation;
/// Layered credential resolution and the persisted record.
pub mod credentials;
/// Opaque pagination cursor codec.
pub mod cursor;
/// Error taxonomy.
pub mod error;
/// Typed records and the collection result envelope.
pub mod model;
/// Read operations and membership flows.
pub mod ops;
/// Capability boundary over the page-automation collaborator.
pub mod page;
/// Bounded retry with linear backoff.
pub mod retry;
/// Route building and reference validation.
pub mod routes;
/// Session lifecycle and the headless→headed retry protocol.
pub mod session;
/// Scripted fake page driver for tests.
pub mod testing;

pub use collect::{PageExtractor, collect};
pub use conversation::{ExpandFlags, ThreadMeta, ThreadPost, expand};
pub use credentials::{
	CookieRecord, CookieSource, Credential, CredentialResolver, CredentialStore, Diagnostic,
	DiagnosticLevel, Resolution, ResolveRequest,
};
pub use error::{Result, WvError};
pub use model::{Account, CollectParams, CollectionResult, Group, Identified, NewsItem, Post};
pub use ops::membership::{MembershipOutcome, MembershipReport, MembershipRequest, MembershipSummary};
pub use page::{Interactable, Navigable, PageDriver, Queryable, Waitable};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use routes::Routes;
pub use session::{
	BrowserLauncher, LoginState, SessionConfig, SessionController, SessionHandle, SessionMode,
	detect_login_state, ensure_authenticated,
};
