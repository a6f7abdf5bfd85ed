//! Layered credential resolution.

use tracing::{debug, info};

use super::{
	CookieRecord, CookieSource, Credential, CredentialStore, Diagnostic, EXPLICIT_SOURCE,
	has_required_pair,
};

/// Extraction priority used when the caller names no sources.
pub const DEFAULT_SOURCES: &[&str] = &["browser:chrome", "browser:firefox"];

/// Caller-side inputs for one resolution.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResolveRequest<'a> {
	/// Explicit session-cookie value; with `csrf` it short-circuits
	/// everything else.
	pub session: Option<&'a str>,
	/// Explicit CSRF-cookie value.
	pub csrf: Option<&'a str>,
	/// Extraction priority order. Also acts as a cache-compatibility
	/// constraint: a cached record from a source not in this list is
	/// discarded.
	pub sources: Option<&'a [String]>,
	/// Per-store profile hint passed through to extraction.
	pub profile_hint: Option<&'a str>,
}

/// Outcome of one resolution. "No credential" is a value, not an error:
/// it signals that the caller must log in manually.
#[derive(Debug)]
pub enum Resolution {
	Found {
		credential: Credential,
		diagnostics: Vec<Diagnostic>,
	},
	Missing {
		diagnostics: Vec<Diagnostic>,
	},
}

impl Resolution {
	pub fn credential(&self) -> Option<&Credential> {
		match self {
			Self::Found { credential, .. } => Some(credential),
			Self::Missing { .. } => None,
		}
	}

	pub fn diagnostics(&self) -> &[Diagnostic] {
		match self {
			Self::Found { diagnostics, .. } | Self::Missing { diagnostics } => diagnostics,
		}
	}
}

/// Resolves credentials through the explicit > cached > extracted layers.
pub struct CredentialResolver<'a> {
	store: &'a CredentialStore,
	registry: &'a [Box<dyn CookieSource>],
	domain: &'a str,
}

impl<'a> CredentialResolver<'a> {
	pub fn new(store: &'a CredentialStore, registry: &'a [Box<dyn CookieSource>], domain: &'a str) -> Self {
		Self { store, registry, domain }
	}

	pub fn resolve(&self, request: &ResolveRequest<'_>) -> Resolution {
		let mut diagnostics = Vec::new();

		if let Some(credential) = self.explicit(request, &mut diagnostics) {
			return Resolution::Found { credential, diagnostics };
		}

		if let Some(credential) = self.cached(request, &mut diagnostics) {
			return Resolution::Found { credential, diagnostics };
		}

		if let Some(credential) = self.extracted(request, &mut diagnostics) {
			return Resolution::Found { credential, diagnostics };
		}

		Resolution::Missing { diagnostics }
	}

	fn explicit(&self, request: &ResolveRequest<'_>, diagnostics: &mut Vec<Diagnostic>) -> Option<Credential> {
		match (request.session, request.csrf) {
			(Some(session), Some(csrf)) => {
				debug!(target = "wv.credentials", "using explicit cookie pair");
				let domain = format!(".{}", self.domain);
				Some(Credential::new(
					vec![
						CookieRecord::new(super::SESSION_COOKIE, session, domain.clone()),
						CookieRecord::new(super::CSRF_COOKIE, csrf, domain),
					],
					EXPLICIT_SOURCE,
				))
			}
			(None, None) => None,
			_ => {
				diagnostics.push(Diagnostic::warning(
					"explicit credential pair is incomplete; both session and csrf values are required",
					Some(EXPLICIT_SOURCE),
				));
				None
			}
		}
	}

	fn cached(&self, request: &ResolveRequest<'_>, diagnostics: &mut Vec<Diagnostic>) -> Option<Credential> {
		let cached = self.store.load()?;

		if let Some(sources) = request.sources {
			if !sources.iter().any(|s| *s == cached.source) {
				diagnostics.push(Diagnostic::info(
					format!(
						"cached credential from {} invalidated: requested sources [{}] do not include it",
						cached.source,
						sources.join(", ")
					),
					Some(&cached.source),
				));
				if let Err(err) = self.store.clear() {
					diagnostics.push(Diagnostic::warning(
						format!("failed to remove invalidated credential file: {err}"),
						Some(&cached.source),
					));
				}
				return None;
			}
		}

		if !cached.has_required_pair() {
			diagnostics.push(Diagnostic::warning(
				"cached credential is missing the required cookie pair; ignoring it",
				Some(&cached.source),
			));
			return None;
		}

		diagnostics.push(Diagnostic::info(
			format!("using cached credential from {}", cached.source),
			Some(&cached.source),
		));
		Some(cached)
	}

	fn extracted(&self, request: &ResolveRequest<'_>, diagnostics: &mut Vec<Diagnostic>) -> Option<Credential> {
		let requested: Vec<String> = match request.sources {
			Some(sources) => sources.to_vec(),
			None => DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
		};

		for id in &requested {
			let Some(source) = self.registry.iter().find(|s| s.id() == id) else {
				diagnostics.push(Diagnostic::error(
					format!("credential source {id} is not available"),
					Some(id),
				));
				continue;
			};

			let cookies = match source.extract(self.domain, request.profile_hint) {
				Ok(cookies) => cookies,
				Err(err) => {
					diagnostics.push(Diagnostic::error(
						format!("extraction from {id} failed: {err}"),
						Some(id),
					));
					continue;
				}
			};

			if !has_required_pair(&cookies) {
				diagnostics.push(Diagnostic::warning(
					format!(
						"{id} returned {} cookies for {} but not the required pair",
						cookies.len(),
						self.domain
					),
					Some(id),
				));
				continue;
			}

			info!(target = "wv.credentials", source = %id, "credential extracted");
			let credential = Credential::new(cookies, id.clone());
			if let Err(err) = self.store.save(&credential) {
				diagnostics.push(Diagnostic::warning(
					format!("extracted credential could not be persisted: {err}"),
					Some(id),
				));
			}
			return Some(credential);
		}

		None
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicU32, Ordering};

	use tempfile::TempDir;

	use super::*;
	use crate::credentials::{CSRF_COOKIE, DiagnosticLevel, SESSION_COOKIE};
	use crate::error::{Result, WvError};

	struct ScriptedSource {
		id: String,
		cookies: Result<Vec<CookieRecord>>,
		calls: Arc<AtomicU32>,
	}

	impl ScriptedSource {
		fn ok(id: &str, cookies: Vec<CookieRecord>) -> Box<dyn CookieSource> {
			Self::counted(id, cookies, Arc::new(AtomicU32::new(0)))
		}

		fn counted(id: &str, cookies: Vec<CookieRecord>, calls: Arc<AtomicU32>) -> Box<dyn CookieSource> {
			Box::new(Self {
				id: id.to_string(),
				cookies: Ok(cookies),
				calls,
			})
		}

		fn failing(id: &str, message: &str) -> Box<dyn CookieSource> {
			Box::new(Self {
				id: id.to_string(),
				cookies: Err(WvError::ExtractionFailure(message.to_string())),
				calls: Arc::new(AtomicU32::new(0)),
			})
		}
	}

	impl CookieSource for ScriptedSource {
		fn id(&self) -> &str {
			&self.id
		}

		fn extract(&self, _domain: &str, _profile: Option<&str>) -> Result<Vec<CookieRecord>> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			match &self.cookies {
				Ok(cookies) => Ok(cookies.clone()),
				Err(err) => Err(WvError::ExtractionFailure(err.to_string())),
			}
		}
	}

	fn pair() -> Vec<CookieRecord> {
		vec![
			CookieRecord::new(SESSION_COOKIE, "sess", ".weave.social"),
			CookieRecord::new(CSRF_COOKIE, "csrf", ".weave.social"),
		]
	}

	fn store_in(tmp: &TempDir) -> CredentialStore {
		CredentialStore::new(tmp.path().join("credential.json"))
	}

	#[test]
	fn explicit_pair_short_circuits_cache_and_extraction() {
		let tmp = TempDir::new().unwrap();
		let store = store_in(&tmp);
		store.save(&Credential::new(pair(), "browser:chrome")).unwrap();

		let calls = Arc::new(AtomicU32::new(0));
		let registry = vec![ScriptedSource::counted("browser:chrome", pair(), calls.clone())];
		let resolver = CredentialResolver::new(&store, &registry, "weave.social");

		let resolution = resolver.resolve(&ResolveRequest {
			session: Some("explicit-sess"),
			csrf: Some("explicit-csrf"),
			sources: Some(&["browser:chrome".to_string()]),
			profile_hint: None,
		});

		let credential = resolution.credential().expect("explicit pair resolves");
		assert_eq!(credential.source, EXPLICIT_SOURCE);
		assert!(
			credential
				.cookies
				.iter()
				.any(|c| c.name == SESSION_COOKIE && c.value == "explicit-sess")
		);
		// Explicit pairs are not persisted over the cached record.
		assert_eq!(store.load().unwrap().source, "browser:chrome");
		assert_eq!(calls.load(Ordering::SeqCst), 0, "extraction never attempted");
	}

	#[test]
	fn incomplete_explicit_pair_falls_through_with_warning() {
		let tmp = TempDir::new().unwrap();
		let store = store_in(&tmp);
		store.save(&Credential::new(pair(), "browser:chrome")).unwrap();

		let registry: Vec<Box<dyn CookieSource>> = Vec::new();
		let resolver = CredentialResolver::new(&store, &registry, "weave.social");
		let resolution = resolver.resolve(&ResolveRequest {
			session: Some("only-half"),
			..ResolveRequest::default()
		});

		assert_eq!(resolution.credential().unwrap().source, "browser:chrome");
		assert!(
			resolution
				.diagnostics()
				.iter()
				.any(|d| d.level == DiagnosticLevel::Warning && d.message.contains("incomplete"))
		);
	}

	#[test]
	fn cached_record_is_used_when_compatible() {
		let tmp = TempDir::new().unwrap();
		let store = store_in(&tmp);
		store.save(&Credential::new(pair(), "browser:chrome")).unwrap();

		let registry: Vec<Box<dyn CookieSource>> = Vec::new();
		let resolver = CredentialResolver::new(&store, &registry, "weave.social");
		let resolution = resolver.resolve(&ResolveRequest::default());

		assert_eq!(resolution.credential().unwrap().source, "browser:chrome");
	}

	#[test]
	fn incompatible_source_list_discards_cache_then_extracts() {
		let tmp = TempDir::new().unwrap();
		let store = store_in(&tmp);
		store.save(&Credential::new(pair(), "browser:chrome")).unwrap();

		let registry = vec![ScriptedSource::ok("browser:firefox", pair())];
		let resolver = CredentialResolver::new(&store, &registry, "weave.social");

		let requested = vec!["browser:firefox".to_string()];
		let resolution = resolver.resolve(&ResolveRequest {
			sources: Some(&requested),
			..ResolveRequest::default()
		});

		let credential = resolution.credential().expect("firefox extraction succeeds");
		assert_eq!(credential.source, "browser:firefox");
		assert!(
			resolution
				.diagnostics()
				.iter()
				.any(|d| d.message.contains("invalidated")),
			"diagnostics must mention the invalidation"
		);
		// The replacement was persisted over the discarded record.
		assert_eq!(store.load().unwrap().source, "browser:firefox");
	}

	#[test]
	fn extraction_requires_both_named_cookies() {
		let tmp = TempDir::new().unwrap();
		let store = store_in(&tmp);

		let partial = vec![CookieRecord::new(SESSION_COOKIE, "sess", ".weave.social")];
		let registry = vec![ScriptedSource::ok("browser:chrome", partial)];
		let resolver = CredentialResolver::new(&store, &registry, "weave.social");

		let resolution = resolver.resolve(&ResolveRequest::default());
		assert!(resolution.credential().is_none());
		assert!(
			resolution
				.diagnostics()
				.iter()
				.any(|d| d.message.contains("not the required pair"))
		);
		assert!(store.load().is_none(), "partial extraction must not persist");
	}

	#[test]
	fn failing_sources_produce_diagnostics_and_fall_through_in_order() {
		let tmp = TempDir::new().unwrap();
		let store = store_in(&tmp);

		let registry = vec![
			ScriptedSource::failing("browser:chrome", "store locked"),
			ScriptedSource::ok("browser:firefox", pair()),
		];
		let resolver = CredentialResolver::new(&store, &registry, "weave.social");
		let resolution = resolver.resolve(&ResolveRequest::default());

		assert_eq!(resolution.credential().unwrap().source, "browser:firefox");
		assert!(
			resolution
				.diagnostics()
				.iter()
				.any(|d| d.level == DiagnosticLevel::Error && d.message.contains("store locked"))
		);
	}

	#[test]
	fn unknown_source_and_full_failure_is_missing_not_error() {
		let tmp = TempDir::new().unwrap();
		let store = store_in(&tmp);

		let registry: Vec<Box<dyn CookieSource>> = Vec::new();
		let resolver = CredentialResolver::new(&store, &registry, "weave.social");
		let requested = vec!["browser:orbit".to_string()];
		let resolution = resolver.resolve(&ResolveRequest {
			sources: Some(&requested),
			..ResolveRequest::default()
		});

		let Resolution::Missing { diagnostics } = resolution else {
			panic!("expected Missing");
		};
		assert!(diagnostics.iter().any(|d| d.message.contains("not available")));
	}
}
