//! Persisted credential record.
//!
//! One JSON file, read-then-replaced wholesale. The store is an injected
//! object with an explicit lifecycle; concurrent invocations sharing the
//! file can race, which is a documented limitation rather than something
//! handled here.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::Credential;
use crate::error::Result;

/// File-backed store holding at most one credential record.
#[derive(Debug)]
pub struct CredentialStore {
	path: PathBuf,
}

impl CredentialStore {
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}

	/// Store at the conventional per-user location.
	pub fn at_default_path() -> Self {
		Self::new(default_path())
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Loads the record, tolerating a missing or unreadable file.
	pub fn load(&self) -> Option<Credential> {
		let content = fs::read_to_string(&self.path).ok()?;
		match serde_json::from_str(&content) {
			Ok(credential) => Some(credential),
			Err(err) => {
				warn!(
					target = "wv.credentials",
					path = %self.path.display(),
					error = %err,
					"credential file is unreadable; ignoring"
				);
				None
			}
		}
	}

	/// Replaces the record wholesale.
	pub fn save(&self, credential: &Credential) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}
		let json = serde_json::to_string_pretty(credential)?;
		fs::write(&self.path, json)?;
		debug!(
			target = "wv.credentials",
			path = %self.path.display(),
			source = %credential.source,
			"credential saved"
		);
		Ok(())
	}

	/// Deletes the record. Returns whether a file was removed.
	pub fn clear(&self) -> Result<bool> {
		match fs::remove_file(&self.path) {
			Ok(()) => Ok(true),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
			Err(err) => Err(err.into()),
		}
	}
}

fn default_path() -> PathBuf {
	std::env::var_os("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.or_else(|| dirs::home_dir().map(|home| home.join(".config")))
		.unwrap_or_else(|| PathBuf::from("."))
		.join("wv/credential.json")
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;
	use crate::credentials::{CSRF_COOKIE, CookieRecord, SESSION_COOKIE};

	fn sample() -> Credential {
		Credential::new(
			vec![
				CookieRecord::new(SESSION_COOKIE, "s3cret", ".weave.social"),
				CookieRecord::new(CSRF_COOKIE, "t0ken", ".weave.social"),
			],
			"browser:chrome",
		)
	}

	#[test]
	fn save_load_clear_round_trip() {
		let tmp = TempDir::new().unwrap();
		let store = CredentialStore::new(tmp.path().join("nested/credential.json"));

		assert!(store.load().is_none());
		store.save(&sample()).unwrap();

		let loaded = store.load().expect("saved record loads");
		assert_eq!(loaded.source, "browser:chrome");
		assert!(loaded.has_required_pair());

		assert!(store.clear().unwrap());
		assert!(!store.clear().unwrap(), "second clear is a no-op");
		assert!(store.load().is_none());
	}

	#[test]
	fn save_replaces_wholesale() {
		let tmp = TempDir::new().unwrap();
		let store = CredentialStore::new(tmp.path().join("credential.json"));

		store.save(&sample()).unwrap();
		let replacement = Credential::new(
			vec![CookieRecord::new(SESSION_COOKIE, "other", ".weave.social")],
			"browser:firefox",
		);
		store.save(&replacement).unwrap();

		let loaded = store.load().unwrap();
		assert_eq!(loaded.source, "browser:firefox");
		assert_eq!(loaded.cookies.len(), 1, "no field-by-field merging");
	}

	#[test]
	fn corrupt_file_loads_as_none() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("credential.json");
		std::fs::write(&path, "{ not json").unwrap();
		assert!(CredentialStore::new(path).load().is_none());
	}

	#[test]
	fn persisted_schema_uses_camel_case() {
		let tmp = TempDir::new().unwrap();
		let store = CredentialStore::new(tmp.path().join("credential.json"));
		store.save(&sample()).unwrap();

		let raw = std::fs::read_to_string(store.path()).unwrap();
		assert!(raw.contains("\"createdAt\""));
		assert!(raw.contains("\"httpOnly\""));
		assert!(!raw.contains("\"created_at\""));
	}
}
