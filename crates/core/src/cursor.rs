//! Opaque pagination cursor codec.
//!
//! A cursor wraps an offset into a stable result ordering as
//! base64url-encoded JSON with a version tag and kind discriminator. It is
//! a continuation token, not a capability token; validation is schema-only.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WvError};

/// Current cursor wire-schema version.
pub const CURSOR_SCHEMA_VERSION: u32 = 1;

const CURSOR_KIND_OFFSET: &str = "offset";

#[derive(Debug, Serialize, Deserialize)]
struct CursorPayload {
	version: u32,
	kind: String,
	offset: serde_json::Value,
}

/// Encodes a non-negative offset as an opaque continuation token.
pub fn encode(offset: i64) -> Result<String> {
	if offset < 0 {
		return Err(WvError::InvalidOffset(offset));
	}
	let payload = CursorPayload {
		version: CURSOR_SCHEMA_VERSION,
		kind: CURSOR_KIND_OFFSET.to_string(),
		offset: serde_json::Value::from(offset),
	};
	let json = serde_json::to_vec(&payload)?;
	Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decodes a continuation token back to its offset.
pub fn decode(token: &str) -> Result<u64> {
	if token.trim().is_empty() {
		return Err(WvError::InvalidCursor("empty token".into()));
	}

	let bytes = URL_SAFE_NO_PAD
		.decode(token.trim())
		.map_err(|e| WvError::InvalidCursor(format!("not base64url: {e}")))?;
	let payload: CursorPayload = serde_json::from_slice(&bytes)
		.map_err(|e| WvError::InvalidCursor(format!("not a cursor payload: {e}")))?;

	if payload.version != CURSOR_SCHEMA_VERSION {
		return Err(WvError::InvalidCursor(format!(
			"unsupported cursor version {}",
			payload.version
		)));
	}
	if payload.kind != CURSOR_KIND_OFFSET {
		return Err(WvError::InvalidCursor(format!("unknown cursor kind {:?}", payload.kind)));
	}

	match payload.offset.as_u64() {
		Some(offset) => Ok(offset),
		None => Err(WvError::InvalidCursor(format!(
			"offset must be a non-negative integer, got {}",
			payload.offset
		))),
	}
}
