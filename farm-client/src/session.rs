//! Session handling: token storage and client-side expiry checks
//!
//! The session is an explicit object injected into [`FarmClient`](crate::FarmClient)
//! rather than ambient global state. Tokens are checked for expiry by decoding
//! the JWT payload locally. The signature is NOT verified; this gate is
//! advisory and the server remains the authorization boundary.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::Result;

/// Key the token is stored under
pub const TOKEN_KEY: &str = "auth_token";

/// Claims read from the JWT payload
///
/// Only `exp` matters for the guard; the rest is informational.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    /// User email, when the server includes it
    #[serde(default)]
    pub email: Option<String>,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<i64>,
    /// Expiration time (Unix timestamp)
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode the payload segment of a JWT without verifying it.
///
/// Returns `None` for anything that is not `header.payload[.signature]` with
/// a base64url JSON object payload.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let mut parts = token.trim().split('.');
    let _header = parts.next()?;
    let payload = parts.next()?;

    // Accept both padded and unpadded encodings, and the standard alphabet
    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = URL_SAFE_NO_PAD.decode(normalized).ok()?;
    serde_json::from_slice::<Claims>(&bytes).ok()
}

/// Check a token's `exp` claim against `now`
pub fn is_token_valid(token: &str, now: DateTime<Utc>) -> bool {
    match decode_claims(token).and_then(|c| c.exp) {
        Some(exp) if exp > 0 => exp > now.timestamp(),
        _ => false,
    }
}

/// Seconds until the token expires (negative once expired)
pub fn seconds_remaining(claims: &Claims, now: DateTime<Utc>) -> Option<i64> {
    claims.exp.map(|exp| exp - now.timestamp())
}

/// Persistent storage for the bearer token
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any
    fn load(&self) -> Option<String>;

    /// Replace the stored token
    fn save(&self, token: &str) -> std::io::Result<()>;

    /// Remove the stored token
    fn clear(&self) -> std::io::Result<()>;
}

/// Token store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

/// Token store backed by a small JSON key/value file
///
/// The file holds `{"auth_token": "<jwt>"}`; other keys are preserved.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        match std::fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable token file");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_vec_pretty(entries)?;
        std::fs::write(&self.path, body)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        self.read_entries()
            .remove(TOKEN_KEY)
            .filter(|t| !t.is_empty())
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        let mut entries = self.read_entries();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> std::io::Result<()> {
        let mut entries = self.read_entries();
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

/// Session lifecycle notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A token was stored after login or signup
    SignedIn,
    /// The user logged out
    SignedOut,
    /// The server rejected the token; the user must log in again
    LoginRequired,
}

/// Explicit session context shared by the client and the views
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// Create a session over the given token store
    pub fn new(store: impl TokenStore + 'static) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            store: Arc::new(store),
            events,
        }
    }

    /// Session with a process-local store
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.store.load()
    }

    /// Decoded claims of the current token
    pub fn claims(&self) -> Option<Claims> {
        self.token().as_deref().and_then(decode_claims)
    }

    /// Whether a non-expired token is stored
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// Whether a token is stored whose `exp` lies after `now`
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.token()
            .map(|token| is_token_valid(&token, now))
            .unwrap_or(false)
    }

    /// Store a freshly issued token
    pub fn sign_in(&self, token: &str) -> Result<()> {
        self.store.save(token)?;
        debug!("Session token stored");
        let _ = self.events.send(SessionEvent::SignedIn);
        Ok(())
    }

    /// Forget the token after an explicit logout
    pub fn sign_out(&self) -> Result<()> {
        self.store.clear()?;
        let _ = self.events.send(SessionEvent::SignedOut);
        Ok(())
    }

    /// Forget the token after the server rejected it
    pub fn expire(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear rejected token");
        }
        let _ = self.events.send(SessionEvent::LoginRequired);
    }

    /// Subscribe to session notifications
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.token().is_some())
            .finish()
    }
}

/// Build an unsigned token carrying the given claims
///
/// Handy for tests and local development servers; the signature segment is
/// a fixed placeholder because nothing on this side verifies it.
pub fn unsigned_token(claims: &Claims) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap_or_default());
    format!("{}.{}.unsigned", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_expiring_at(exp: i64) -> String {
        unsigned_token(&Claims {
            email: Some("farmer@example.com".into()),
            exp: Some(exp),
            ..Default::default()
        })
    }

    #[test]
    fn test_expiry_in_future_is_valid() {
        let now = Utc::now();
        let token = token_expiring_at((now + Duration::hours(1)).timestamp());
        assert!(is_token_valid(&token, now));
    }

    #[test]
    fn test_expiry_in_past_is_invalid() {
        let now = Utc::now();
        let token = token_expiring_at((now - Duration::seconds(1)).timestamp());
        assert!(!is_token_valid(&token, now));

        // exp == now is already expired
        let token = token_expiring_at(now.timestamp());
        assert!(!is_token_valid(&token, now));
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        let now = Utc::now();
        assert!(!is_token_valid("", now));
        assert!(!is_token_valid("not-a-jwt", now));
        assert!(!is_token_valid("a.%%%.c", now));
        assert!(!is_token_valid("a.bm90IGpzb24.c", now)); // "not json"
    }

    #[test]
    fn test_missing_exp_is_invalid() {
        let token = unsigned_token(&Claims {
            email: Some("farmer@example.com".into()),
            ..Default::default()
        });
        assert!(!is_token_valid(&token, Utc::now()));
    }

    #[test]
    fn test_padded_payload_decodes() {
        let payload = base64::engine::general_purpose::STANDARD.encode(br#"{"exp":4102444800}"#);
        let token = format!("h.{}.s", payload);
        assert_eq!(decode_claims(&token).unwrap().exp, Some(4_102_444_800));
    }

    #[test]
    fn test_session_sign_in_and_expire() {
        let session = Session::in_memory();
        let mut events = session.subscribe();
        let now = Utc::now();

        assert!(!session.is_authenticated_at(now));

        session
            .sign_in(&token_expiring_at((now + Duration::days(1)).timestamp()))
            .unwrap();
        assert!(session.is_authenticated_at(now));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::SignedIn);

        session.expire();
        assert!(session.token().is_none());
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoginRequired);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.load().is_none());
        store.save("abc.def.ghi").unwrap();
        assert_eq!(store.load().as_deref(), Some("abc.def.ghi"));

        // A second handle on the same file sees the token
        let other = FileTokenStore::new(store.path().to_path_buf());
        assert_eq!(other.load().as_deref(), Some("abc.def.ghi"));

        store.clear().unwrap();
        assert!(other.load().is_none());
    }

    #[test]
    fn test_seconds_remaining() {
        let now = Utc::now();
        let claims = Claims {
            exp: Some(now.timestamp() + 90),
            ..Default::default()
        };
        assert_eq!(seconds_remaining(&claims, now), Some(90));
    }
}
