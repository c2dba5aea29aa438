//! Sign in / sign up / password reset against the hosted auth service
//!
//! A successful sign-in is persisted as JSON next to the other per-user data
//! and its access token becomes the bearer for REST calls.

use crate::error::AuthError;
use crate::gateway::extract_message;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SESSION_FILE: &str = "session.json";

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }

    fn from_token_response(body: &Value, now: DateTime<Utc>) -> Option<Self> {
        let access_token = body.get("access_token")?.as_str()?.to_string();
        let expires_at = body
            .get("expires_in")
            .and_then(Value::as_i64)
            .map(|secs| now + Duration::seconds(secs));
        Some(Self {
            access_token,
            refresh_token: body
                .get("refresh_token")
                .and_then(Value::as_str)
                .map(str::to_string),
            expires_at,
            email: body
                .pointer("/user/email")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// Persisted session file.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved session, if any. Unreadable files count as signed out.
    pub fn load(&self) -> Option<AuthSession> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                None
            }
        }
    }

    pub fn save(&self, session: &AuthSession) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), AuthError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Access token of a live session, or `None` to fall back to the anon key.
    pub fn bearer(&self, now: DateTime<Utc>) -> Option<String> {
        self.load()
            .filter(|s| !s.is_expired(now))
            .map(|s| s.access_token)
    }
}

/// Outcome of a sign-up.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUp {
    SignedIn(AuthSession),
    /// The service wants the address confirmed first
    ConfirmationSent,
}

pub struct AuthClient {
    base_url: String,
    anon_key: String,
    agent: ureq::Agent,
}

fn map_error(err: ureq::Error) -> AuthError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            AuthError::Rejected(extract_message(&body).unwrap_or_else(|| format!("HTTP {}", code)))
        }
        ureq::Error::Transport(t) => AuthError::Transport(t.to_string()),
    }
}

impl AuthClient {
    pub fn new(url: &str, anon_key: &str, timeout: std::time::Duration) -> Result<Self, AuthError> {
        if url.trim().is_empty() {
            return Err(AuthError::NotConfigured);
        }
        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        })
    }

    fn post(&self, path: &str, bearer: Option<&str>) -> ureq::Request {
        let token = bearer.unwrap_or(&self.anon_key);
        self.agent
            .post(&format!("{}/auth/v1/{}", self.base_url, path))
            .set("apikey", &self.anon_key)
            .set("Authorization", &format!("Bearer {}", token))
    }

    pub fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        info!(email, "signing in");
        let body: Value = self
            .post("token", None)
            .query("grant_type", "password")
            .send_json(json!({ "email": email, "password": password }))
            .map_err(map_error)?
            .into_json()?;
        AuthSession::from_token_response(&body, Utc::now())
            .ok_or_else(|| AuthError::Rejected("No access token in response".to_string()))
    }

    pub fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, AuthError> {
        info!(email, "signing up");
        let body: Value = self
            .post("signup", None)
            .send_json(json!({ "email": email, "password": password }))
            .map_err(map_error)?
            .into_json()?;
        Ok(match AuthSession::from_token_response(&body, Utc::now()) {
            Some(session) => SignUp::SignedIn(session),
            None => SignUp::ConfirmationSent,
        })
    }

    pub fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        info!(email, "requesting password reset");
        self.post("recover", None)
            .send_json(json!({ "email": email }))
            .map_err(map_error)?;
        Ok(())
    }

    pub fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError> {
        info!("signing out");
        self.post("logout", Some(&session.access_token))
            .call()
            .map_err(map_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session(expires_at: Option<DateTime<Utc>>) -> AuthSession {
        AuthSession {
            access_token: "tok".into(),
            refresh_token: Some("ref".into()),
            expires_at,
            email: Some("ana@example.com".into()),
        }
    }

    #[test]
    fn test_store_round_trip_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(store.load().is_none());

        let s = session(None);
        store.save(&s).unwrap();
        assert_eq!(store.load().unwrap(), s);

        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_expired_session_falls_back_to_anon() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let now = Utc::now();

        store.save(&session(Some(now - Duration::minutes(1)))).unwrap();
        assert_eq!(store.bearer(now), None);

        store.save(&session(Some(now + Duration::hours(1)))).unwrap();
        assert_eq!(store.bearer(now).as_deref(), Some("tok"));
    }

    #[test]
    fn test_garbage_session_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        fs::write(store.path(), "not json").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_token_response_parsing() {
        let now = Utc::now();
        let body = json!({
            "access_token": "abc", "token_type": "bearer", "expires_in": 3600,
            "refresh_token": "r", "user": {"email": "ana@example.com"}
        });
        let s = AuthSession::from_token_response(&body, now).unwrap();
        assert_eq!(s.access_token, "abc");
        assert_eq!(s.expires_at, Some(now + Duration::seconds(3600)));
        assert_eq!(s.email.as_deref(), Some("ana@example.com"));

        assert!(AuthSession::from_token_response(&json!({"id": "u1"}), now).is_none());
    }

    #[test]
    fn test_client_requires_url() {
        let err = AuthClient::new("  ", "anon", std::time::Duration::from_secs(1)).err();
        assert!(matches!(err, Some(AuthError::NotConfigured)));
    }
}
