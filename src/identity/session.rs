use axum::http::{header, HeaderMap, HeaderValue};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    #[default]
    Absent,
    LoggedIn,
}

/// Browser session state carried in the signed cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub username: Option<String>,
    /// Unix seconds at which the session was last written.
    pub issued_at: i64,
}

impl Session {
    /// An unauthenticated session. It gets an id only once it is established by a login.
    pub fn absent() -> Self {
        Self { id: String::new(), status: SessionStatus::Absent, username: None, issued_at: chrono::Utc::now().timestamp() }
    }

    /// Mark the session logged in for `username`. The id is rotated so a
    /// pre-login cookie never becomes an authenticated one.
    pub fn log_in(&mut self, username: &str) -> AppResult<()> {
        self.id = gen_id()?;
        self.status = SessionStatus::LoggedIn;
        self.username = Some(username.to_string());
        self.issued_at = chrono::Utc::now().timestamp();
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.status == SessionStatus::LoggedIn
    }
}

fn gen_id() -> AppResult<String> {
    // 256-bit random id, base64url without padding
    let mut buf = [0u8; 32];
    getrandom::getrandom(&mut buf).map_err(|e| AppError::internal("session_id", e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(buf))
}

/// Signs and verifies session cookies. Built once at startup and shared read-only.
pub struct SessionCodec {
    secret: Vec<u8>,
    max_age_secs: i64,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec").field("max_age_secs", &self.max_age_secs).finish_non_exhaustive()
    }
}

impl SessionCodec {
    pub fn new(secret: Vec<u8>, max_age_secs: i64) -> anyhow::Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("session secret must not be empty");
        }
        if max_age_secs <= 0 {
            anyhow::bail!("session max age must be positive, got {}", max_age_secs);
        }
        Ok(Self { secret, max_age_secs })
    }

    /// Codec with a random 32-byte secret. Cookies do not survive a restart.
    pub fn with_random_secret(max_age_secs: i64) -> anyhow::Result<Self> {
        let mut secret = vec![0u8; 32];
        getrandom::getrandom(&mut secret).map_err(|e| anyhow::anyhow!("random secret: {}", e))?;
        Self::new(secret, max_age_secs)
    }

    pub fn max_age_secs(&self) -> i64 { self.max_age_secs }

    fn mac(&self) -> AppResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::internal("session_sign", format!("hmac key: {e}")))
    }

    /// `base64url(json) . base64url(hmac-sha256(json-b64))`
    pub fn encode(&self, session: &Session) -> AppResult<String> {
        let json = serde_json::to_vec(session)
            .map_err(|e| AppError::internal("session_encode", e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{}.{}", payload, sig))
    }

    /// Verify and decode a cookie value. Any defect (bad shape, bad MAC,
    /// bad JSON, expired) yields `None`.
    pub fn decode(&self, value: &str) -> Option<Session> {
        let (payload, sig) = value.split_once('.')?;
        let sig = URL_SAFE_NO_PAD.decode(sig).ok()?;
        let mut mac = self.mac().ok()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&sig).ok()?;
        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let session: Session = serde_json::from_slice(&json).ok()?;
        let now = chrono::Utc::now().timestamp();
        if session.issued_at.saturating_add(self.max_age_secs) < now {
            tracing::debug!(session_id = %session.id, "session cookie expired");
            return None;
        }
        Some(session)
    }
}

fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for cookie in headers.get_all(header::COOKIE) {
        let Ok(s) = cookie.to_str() else { continue; };
        for part in s.split(';') {
            let p = part.trim();
            if let Some((k, v)) = p.split_once('=') {
                if k == name { return Some(v.to_string()); }
            }
        }
    }
    None
}

/// Loads sessions from request cookies and renders them back as `Set-Cookie` values.
#[derive(Debug)]
pub struct SessionStore {
    codec: SessionCodec,
    secure_cookies: bool,
}

impl SessionStore {
    pub fn new(codec: SessionCodec, secure_cookies: bool) -> Self {
        Self { codec, secure_cookies }
    }

    /// Never fails: a missing or invalid cookie produces a fresh absent session.
    pub fn load(&self, headers: &HeaderMap) -> Session {
        parse_cookie(headers, SESSION_COOKIE)
            .and_then(|v| self.codec.decode(&v))
            .unwrap_or_else(Session::absent)
    }

    /// Render the session as a `Set-Cookie` header value.
    pub fn save(&self, session: &Session) -> AppResult<HeaderValue> {
        let value = self.codec.encode(session)?;
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; Max-Age={}",
            SESSION_COOKIE, value, self.codec.max_age_secs()
        );
        if self.secure_cookies {
            // FedCM fetches are cross-site; the cookie must be allowed on them.
            cookie.push_str("; Secure; SameSite=None");
        } else {
            cookie.push_str("; SameSite=Lax");
        }
        HeaderValue::from_str(&cookie).map_err(|e| AppError::internal("session_cookie", e.to_string()))
    }
}
