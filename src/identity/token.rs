use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::session::Session;
use crate::error::{AppError, AppResult};

/// Produces the identity assertion handed to the relying party.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, session: &Session, rp_origin: &str) -> AppResult<String>;
}

/// Issues opaque random tokens. Nothing in them is signed or verifiable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueTokenIssuer;

impl TokenIssuer for OpaqueTokenIssuer {
    fn issue(&self, session: &Session, rp_origin: &str) -> AppResult<String> {
        let mut buf = [0u8; 24];
        getrandom::getrandom(&mut buf).map_err(|e| AppError::internal("token_issue", e.to_string()))?;
        let token = URL_SAFE_NO_PAD.encode(buf);
        tracing::debug!(username = ?session.username, rp_origin = %rp_origin, "assertion issued");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_distinct_and_non_empty() {
        let mut s = Session::absent();
        s.log_in("John").unwrap();
        let a = OpaqueTokenIssuer.issue(&s, "http://localhost:8001").unwrap();
        let b = OpaqueTokenIssuer.issue(&s, "http://localhost:8001").unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
