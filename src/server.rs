//!
//! FedCM identity provider HTTP server
//! -----------------------------------
//! This module defines the Axum-based HTTP surface the browser's FedCM flow talks to.
//!
//! Responsibilities:
//! - Discovery: the well-known file, the IdP config document and client metadata.
//! - Login surface and the sign-in endpoint that establishes the session cookie.
//! - Session-gated account listing and assertion issuance.
//! - JSON 404/405 fallbacks with the requested path logged.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method, Uri};
use axum::routing::{get, post};
use axum::{middleware, Router};
use handlebars::Handlebars;
use tracing::{info, warn};

use crate::config::IdpConfig;
use crate::error::AppError;
use crate::identity::{
    AccountResolver, ClientRegistry, CredentialValidator, OpaqueTokenIssuer, SessionCodec, SessionStore,
    StaticAccountResolver, StaticClientRegistry, StaticCredentialValidator, TokenIssuer,
};

pub mod accounts;
pub mod discovery;
pub mod gate;
pub mod login;

pub const LOGIN_PATH: &str = "/login";
pub const SIGNIN_PATH: &str = "/signin";
pub const CONFIG_PATH: &str = "/config.json";
pub const ASSERTION_PATH: &str = "/fedcm_assertion_endpoint";
pub const ACCOUNTS_PATH: &str = "/accounts";
pub const METADATA_PATH: &str = "/metadata";
pub const DISCONNECT_PATH: &str = "/disconnect";
pub const WELL_KNOWN_PATH: &str = "/.well-known/web-identity";

/// Shared server state injected into all handlers.
///
/// Everything here is read-only after startup; handlers never lock.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<IdpConfig>,
    pub sessions: Arc<SessionStore>,
    pub credentials: Arc<dyn CredentialValidator>,
    pub accounts: Arc<dyn AccountResolver>,
    pub clients: Arc<dyn ClientRegistry>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub templates: Arc<Handlebars<'static>>,
    /// Pre-validated `Access-Control-Allow-Origin` value for assertion responses.
    pub rp_origin_header: HeaderValue,
}

impl AppState {
    /// State wired with the reference collaborators: one user, one account, one client.
    pub fn new(config: IdpConfig) -> anyhow::Result<Self> {
        let codec = match &config.session_secret {
            Some(secret) => SessionCodec::new(secret.clone(), config.session_max_age_secs)?,
            None => {
                warn!("IDP_SESSION_SECRET not set; using a random secret, sessions will not survive a restart");
                SessionCodec::with_random_secret(config.session_max_age_secs)?
            }
        };
        let sessions = SessionStore::new(codec, config.secure_cookies);

        let origin = config.rp_origin.trim();
        if origin.is_empty() || origin == "*" {
            anyhow::bail!("relying-party origin must be a concrete origin, got {:?}", config.rp_origin);
        }
        let rp_origin_header = HeaderValue::from_str(origin)
            .with_context(|| format!("Invalid relying-party origin: {}", origin))?;

        let templates = login::load_templates(config.login_template.as_deref())?;

        Ok(Self {
            clients: Arc::new(StaticClientRegistry::reference(origin)),
            credentials: Arc::new(StaticCredentialValidator::default()),
            accounts: Arc::new(StaticAccountResolver::reference()),
            tokens: Arc::new(OpaqueTokenIssuer),
            sessions: Arc::new(sessions),
            templates: Arc::new(templates),
            rp_origin_header,
            config: Arc::new(config),
        })
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialValidator>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_accounts(mut self, accounts: Arc<dyn AccountResolver>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_clients(mut self, clients: Arc<dyn ClientRegistry>) -> Self {
        self.clients = clients;
        self
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenIssuer>) -> Self {
        self.tokens = tokens;
        self
    }
}

/// Mount every FedCM endpoint. Account listing, assertion issuance and
/// disconnect sit behind the session gate.
pub fn router(state: AppState) -> Router {
    let gated = Router::new()
        .route(ACCOUNTS_PATH, get(accounts::list_accounts))
        .route(ASSERTION_PATH, post(accounts::issue_assertion))
        .route(DISCONNECT_PATH, post(accounts::disconnect))
        .route_layer(middleware::from_fn_with_state(state.clone(), gate::require_session));

    Router::new()
        .route(LOGIN_PATH, get(login::login_page))
        .route(SIGNIN_PATH, post(login::sign_in))
        .route(CONFIG_PATH, get(discovery::config_document))
        .route(METADATA_PATH, get(discovery::client_metadata))
        .route(WELL_KNOWN_PATH, get(discovery::web_identity))
        .merge(gated)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    info!(path = %uri.path(), "Not found");
    AppError::not_found("not_found", "Not found")
}

async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    info!(method = %method, path = %uri.path(), "Method not allowed");
    AppError::method_not_allowed()
}

/// Start the IdP HTTP server on `0.0.0.0:<port>`.
pub async fn run_with_config(config: IdpConfig) -> anyhow::Result<()> {
    let port = config.port;
    info!(
        target: "startup",
        "fedcm-idp starting: base_url={}, rp_origin={}, secure_cookies={}, session_max_age={}s",
        config.base_url, config.rp_origin, config.secure_cookies, config.session_max_age_secs
    );
    let state = AppState::new(config).context("While building server state")?;
    let app = router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_origin_is_refused() {
        let cfg = IdpConfig { rp_origin: "*".into(), ..IdpConfig::default() };
        assert!(AppState::new(cfg).is_err());
    }

    #[test]
    fn reference_state_builds() {
        let cfg = IdpConfig { session_secret: Some(b"unit-test-secret".to_vec()), ..IdpConfig::default() };
        let state = AppState::new(cfg).unwrap();
        assert_eq!(state.rp_origin_header, "http://localhost:8001");
        assert!(state.clients.metadata_for("123").is_some());
    }
}
