//! Session-gated endpoints. Each handler receives the `Session` the gate already verified.

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Serialize;
use serde_json::json;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::identity::{Account, Session};

#[derive(Debug, Serialize)]
pub struct AccountsResponse {
    pub accounts: Vec<Account>,
}

pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Json<AccountsResponse> {
    let username = session.username.as_deref().unwrap_or_default();
    Json(AccountsResponse { accounts: state.accounts.accounts_for(username) })
}

/// Issue the identity assertion. Only the configured relying-party origin may
/// read the response, and credentials are allowed, so the origin is never `*`.
pub async fn issue_assertion(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> AppResult<impl IntoResponse> {
    let token = state.tokens.issue(&session, &state.config.rp_origin)?;
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, state.rp_origin_header.clone());
    headers.insert(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST"));
    tracing::info!(username = ?session.username, "assertion issued");
    Ok((headers, Json(json!({ "token": token }))))
}

/// Advertised by the config document but not supported.
pub async fn disconnect() -> AppError {
    AppError::not_implemented("disconnect_unsupported", "disconnect is not supported")
}
