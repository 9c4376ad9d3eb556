//! Session gate for endpoints that disclose personal data or issue credentials.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::AppState;
use crate::error::AppError;
use crate::identity::Session;

/// The whole authorization rule.
pub fn is_authorized(session: &Session) -> bool {
    session.is_logged_in()
}

/// Loads the session and rejects with 401 before the wrapped handler runs.
/// On success the `Session` is handed to the handler as a request extension.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = state.sessions.load(req.headers());
    if !is_authorized(&session) {
        tracing::warn!(path = %req.uri().path(), "rejected request without a logged-in session");
        return Err(AppError::unauthorized());
    }
    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
