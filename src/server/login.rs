//! Login surface and the sign-in endpoint, the only handler that writes a session.
//!
//! Sign-in bodies are read according to `Content-Type`: `application/json` is
//! decoded as JSON, anything else as `application/x-www-form-urlencoded`. The
//! username stored in the session is always the one that was validated.

use std::path::Path;

use anyhow::Context;
use axum::extract::{FromRequest, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use handlebars::Handlebars;
use serde_json::json;

use super::{AppState, SIGNIN_PATH};
use crate::error::{AppError, AppResult};
use crate::identity::LoginRequest;

pub const LOGIN_TEMPLATE: &str = "login";
const EMBEDDED_LOGIN_TEMPLATE: &str = include_str!("../../templates/login.html");

/// Register the login template, from `path` when given, else the embedded copy.
pub fn load_templates(path: Option<&Path>) -> anyhow::Result<Handlebars<'static>> {
    let mut hb = Handlebars::new();
    match path {
        Some(p) => hb
            .register_template_file(LOGIN_TEMPLATE, p)
            .with_context(|| format!("Failed to load login template {}", p.display()))?,
        None => hb
            .register_template_string(LOGIN_TEMPLATE, EMBEDDED_LOGIN_TEMPLATE)
            .context("Failed to parse embedded login template")?,
    }
    Ok(hb)
}

pub async fn login_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let data = json!({ "signin_path": SIGNIN_PATH });
    state
        .templates
        .render(LOGIN_TEMPLATE, &data)
        .map(Html)
        .map_err(|e| AppError::internal("template_render", e.to_string()))
}

/// Credentials pulled from the sign-in body.
#[derive(Debug)]
pub struct SignInForm(pub LoginRequest);

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false)
}

impl<S> FromRequest<S> for SignInForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(body) = Json::<LoginRequest>::from_request(req, state).await.map_err(|e| {
                tracing::warn!(error = %e, "sign-in JSON body rejected");
                AppError::user("invalid_body", "Error decoding JSON")
            })?;
            Ok(SignInForm(body))
        } else {
            let Form(body) = Form::<LoginRequest>::from_request(req, state).await.map_err(|e| {
                tracing::warn!(error = %e, "sign-in form body rejected");
                AppError::user("invalid_body", "Error parsing form")
            })?;
            Ok(SignInForm(body))
        }
    }
}

pub async fn sign_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    SignInForm(creds): SignInForm,
) -> AppResult<Response> {
    if !state.credentials.validate(&creds) {
        tracing::warn!("sign-in rejected: bad credentials");
        return Err(AppError::auth("invalid_credentials", "username or password incorrect"));
    }

    let mut session = state.sessions.load(&headers);
    session.log_in(&creds.username)?;
    let cookie = state.sessions.save(&session)?;

    let mut out = HeaderMap::new();
    out.insert(header::SET_COOKIE, cookie);
    // Tells the browser's FedCM flow that the user is now signed in at this IdP.
    out.insert("set-login", HeaderValue::from_static("logged-in"));
    tracing::info!(username = %creds.username, "sign-in succeeded");
    Ok((StatusCode::OK, out, Json(json!({ "message": "success" }))).into_response())
}
