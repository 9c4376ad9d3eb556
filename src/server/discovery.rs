//! Unauthenticated discovery endpoints: well-known file, IdP config and client metadata.
//! Output depends only on deployment configuration, never on the request's session.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{AppState, ACCOUNTS_PATH, ASSERTION_PATH, DISCONNECT_PATH, LOGIN_PATH, METADATA_PATH};
use crate::error::{AppError, AppResult};
use crate::identity::ClientMetadata;

/// The IdP config file. Built from the same path constants the router mounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigDocument {
    pub accounts_endpoint: String,
    pub client_metadata_endpoint: String,
    pub id_assertion_endpoint: String,
    pub disconnect_endpoint: String,
    pub login_url: String,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            accounts_endpoint: ACCOUNTS_PATH.to_string(),
            client_metadata_endpoint: METADATA_PATH.to_string(),
            id_assertion_endpoint: ASSERTION_PATH.to_string(),
            disconnect_endpoint: DISCONNECT_PATH.to_string(),
            login_url: LOGIN_PATH.to_string(),
        }
    }
}

pub async fn web_identity(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "provider_urls": [state.config.config_url()] }))
}

pub async fn config_document() -> Json<ConfigDocument> {
    Json(ConfigDocument::default())
}

#[derive(Debug, Deserialize)]
pub struct MetadataQuery {
    client_id: Option<String>,
}

pub async fn client_metadata(
    State(state): State<AppState>,
    query: Result<Query<MetadataQuery>, QueryRejection>,
) -> AppResult<Json<ClientMetadata>> {
    let client_id = match query {
        Ok(Query(q)) => q.client_id,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable client metadata query");
            None
        }
    };
    let Some(client_id) = client_id else {
        return Err(AppError::user("invalid_client", "invalid client_id."));
    };
    match state.clients.metadata_for(&client_id) {
        Some(meta) => Ok(Json(meta)),
        None => {
            tracing::warn!(client_id = %client_id, "metadata requested for unknown client");
            Err(AppError::user("invalid_client", "invalid client_id."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_document_shape() {
        let v = serde_json::to_value(ConfigDocument::default()).unwrap();
        assert_eq!(v, json!({
            "accounts_endpoint": "/accounts",
            "client_metadata_endpoint": "/metadata",
            "id_assertion_endpoint": "/fedcm_assertion_endpoint",
            "disconnect_endpoint": "/disconnect",
            "login_url": "/login",
        }));
    }
}
