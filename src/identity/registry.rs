use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// What the browser shows about a relying party during sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientMetadata {
    pub privacy_policy_url: String,
    pub terms_of_service_url: String,
}

/// Known relying-party clients, keyed by `client_id`.
pub trait ClientRegistry: Send + Sync {
    /// Exact-match lookup; prefixes or case variants of a known id are unknown ids.
    fn metadata_for(&self, client_id: &str) -> Option<ClientMetadata>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticClientRegistry {
    clients: HashMap<String, ClientMetadata>,
}

impl StaticClientRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn with_client(mut self, client_id: impl Into<String>, metadata: ClientMetadata) -> Self {
        self.clients.insert(client_id.into(), metadata);
        self
    }

    /// Client `123`, hosted by the relying party at `rp_origin`.
    pub fn reference(rp_origin: &str) -> Self {
        let rp = rp_origin.trim_end_matches('/');
        Self::new().with_client("123", ClientMetadata {
            privacy_policy_url: format!("{}/privacy_policy.html", rp),
            terms_of_service_url: format!("{}/terms_of_service.html", rp),
        })
    }
}

impl ClientRegistry for StaticClientRegistry {
    fn metadata_for(&self, client_id: &str) -> Option<ClientMetadata> {
        self.clients.get(client_id).cloned()
    }
}
