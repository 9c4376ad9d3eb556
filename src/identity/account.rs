use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An identity the user may present to a relying party.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), email: email.into() }
    }
}

/// Maps an authenticated username to the accounts it may assert.
pub trait AccountResolver: Send + Sync {
    fn accounts_for(&self, username: &str) -> Vec<Account>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticAccountResolver {
    by_user: HashMap<String, Vec<Account>>,
}

impl StaticAccountResolver {
    pub fn new() -> Self { Self::default() }

    pub fn with_accounts(mut self, username: impl Into<String>, accounts: Vec<Account>) -> Self {
        self.by_user.insert(username.into(), accounts);
        self
    }

    /// The reference user and their single account.
    pub fn reference() -> Self {
        Self::new().with_accounts("John", vec![Account::new("1234", "John Doe", "john_doe@idp.example")])
    }
}

impl AccountResolver for StaticAccountResolver {
    fn accounts_for(&self, username: &str) -> Vec<Account> {
        self.by_user.get(username).cloned().unwrap_or_default()
    }
}
