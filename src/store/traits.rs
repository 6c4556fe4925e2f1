// src/store/traits.rs
use async_trait::async_trait;
use clap::ValueEnum;
use std::fmt;

/// Category of party a conditions record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartyKind {
    Entity,
    Account,
}

impl PartyKind {
    pub fn collection(&self) -> &'static str {
        match self {
            PartyKind::Entity => "entities",
            PartyKind::Account => "accounts",
        }
    }
}

impl fmt::Display for PartyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Layout of condition record keys in the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum KeyScheme {
    /// `entities/<tenant>/<id>` and `accounts/<tenant>/<id>`
    #[default]
    Scoped,
    /// `<tenant>:<id>`
    Legacy,
}

impl KeyScheme {
    /// Build the store key for a party's conditions record.
    pub fn key(&self, kind: PartyKind, tenant_id: &str, party_id: &str) -> String {
        match self {
            KeyScheme::Scoped => format!("{}/{}/{}", kind.collection(), tenant_id, party_id),
            KeyScheme::Legacy => format!("{}:{}", tenant_id, party_id),
        }
    }
}

/// Read access to stored condition records.
///
/// Implementations are shared across concurrent evaluations and must be
/// safe for concurrent reads.
#[async_trait]
pub trait ConditionStore: Send + Sync {
    /// Fetch the raw record under `key`. A missing key yields `None`.
    async fn get_buffer(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;
}
