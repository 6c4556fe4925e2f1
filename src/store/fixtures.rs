use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::codec::encode_conditions;
use crate::domain::Condition;
use crate::tenant::DEFAULT_TENANT;

use super::memory::MemoryConditionStore;
use super::traits::{KeyScheme, PartyKind};

/// Errors that can occur during fixture loading.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// File of party conditions used to seed a [`MemoryConditionStore`].
#[derive(Debug, Deserialize)]
pub struct FixtureFile {
    #[serde(default)]
    pub records: Vec<FixtureRecord>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureRecord {
    pub kind: FixtureKind,

    #[serde(default = "default_tenant")]
    pub tenant: String,

    pub id: String,

    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureKind {
    Entity,
    Account,
}

impl From<FixtureKind> for PartyKind {
    fn from(kind: FixtureKind) -> Self {
        match kind {
            FixtureKind::Entity => PartyKind::Entity,
            FixtureKind::Account => PartyKind::Account,
        }
    }
}

fn default_tenant() -> String {
    DEFAULT_TENANT.to_string()
}

/// Parse a fixture file from YAML text.
pub fn parse_fixtures(content: &str) -> Result<FixtureFile, FixtureError> {
    let fixtures: FixtureFile = serde_yaml::from_str(content)?;

    for record in &fixtures.records {
        if record.id.trim().is_empty() {
            return Err(FixtureError::Validation(
                "Fixture record id cannot be empty".to_string(),
            ));
        }
        if record.tenant.trim().is_empty() {
            return Err(FixtureError::Validation(format!(
                "Fixture record {} has an empty tenant",
                record.id
            )));
        }
    }

    Ok(fixtures)
}

/// Load a fixture file and encode each record into the store.
///
/// Returns the number of records stored.
pub fn load_fixtures(
    path: impl AsRef<Path>,
    scheme: KeyScheme,
    store: &MemoryConditionStore,
) -> Result<usize, FixtureError> {
    let content = fs::read_to_string(path)?;
    let fixtures = parse_fixtures(&content)?;

    for record in &fixtures.records {
        let key = scheme.key(record.kind.into(), &record.tenant, &record.id);
        store.insert(key, encode_conditions(&record.conditions));
    }

    Ok(fixtures.records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{ConditionDecoder, ProtobufDecoder};
    use crate::domain::{ConditionType, PerspectiveRole};
    use crate::store::ConditionStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURES: &str = r#"
records:
  - kind: entity
    id: "+27733161225"
    conditions:
      - condTp: non-overridable-block
        incptnDtTm: "2025-01-01T00:00:00.000Z"
        xprtnDtTm: "2025-12-31T00:00:00.000Z"
        prsptvs:
          - prsptv: governed_as_creditor_by
            evtTp: ["pacs.008.001.10", "pacs.002.001.12"]
  - kind: account
    tenant: bank-a
    id: "acct-1"
    conditions:
      - condTp: override
        incptnDtTm: "2025-01-01T00:00:00.000Z"
        prsptvs:
          - prsptv: governed_as_debtor_account_by
            evtTp: ["all"]
"#;

    #[test]
    fn test_parse_fixtures() {
        let fixtures = parse_fixtures(FIXTURES).unwrap();

        assert_eq!(fixtures.records.len(), 2);
        assert_eq!(fixtures.records[0].tenant, "default");
        assert_eq!(fixtures.records[1].tenant, "bank-a");

        let cond = &fixtures.records[1].conditions[0];
        assert_eq!(cond.condition_type, ConditionType::Override);
        assert!(cond.expiry.is_none());
        assert_eq!(
            cond.perspectives[0].role,
            PerspectiveRole::GovernedAsDebtorAccountBy
        );
    }

    #[test]
    fn test_empty_id_rejected() {
        let yaml = r#"
records:
  - kind: entity
    id: "  "
"#;
        let err = parse_fixtures(yaml).unwrap_err();
        assert!(matches!(err, FixtureError::Validation(_)));
    }

    #[tokio::test]
    async fn test_load_into_store() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", FIXTURES).unwrap();

        let store = MemoryConditionStore::new();
        let count = load_fixtures(file.path(), KeyScheme::Scoped, &store).unwrap();

        assert_eq!(count, 2);

        let bytes = store
            .get_buffer("entities/default/+27733161225")
            .await
            .unwrap()
            .unwrap();
        let conditions = ProtobufDecoder::new().decode(&bytes).unwrap();
        assert_eq!(conditions[0].condition_type, ConditionType::NonOverridableBlock);

        assert!(store
            .get_buffer("accounts/bank-a/acct-1")
            .await
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_missing_file() {
        let store = MemoryConditionStore::new();
        let result = load_fixtures("/nonexistent/fixtures.yaml", KeyScheme::Scoped, &store);
        assert!(matches!(result, Err(FixtureError::Io(_))));
    }
}
