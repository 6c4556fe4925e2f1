use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Event type code that matches every transaction type.
pub const WILDCARD_EVENT_TYPE: &str = "all";

/// Classifier of a stored condition.
///
/// Only the three blocking/override kinds take part in outcome
/// determination; anything else is carried through and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionType {
    NonOverridableBlock,
    OverridableBlock,
    Override,
    Other(String),
}

impl ConditionType {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionType::NonOverridableBlock => "non-overridable-block",
            ConditionType::OverridableBlock => "overridable-block",
            ConditionType::Override => "override",
            ConditionType::Other(s) => s,
        }
    }

    /// Returns true for either kind of block.
    #[inline]
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            ConditionType::NonOverridableBlock | ConditionType::OverridableBlock
        )
    }
}

impl From<&str> for ConditionType {
    fn from(s: &str) -> Self {
        match s {
            "non-overridable-block" => ConditionType::NonOverridableBlock,
            "overridable-block" => ConditionType::OverridableBlock,
            "override" => ConditionType::Override,
            other => ConditionType::Other(other.to_string()),
        }
    }
}

impl From<String> for ConditionType {
    fn from(s: String) -> Self {
        ConditionType::from(s.as_str())
    }
}

impl From<ConditionType> for String {
    fn from(t: ConditionType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role under which a perspective governs a party.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PerspectiveRole {
    GovernedAsCreditorBy,
    GovernedAsCreditorAccountBy,
    GovernedAsDebtorBy,
    GovernedAsDebtorAccountBy,
    Other(String),
}

impl PerspectiveRole {
    pub fn as_str(&self) -> &str {
        match self {
            PerspectiveRole::GovernedAsCreditorBy => "governed_as_creditor_by",
            PerspectiveRole::GovernedAsCreditorAccountBy => "governed_as_creditor_account_by",
            PerspectiveRole::GovernedAsDebtorBy => "governed_as_debtor_by",
            PerspectiveRole::GovernedAsDebtorAccountBy => "governed_as_debtor_account_by",
            PerspectiveRole::Other(s) => s,
        }
    }
}

impl From<&str> for PerspectiveRole {
    fn from(s: &str) -> Self {
        match s {
            "governed_as_creditor_by" => PerspectiveRole::GovernedAsCreditorBy,
            "governed_as_creditor_account_by" => PerspectiveRole::GovernedAsCreditorAccountBy,
            "governed_as_debtor_by" => PerspectiveRole::GovernedAsDebtorBy,
            "governed_as_debtor_account_by" => PerspectiveRole::GovernedAsDebtorAccountBy,
            other => PerspectiveRole::Other(other.to_string()),
        }
    }
}

impl From<String> for PerspectiveRole {
    fn from(s: String) -> Self {
        PerspectiveRole::from(s.as_str())
    }
}

impl From<PerspectiveRole> for String {
    fn from(r: PerspectiveRole) -> Self {
        r.as_str().to_string()
    }
}

impl fmt::Display for PerspectiveRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of the transaction a condition was looked up under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Creditor,
    Debtor,
}

impl Side {
    /// Returns true if a perspective with this role governs the side.
    #[inline]
    pub fn governs(self, role: &PerspectiveRole) -> bool {
        match self {
            Side::Creditor => matches!(
                role,
                PerspectiveRole::GovernedAsCreditorBy | PerspectiveRole::GovernedAsCreditorAccountBy
            ),
            Side::Debtor => matches!(
                role,
                PerspectiveRole::GovernedAsDebtorBy | PerspectiveRole::GovernedAsDebtorAccountBy
            ),
        }
    }
}

/// Binding of a condition to a role and a set of transaction types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perspective {
    #[serde(rename = "prsptv")]
    pub role: PerspectiveRole,

    #[serde(rename = "evtTp", default)]
    pub event_types: SmallVec<[String; 4]>,
}

impl Perspective {
    pub fn new<I, S>(role: PerspectiveRole, event_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Perspective {
            role,
            event_types: event_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the perspective applies to the given transaction type.
    #[inline]
    pub fn matches_event_type(&self, tx_type: &str) -> bool {
        self.event_types
            .iter()
            .any(|t| t == tx_type || t == WILDCARD_EVENT_TYPE)
    }
}

/// A standing restriction or permission attached to a party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "condTp")]
    pub condition_type: ConditionType,

    #[serde(rename = "incptnDtTm")]
    pub inception: DateTime<Utc>,

    /// None means the condition never expires
    #[serde(rename = "xprtnDtTm", default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,

    #[serde(rename = "prsptvs", default)]
    pub perspectives: Vec<Perspective>,
}

impl Condition {
    /// Returns true if `at` lies within `[inception, expiry]`.
    #[inline]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        at >= self.inception && self.expiry.map_or(true, |expiry| at <= expiry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_condition_type_parsing() {
        assert_eq!(
            ConditionType::from("non-overridable-block"),
            ConditionType::NonOverridableBlock
        );
        assert_eq!(ConditionType::from("override"), ConditionType::Override);
        assert_eq!(
            ConditionType::from("watch"),
            ConditionType::Other("watch".to_string())
        );
        assert_eq!(ConditionType::Other("watch".into()).to_string(), "watch");
    }

    #[test]
    fn test_side_governs() {
        assert!(Side::Creditor.governs(&PerspectiveRole::GovernedAsCreditorBy));
        assert!(Side::Creditor.governs(&PerspectiveRole::GovernedAsCreditorAccountBy));
        assert!(!Side::Creditor.governs(&PerspectiveRole::GovernedAsDebtorBy));
        assert!(Side::Debtor.governs(&PerspectiveRole::GovernedAsDebtorAccountBy));
        assert!(!Side::Debtor.governs(&PerspectiveRole::Other("both".into())));
    }

    #[test]
    fn test_wildcard_event_type() {
        let p = Perspective::new(PerspectiveRole::GovernedAsDebtorBy, ["all"]);
        assert!(p.matches_event_type("pacs.002.001.12"));
        assert!(p.matches_event_type("pacs.008.001.10"));

        let p = Perspective::new(PerspectiveRole::GovernedAsDebtorBy, ["pacs.008.001.10"]);
        assert!(!p.matches_event_type("pacs.002.001.12"));
    }

    #[test]
    fn test_active_window() {
        let now = Utc::now();
        let cond = Condition {
            condition_type: ConditionType::Override,
            inception: now,
            expiry: Some(now + Duration::days(1)),
            perspectives: vec![],
        };

        assert!(cond.is_active_at(now));
        assert!(cond.is_active_at(now + Duration::days(1)));
        assert!(!cond.is_active_at(now - Duration::seconds(1)));
        assert!(!cond.is_active_at(now + Duration::days(2)));

        let open_ended = Condition { expiry: None, ..cond };
        assert!(open_ended.is_active_at(now + Duration::days(3650)));
    }
}
