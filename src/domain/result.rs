use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Fixed configuration marker carried on every rule result.
pub const RULE_CONFIG: &str = "none";

/// Sub-rule outcome of a condition evaluation.
///
/// Ordered by precedence: `Block` dominates `Override`, which dominates `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SubRuleRef {
    /// No applicable condition
    None = 0,
    /// Transaction explicitly permitted
    Override = 1,
    /// Transaction must be stopped
    Block = 2,
}

impl SubRuleRef {
    #[inline]
    pub fn is_block(&self) -> bool {
        *self == SubRuleRef::Block
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubRuleRef::None => "none",
            SubRuleRef::Override => "override",
            SubRuleRef::Block => "block",
        }
    }
}

impl Default for SubRuleRef {
    fn default() -> Self {
        SubRuleRef::None
    }
}

impl fmt::Display for SubRuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result emitted to the next pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    /// Rule identifier (`name@version`)
    pub id: String,

    pub cfg: String,

    #[serde(rename = "subRuleRef")]
    pub sub_rule_ref: SubRuleRef,

    /// Processing time in nanoseconds, back-filled after outcome determination
    #[serde(rename = "prcgTm")]
    pub processing_time: u64,

    #[serde(rename = "tenantId")]
    pub tenant_id: String,
}

impl RuleResult {
    pub fn new(id: impl Into<String>, sub_rule_ref: SubRuleRef, tenant_id: impl Into<String>) -> Self {
        RuleResult {
            id: id.into(),
            cfg: RULE_CONFIG.to_string(),
            sub_rule_ref,
            processing_time: 0,
            tenant_id: tenant_id.into(),
        }
    }

    /// JSON form attached to outbound messages as `ruleResult`.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "cfg": self.cfg,
            "subRuleRef": self.sub_rule_ref.as_str(),
            "prcgTm": self.processing_time,
            "tenantId": self.tenant_id,
        })
    }
}
