pub mod condition;
pub mod message;
pub mod result;
pub mod timestamp;

pub use condition::{
    Condition, ConditionType, Perspective, PerspectiveRole, Side, WILDCARD_EVENT_TYPE,
};
pub use message::{DataCache, Pacs002, TransactionEnvelope};
pub use result::{RuleResult, SubRuleRef, RULE_CONFIG};
pub use timestamp::parse_timestamp;
