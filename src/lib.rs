pub mod api;
pub mod codec;
pub mod config;
pub mod domain;
pub mod evaluator;
pub mod observability;
pub mod publish;
pub mod store;
pub mod tenant;

pub use config::{Config, EvaluatorConfig};
pub use domain::{Condition, ConditionType, RuleResult, SubRuleRef};
pub use evaluator::{sanitize_conditions, ConditionEvaluator, EvaluatorError};
pub use tenant::{extract_tenant_id, extract_tenant_id_from_pacs002};
