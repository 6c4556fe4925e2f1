use serde_json::Value;

use crate::domain::Pacs002;

/// Tenant used when a message carries no usable tenant identifier.
pub const DEFAULT_TENANT: &str = "default";

static TENANT_KEYS: [&str; 2] = ["TenantId", "tenantId"];
const PAYMENT_STATUS_KEY: &str = "FIToFIPmtSts";

/// Resolve the tenant of a loosely typed transaction payload.
///
/// Checks `TenantId` then `tenantId` at the top level, then the same two
/// keys under `FIToFIPmtSts`. The first non-blank string wins.
pub fn extract_tenant_id(transaction: Option<&Value>) -> String {
    let Some(transaction) = transaction else {
        return DEFAULT_TENANT.to_string();
    };

    let nested = transaction.get(PAYMENT_STATUS_KEY);

    [Some(transaction), nested]
        .into_iter()
        .flatten()
        .flat_map(|obj| TENANT_KEYS.iter().filter_map(move |key| obj.get(*key)))
        .find_map(non_blank)
        .unwrap_or_else(|| DEFAULT_TENANT.to_string())
}

/// Resolve the tenant of a typed pacs.002 message (top-level `TenantId` only).
pub fn extract_tenant_id_from_pacs002(transaction: &Pacs002) -> String {
    transaction
        .tenant_id
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_TENANT.to_string())
}

fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
