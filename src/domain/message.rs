use serde::{Deserialize, Serialize};

/// Inbound pipeline envelope.
///
/// Only the fields the evaluator reads are typed; the raw JSON is kept
/// alongside so the outbound message can echo every original field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    pub transaction: Pacs002,

    #[serde(rename = "networkMap", default)]
    pub network_map: serde_json::Value,

    #[serde(rename = "DataCache")]
    pub data_cache: DataCache,

    #[serde(rename = "metaData", default)]
    pub metadata: serde_json::Value,
}

/// Payment status report (pacs.002).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pacs002 {
    #[serde(rename = "TxTp")]
    pub tx_type: String,

    #[serde(rename = "TenantId", default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    #[serde(rename = "FIToFIPmtSts")]
    pub payment_status: FiToFiPmtSts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiToFiPmtSts {
    #[serde(rename = "GrpHdr")]
    pub group_header: GroupHeader,

    #[serde(rename = "TxInfAndSts", default)]
    pub tx_info_and_status: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupHeader {
    #[serde(rename = "MsgId", default)]
    pub msg_id: String,

    /// Creation timestamp (ISO 8601)
    #[serde(rename = "CreDtTm")]
    pub created_at: String,
}

/// Party identifiers resolved by earlier pipeline stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataCache {
    #[serde(rename = "cdtrId", default)]
    pub creditor_id: String,

    #[serde(rename = "dbtrId", default)]
    pub debtor_id: String,

    #[serde(rename = "cdtrAcctId", default)]
    pub creditor_account_id: String,

    #[serde(rename = "dbtrAcctId", default)]
    pub debtor_account_id: String,
}
