//! Protobuf wire records for stored party conditions.
//!
//! Timestamps travel as ISO 8601 strings; an empty expiry means the
//! condition never expires.

/// A stored record: every condition attached to one entity or account.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ConditionsRecord {
    #[prost(message, repeated, tag = "1")]
    pub conditions: Vec<ConditionMessage>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ConditionMessage {
    #[prost(string, tag = "1")]
    pub cond_id: String,

    #[prost(string, tag = "2")]
    pub cond_tp: String,

    #[prost(string, tag = "3")]
    pub incptn_dt_tm: String,

    #[prost(string, tag = "4")]
    pub xprtn_dt_tm: String,

    #[prost(string, tag = "5")]
    pub cond_rsn: String,

    #[prost(string, tag = "6")]
    pub usr: String,

    #[prost(string, tag = "7")]
    pub cre_dt_tm: String,

    #[prost(message, repeated, tag = "8")]
    pub prsptvs: Vec<PerspectiveMessage>,

    #[prost(string, tag = "9")]
    pub tenant_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PerspectiveMessage {
    #[prost(string, tag = "1")]
    pub prsptv: String,

    #[prost(string, repeated, tag = "2")]
    pub evt_tp: Vec<String>,

    #[prost(string, tag = "3")]
    pub incptn_dt_tm: String,

    #[prost(string, tag = "4")]
    pub xprtn_dt_tm: String,
}
