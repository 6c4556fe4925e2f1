use chrono::{DateTime, SecondsFormat, Utc};
use prost::Message;
use tracing::warn;

use crate::domain::{parse_timestamp, Condition, Perspective};

use super::wire::{ConditionMessage, ConditionsRecord, PerspectiveMessage};
use super::{CodecError, ConditionDecoder};

/// Decoder for protobuf-encoded conditions records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufDecoder;

impl ProtobufDecoder {
    pub fn new() -> Self {
        ProtobufDecoder
    }
}

impl ConditionDecoder for ProtobufDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Condition>, CodecError> {
        let record = ConditionsRecord::decode(bytes)?;
        let mut conditions = Vec::with_capacity(record.conditions.len());

        for msg in record.conditions {
            let cond_id = msg.cond_id.clone();
            match Condition::try_from(msg) {
                Ok(condition) => conditions.push(condition),
                Err(e) => warn!(
                    cond_id = %cond_id,
                    error = %e,
                    "Skipping condition with an unreadable validity window"
                ),
            }
        }

        Ok(conditions)
    }
}

impl TryFrom<ConditionMessage> for Condition {
    type Error = CodecError;

    fn try_from(msg: ConditionMessage) -> Result<Self, Self::Error> {
        let inception = parse_field("incptnDtTm", &msg.incptn_dt_tm)?;

        let expiry = if msg.xprtn_dt_tm.trim().is_empty() {
            None
        } else {
            Some(parse_field("xprtnDtTm", &msg.xprtn_dt_tm)?)
        };

        let perspectives = msg
            .prsptvs
            .into_iter()
            .map(|p| Perspective::new(p.prsptv.into(), p.evt_tp))
            .collect();

        Ok(Condition {
            condition_type: msg.cond_tp.into(),
            inception,
            expiry,
            perspectives,
        })
    }
}

/// Encode conditions into a storable record.
///
/// Used to seed stores from fixtures; perspective windows mirror the
/// owning condition's window.
pub fn encode_conditions(conditions: &[Condition]) -> Vec<u8> {
    let record = ConditionsRecord {
        conditions: conditions.iter().map(to_message).collect(),
    };

    record.encode_to_vec()
}

fn to_message(condition: &Condition) -> ConditionMessage {
    let inception = format_timestamp(&condition.inception);
    let expiry = condition
        .expiry
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_default();

    ConditionMessage {
        cond_tp: condition.condition_type.to_string(),
        incptn_dt_tm: inception.clone(),
        xprtn_dt_tm: expiry.clone(),
        prsptvs: condition
            .perspectives
            .iter()
            .map(|p| PerspectiveMessage {
                prsptv: p.role.to_string(),
                evt_tp: p.event_types.to_vec(),
                incptn_dt_tm: inception.clone(),
                xprtn_dt_tm: expiry.clone(),
            })
            .collect(),
        ..Default::default()
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<DateTime<Utc>, CodecError> {
    parse_timestamp(value).ok_or_else(|| CodecError::Timestamp {
        field,
        value: value.to_string(),
    })
}

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConditionType, PerspectiveRole};
    use chrono::{Duration, TimeZone};

    fn sample_condition() -> Condition {
        let inception = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        Condition {
            condition_type: ConditionType::NonOverridableBlock,
            inception,
            expiry: Some(inception + Duration::days(7)),
            perspectives: vec![
                Perspective::new(
                    PerspectiveRole::GovernedAsCreditorBy,
                    ["pacs.008.001.10", "pacs.002.001.12"],
                ),
                Perspective::new(PerspectiveRole::GovernedAsDebtorBy, ["all"]),
            ],
        }
    }

    #[test]
    fn test_decode_encoded_record() {
        let condition = sample_condition();
        let bytes = encode_conditions(std::slice::from_ref(&condition));

        let decoded = ProtobufDecoder::new().decode(&bytes).unwrap();

        assert_eq!(decoded, vec![condition]);
    }

    #[test]
    fn test_empty_expiry_never_expires() {
        let msg = ConditionMessage {
            cond_tp: "override".to_string(),
            incptn_dt_tm: "2025-03-01T12:00:00.000Z".to_string(),
            xprtn_dt_tm: String::new(),
            ..Default::default()
        };

        let condition = Condition::try_from(msg).unwrap();

        assert_eq!(condition.condition_type, ConditionType::Override);
        assert!(condition.expiry.is_none());
        assert!(condition.perspectives.is_empty());
    }

    #[test]
    fn test_unknown_values_are_preserved() {
        let msg = ConditionMessage {
            cond_tp: "watchlist".to_string(),
            incptn_dt_tm: "2025-03-01T12:00:00+02:00".to_string(),
            prsptvs: vec![PerspectiveMessage {
                prsptv: "both".to_string(),
                evt_tp: vec!["pacs.002.001.12".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };

        let condition = Condition::try_from(msg).unwrap();

        assert_eq!(condition.condition_type, ConditionType::Other("watchlist".into()));
        assert_eq!(condition.perspectives[0].role, PerspectiveRole::Other("both".into()));
        assert_eq!(
            condition.inception,
            Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_timestamp() {
        let msg = ConditionMessage {
            cond_tp: "override".to_string(),
            incptn_dt_tm: "yesterday".to_string(),
            ..Default::default()
        };

        let err = Condition::try_from(msg).unwrap_err();
        assert!(matches!(err, CodecError::Timestamp { field: "incptnDtTm", .. }));
    }

    #[test]
    fn test_date_only_expiry() {
        let msg = ConditionMessage {
            cond_tp: "override".to_string(),
            incptn_dt_tm: "2024-08-01T00:00:00".to_string(),
            xprtn_dt_tm: "2024-08-16".to_string(),
            ..Default::default()
        };

        let condition = Condition::try_from(msg).unwrap();

        assert_eq!(
            condition.inception,
            Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            condition.expiry,
            Some(Utc.with_ymd_and_hms(2024, 8, 16, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_unreadable_condition_skips_only_itself() {
        let record = ConditionsRecord {
            conditions: vec![
                ConditionMessage {
                    cond_id: "bad".to_string(),
                    cond_tp: "override".to_string(),
                    incptn_dt_tm: "2025-03-01T12:00:00.000Z".to_string(),
                    xprtn_dt_tm: "next tuesday".to_string(),
                    ..Default::default()
                },
                to_message(&sample_condition()),
            ],
        };

        let decoded = ProtobufDecoder::new()
            .decode(&record.encode_to_vec())
            .unwrap();

        assert_eq!(decoded, vec![sample_condition()]);
    }

    #[test]
    fn test_corrupted_bytes() {
        // Truncated varint
        let err = ProtobufDecoder::new().decode(&[0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, CodecError::Protobuf(_)));
    }
}
