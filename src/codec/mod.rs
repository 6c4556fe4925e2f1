pub mod protobuf;
pub mod wire;

pub use protobuf::{encode_conditions, ProtobufDecoder};

use thiserror::Error;

use crate::domain::Condition;

/// Errors that can occur while decoding a stored conditions record.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Protobuf decode error: {0}")]
    Protobuf(#[from] prost::DecodeError),

    #[error("Invalid timestamp in {field}: {value:?}")]
    Timestamp { field: &'static str, value: String },
}

/// Decoder for raw condition records fetched from the store.
pub trait ConditionDecoder: Send + Sync {
    /// Decode a non-empty record into its conditions.
    ///
    /// Fails only when the record itself is unreadable. A single condition
    /// with an unusable validity window is left out of the result.
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Condition>, CodecError>;
}
