use serde::{Deserialize, Serialize};

use crate::errors::message_error::MessageError;

pub const MESSAGE_TYPE: &str = "log";

/// A single test telemetry record, as consumed by the collector.
///
/// Fields are serialized in declaration order: `type`, `service`, `message`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: String,
    pub service: String,
    pub message: String,
}

impl Message {
    pub fn new(service: &str, sequence: u32) -> Message {
        Self {
            kind: MESSAGE_TYPE.to_string(),
            service: service.to_string(),
            message: format!("Test message {}", sequence),
        }
    }

    pub fn new_as_bytes(service: &str, sequence: u32) -> Result<Vec<u8>, MessageError> {
        let message = Self::new(service, sequence);
        serde_json::to_vec(&message).map_err(|source| MessageError::Serialize { sequence, source })
    }
}
