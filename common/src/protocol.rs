//! JSON messages exchanged over the game socket.
//!
//! Outbound: `{"event":"game_state","payload":{...}}` and
//! `{"event":"error","payload":{"message":...}}`.
//! Inbound: `{"operation":"turn","payload":{"turn":N}}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatePayload {
    pub whose_turn: Option<String>,
    pub grid: Vec<u8>,
    pub winner: Option<String>,
    pub status: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    GameState(GameStatePayload),
    Error(ErrorPayload),
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error(ErrorPayload {
            message: message.into(),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPayload {
    // Signed so that negative cell numbers reach the rules check instead of
    // failing as malformed JSON.
    pub turn: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "payload", rename_all = "snake_case")]
pub enum ClientOperation {
    Turn(TurnPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Validates an inbound text frame against the closed set of operations.
pub fn parse_operation(text: &str) -> Result<ClientOperation, ProtocolError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

    match value.get("operation").and_then(|op| op.as_str()) {
        Some("turn") => {}
        Some(other) => return Err(ProtocolError::UnsupportedOperation(other.to_string())),
        None => return Err(ProtocolError::Malformed("missing field `operation`".to_string())),
    }

    serde_json::from_value(value).map_err(|e| ProtocolError::Malformed(e.to_string()))
}
