use actix::Message;
use serde::{Deserialize, Serialize};

use crate::game::GameState;

/// Message sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientMessage {
    pub message_type: String,
    pub row: Option<i64>,
    pub col: Option<i64>,
}

/// Message sent from server to client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerMessage {
    pub message_type: String,
    pub state: Option<GameState>,
    pub error: Option<String>,
}

impl ServerMessage {
    pub fn state(snapshot: GameState) -> Self {
        ServerMessage {
            message_type: "state".to_string(),
            state: Some(snapshot),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage {
            message_type: "error".to_string(),
            state: None,
            error: Some(message.into()),
        }
    }
}

/// Message type for WebSocket communication
#[derive(Message)]
#[rtype(result = "()")]
pub struct GridWebSocketMessage(pub String);
