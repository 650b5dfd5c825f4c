use actix::Addr;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::game::GameSession;
use crate::leaderboard::Leaderboard;
use crate::websocket::GridWebSocket;

/// Application state shared between connections
pub struct AppState {
    /// The one shared game epoch: engine plus submission gate, mutated as a
    /// unit so commands never interleave their read-modify-write.
    pub game: Mutex<GameSession>,
    pub leaderboard: Mutex<Leaderboard>,
    /// Connected WebSocket observers, by connection id.
    pub sessions: Mutex<HashMap<String, Addr<GridWebSocket>>>,
}
