use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use uuid::Uuid;

use crate::game::ClickOutcome;
use crate::models::{AppState, ClientMessage, GridWebSocketMessage, ServerMessage};

/// WebSocket handler for one connected observer of the shared grid.
pub struct GridWebSocket {
    pub id: String,
    pub app_state: web::Data<AppState>,
}

impl Actor for GridWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        // Register the actor with the application state
        let addr = ctx.address();
        self.app_state
            .sessions
            .lock()
            .unwrap()
            .insert(self.id.clone(), addr);

        let total_sessions = self.app_state.sessions.lock().unwrap().len();
        info!("WebSocket connection started: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        // Every new observer immediately receives the full snapshot.
        self.send_state(ctx);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.app_state.sessions.lock().unwrap().remove(&self.id);
        let total_sessions = self.app_state.sessions.lock().unwrap().len();
        info!("WebSocket connection closed: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        Running::Stop
    }
}

impl Handler<GridWebSocketMessage> for GridWebSocket {
    type Result = ();

    fn handle(&mut self, msg: GridWebSocketMessage, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GridWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                // Do nothing for pong messages
            }
            Ok(ws::Message::Text(text)) => {
                info!("Received text message: {}", text);
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => {
                        self.handle_message(client_msg, ctx);
                    }
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        self.send_error(format!("Invalid message format: {}", e), ctx);
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.send_error("Binary messages are not supported", ctx);
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl GridWebSocket {
    pub fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match msg.message_type.as_str() {
            "click" => self.handle_click(msg, ctx),
            "reset" => self.handle_reset(ctx),
            _ => {
                warn!("Unknown message type: {}", msg.message_type);
                self.send_error(format!("Unknown message type: {}", msg.message_type), ctx);
            }
        }
    }

    fn handle_click(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let (row, col) = match (msg.row, msg.col) {
            (Some(row), Some(col)) => (row, col),
            _ => {
                warn!("Click message missing row or col");
                self.send_error("Click requires row and col", ctx);
                return;
            }
        };

        // Scope the lock: resolve the command, then broadcast outside it.
        let outcome = self.app_state.game.lock().unwrap().click(row, col);
        info!("Click at ({}, {}) resolved as {:?}", row, col, outcome);

        if outcome != ClickOutcome::Ignored {
            self.broadcast_state();
        }
    }

    fn handle_reset(&mut self, _ctx: &mut ws::WebsocketContext<Self>) {
        self.app_state.game.lock().unwrap().reset();
        info!("Game reset by {}; new epoch started", self.id);
        self.broadcast_state();
    }

    /// Send the current snapshot to this connection only.
    fn send_state(&self, ctx: &mut ws::WebsocketContext<Self>) {
        let snapshot = self.app_state.game.lock().unwrap().snapshot();
        match serde_json::to_string(&ServerMessage::state(snapshot)) {
            Ok(msg_str) => ctx.text(msg_str),
            Err(e) => warn!("Error serializing state message: {}", e),
        }
    }

    fn send_error(&self, message: impl Into<String>, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(&ServerMessage::error(message)) {
            Ok(msg_str) => ctx.text(msg_str),
            Err(e) => warn!("Error serializing error message: {}", e),
        }
    }

    /// Push the current snapshot to every connected observer.
    pub fn broadcast_state(&self) {
        let snapshot = self.app_state.game.lock().unwrap().snapshot();
        let message_str = match serde_json::to_string(&ServerMessage::state(snapshot)) {
            Ok(s) => s,
            Err(e) => {
                warn!("Error serializing state message: {}", e);
                return;
            }
        };

        let sessions = self.app_state.sessions.lock().unwrap();
        info!("Broadcasting state to {} connections", sessions.len());
        for (conn_id, addr) in sessions.iter() {
            info!("Sending state to connection {}", conn_id);
            addr.do_send(GridWebSocketMessage(message_str.clone()));
        }
    }
}

/// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = Uuid::new_v4().to_string();
    info!("New WebSocket connection: {}", id);

    let ws = GridWebSocket {
        id,
        app_state: app_state.clone(),
    };

    ws::start(ws, &req, stream)
}
