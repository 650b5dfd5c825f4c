use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Mutex;

mod game;
mod leaderboard;
mod models;
mod routes;
mod websocket;

use game::{GameConfig, GameSession};
use leaderboard::Leaderboard;
use models::AppState;

const LEADERBOARD_FILE: &str = "data/leaderboard.json";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    // Create shared application state: one game epoch, the leaderboard
    // loaded from disk, and the observer registry.
    let app_state = web::Data::new(AppState {
        game: Mutex::new(GameSession::new(
            GameConfig::default(),
            StdRng::from_entropy(),
        )),
        leaderboard: Mutex::new(Leaderboard::load(LEADERBOARD_FILE)),
        sessions: Mutex::new(HashMap::new()),
    });

    info!("Starting grid game server at http://127.0.0.1:{}", port);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .configure(routes::configure_routes)
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
