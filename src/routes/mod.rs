use actix_files as fs;
use actix_web::{web, HttpResponse, Responder};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;

use crate::leaderboard;
use crate::models::AppState;

const DEFAULT_TOP_LIMIT: usize = 10;

#[derive(Deserialize)]
pub struct TopQuery {
    limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    nickname: String,
    score: i64,
}

/// HTTP handler for the index page
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Grid game server is running.")
}

/// GET /leaderboard/top?limit=n
pub async fn leaderboard_top(
    query: web::Query<TopQuery>,
    app_state: web::Data<AppState>,
) -> impl Responder {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT);
    let top = app_state.leaderboard.lock().unwrap().top_n(limit);
    HttpResponse::Ok().json(json!({ "top": top }))
}

/// POST /leaderboard/submit. Validation runs before the gate is consumed so
/// a rejected payload never burns the one-shot submission.
pub async fn leaderboard_submit(
    body: web::Json<SubmitRequest>,
    app_state: web::Data<AppState>,
) -> impl Responder {
    let nickname = match leaderboard::validate(&body.nickname, body.score) {
        Ok(nickname) => nickname,
        Err(e) => {
            warn!("Rejected submission: {}", e);
            return HttpResponse::BadRequest().json(json!({ "error": e.to_string() }));
        }
    };

    // Only the first submission after gameOver is accepted.
    let accepted = app_state.game.lock().unwrap().consume_submission();
    if !accepted {
        return HttpResponse::Conflict()
            .json(json!({ "error": "Score already submitted for this finished game." }));
    }

    match app_state
        .leaderboard
        .lock()
        .unwrap()
        .submit(&nickname, body.score)
    {
        Ok(entry) => {
            info!("Recorded score {} for {}", entry.score, entry.nickname);
            HttpResponse::Created().json(entry)
        }
        // Unreachable after the validation above, but kept as a plain 400.
        Err(e) => HttpResponse::BadRequest().json(json!({ "error": e.to_string() })),
    }
}

/// Configure the HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").route(web::get().to(crate::websocket::ws_index)))
        .service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/leaderboard/top").route(web::get().to(leaderboard_top)))
        .service(web::resource("/leaderboard/submit").route(web::post().to(leaderboard_submit)))
        .service(fs::Files::new("/static", "./static"));
}
