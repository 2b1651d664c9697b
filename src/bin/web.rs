//! Single binary web server hosting bracket editor sessions as a JSON API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT,
//! BRACKET_IDLE_HOURS (inactive brackets are dropped after this many hours).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use knockout_bracket_web::{
    advance_all_winners, assign_player, clear_match, delete_match, draw_lucky_players,
    final_rankings, generate_bracket, reset_bracket, set_manual_winner, set_score, set_score_rule,
    unlock_match, Bracket, BracketError, BracketMatch, GenerationMode, Participant,
    QualifiedPlayer, ScoreRule, Slot,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

type BracketId = Uuid;

/// Snapshot handed to persistence by an explicit save.
#[derive(Clone, Serialize)]
struct SavedBracket {
    matches: Vec<BracketMatch>,
    saved_at: DateTime<Utc>,
}

/// Per-bracket entry: working bracket, last save, and last activity time (for auto-cleanup).
struct BracketEntry {
    bracket: Bracket,
    saved: Option<SavedBracket>,
    last_activity: Instant,
}

impl BracketEntry {
    fn new(bracket: Bracket) -> Self {
        Self {
            bracket,
            saved: None,
            last_activity: Instant::now(),
        }
    }
}

type AppState = Data<RwLock<HashMap<BracketId, BracketEntry>>>;

struct ServerConfig {
    host: String,
    port: u16,
    idle_timeout: Duration,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        let idle_hours: u64 = std::env::var("BRACKET_IDLE_HOURS")
            .ok()
            .and_then(|h| h.parse().ok())
            .unwrap_or_else(default_idle_hours);
        Self {
            host,
            port,
            idle_timeout: idle_timeout(idle_hours),
        }
    }
}

fn idle_timeout(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(3600))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_idle_hours() -> u64 {
    12
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct BracketView<'a> {
    id: BracketId,
    #[serde(flatten)]
    bracket: &'a Bracket,
}

#[derive(Deserialize)]
struct CreateBracketBody {
    players: Vec<QualifiedPlayer>,
    #[serde(default)]
    mode: GenerationMode,
}

#[derive(Deserialize)]
struct ResumeBracketBody {
    matches: Vec<BracketMatch>,
}

#[derive(Deserialize)]
struct ScoreRuleBody {
    score_rule: ScoreRule,
}

#[derive(Deserialize)]
struct AssignPlayerBody {
    slot: Slot,
    participant: Option<Participant>,
}

#[derive(Deserialize)]
struct SetScoreBody {
    slot: Slot,
    value: String,
}

#[derive(Deserialize)]
struct SetWinnerBody {
    player_id: String,
}

#[derive(Deserialize)]
struct LuckyDrawBody {
    pool: Vec<QualifiedPlayer>,
}

/// Path segment: bracket id (e.g. /api/brackets/{id})
#[derive(Deserialize)]
struct BracketPath {
    id: BracketId,
}

/// Path segments: bracket id and match id (e.g. /api/brackets/{id}/matches/{match_id})
#[derive(Deserialize)]
struct BracketMatchPath {
    id: BracketId,
    match_id: String,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No bracket" }))
}

fn rejected(e: BracketError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Store a new bracket and return it with its id.
fn insert_bracket(state: &AppState, bracket: Bracket) -> HttpResponse {
    let id = Uuid::new_v4();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let view = HttpResponse::Ok().json(BracketView { id, bracket: &bracket });
    g.insert(id, BracketEntry::new(bracket));
    log::info!("Created bracket {}", id);
    view
}

/// Run one editor operation against a stored bracket. The stored value is only replaced
/// when the operation succeeds.
fn update_bracket<F>(state: &AppState, id: BracketId, op: F) -> HttpResponse
where
    F: FnOnce(&Bracket) -> Result<Bracket, BracketError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match op(&entry.bracket) {
        Ok(next) => {
            entry.bracket = next;
            HttpResponse::Ok().json(BracketView {
                id,
                bracket: &entry.bracket,
            })
        }
        Err(e) => {
            log::info!("Bracket {}: rejected: {}", id, e);
            rejected(e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "knockout-bracket-web",
    })
}

/// Generate a bracket from qualified players (seeded with byes, or an empty skeleton).
#[post("/api/brackets")]
async fn api_create_bracket(state: AppState, body: Json<CreateBracketBody>) -> HttpResponse {
    match generate_bracket(&body.players, body.mode) {
        Ok(bracket) => insert_bracket(&state, bracket),
        Err(e) => rejected(e),
    }
}

/// Resume editing previously saved matches.
#[post("/api/brackets/resume")]
async fn api_resume_bracket(state: AppState, body: Json<ResumeBracketBody>) -> HttpResponse {
    let body = body.into_inner();
    insert_bracket(&state, Bracket::resume(body.matches))
}

/// Get a bracket by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/brackets/{id}")]
async fn api_get_bracket(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    update_bracket(&state, path.id, |b| Ok(b.clone()))
}

#[put("/api/brackets/{id}/score-rule")]
async fn api_set_score_rule(
    state: AppState,
    path: Path<BracketPath>,
    body: Json<ScoreRuleBody>,
) -> HttpResponse {
    update_bracket(&state, path.id, |b| Ok(set_score_rule(b, body.score_rule)))
}

/// Put a player, bye, lucky-draw placeholder, or nothing into a slot.
#[put("/api/brackets/{id}/matches/{match_id}/player")]
async fn api_assign_player(
    state: AppState,
    path: Path<BracketMatchPath>,
    body: Json<AssignPlayerBody>,
) -> HttpResponse {
    let body = body.into_inner();
    update_bracket(&state, path.id, |b| {
        assign_player(b, &path.match_id, body.slot, body.participant)
    })
}

#[put("/api/brackets/{id}/matches/{match_id}/score")]
async fn api_set_score(
    state: AppState,
    path: Path<BracketMatchPath>,
    body: Json<SetScoreBody>,
) -> HttpResponse {
    update_bracket(&state, path.id, |b| {
        set_score(b, &path.match_id, body.slot, &body.value)
    })
}

#[put("/api/brackets/{id}/matches/{match_id}/winner")]
async fn api_set_winner(
    state: AppState,
    path: Path<BracketMatchPath>,
    body: Json<SetWinnerBody>,
) -> HttpResponse {
    update_bracket(&state, path.id, |b| {
        set_manual_winner(b, &path.match_id, &body.player_id)
    })
}

/// Empty a match (rejected while it has a winner).
#[post("/api/brackets/{id}/matches/{match_id}/clear")]
async fn api_clear_match(state: AppState, path: Path<BracketMatchPath>) -> HttpResponse {
    update_bracket(&state, path.id, |b| clear_match(b, &path.match_id))
}

/// Drop a match's result but keep its players.
#[post("/api/brackets/{id}/matches/{match_id}/unlock")]
async fn api_unlock_match(state: AppState, path: Path<BracketMatchPath>) -> HttpResponse {
    update_bracket(&state, path.id, |b| unlock_match(b, &path.match_id))
}

#[delete("/api/brackets/{id}/matches/{match_id}")]
async fn api_delete_match(state: AppState, path: Path<BracketMatchPath>) -> HttpResponse {
    update_bracket(&state, path.id, |b| delete_match(b, &path.match_id))
}

/// Advance every decided winner into an empty next-round slot.
#[post("/api/brackets/{id}/advance")]
async fn api_advance_all(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let (next, outcome) = advance_all_winners(&entry.bracket);
    entry.bracket = next;
    let view = BracketView {
        id: path.id,
        bracket: &entry.bracket,
    };
    HttpResponse::Ok().json(serde_json::json!({ "result": outcome, "bracket": view }))
}

/// Fill lucky-draw slots from the given pool of qualified players.
#[post("/api/brackets/{id}/lucky-draw")]
async fn api_lucky_draw(
    state: AppState,
    path: Path<BracketPath>,
    body: Json<LuckyDrawBody>,
) -> HttpResponse {
    update_bracket(&state, path.id, |b| {
        draw_lucky_players(b, &body.pool, &mut rand::thread_rng())
    })
}

/// Empty every match.
#[post("/api/brackets/{id}/reset")]
async fn api_reset_bracket(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    update_bracket(&state, path.id, |b| Ok(reset_bracket(b)))
}

#[get("/api/brackets/{id}/rankings")]
async fn api_rankings(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(entry) => HttpResponse::Ok().json(final_rankings(&entry.bracket)),
        None => not_found(),
    }
}

/// Save: snapshot the current matches.
#[post("/api/brackets/{id}/save")]
async fn api_save_bracket(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let saved = SavedBracket {
        matches: entry.bracket.matches.clone(),
        saved_at: Utc::now(),
    };
    log::info!("Saved bracket {} ({} matches)", path.id, saved.matches.len());
    entry.saved = Some(saved.clone());
    HttpResponse::Ok().json(saved)
}

/// Last saved snapshot (404 if never saved).
#[get("/api/brackets/{id}/saved")]
async fn api_get_saved(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id).and_then(|entry| entry.saved.as_ref()) {
        Some(saved) => HttpResponse::Ok().json(saved),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "Not saved yet" })),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<BracketId, BracketEntry>::new()));

    // Background task: every 30 minutes, remove brackets inactive for longer than the idle timeout
    let state_cleanup = state.clone();
    let idle_timeout = config.idle_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < idle_timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive bracket(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_resume_bracket)
            .service(api_create_bracket)
            .service(api_get_bracket)
            .service(api_set_score_rule)
            .service(api_assign_player)
            .service(api_set_score)
            .service(api_set_winner)
            .service(api_clear_match)
            .service(api_unlock_match)
            .service(api_delete_match)
            .service(api_advance_all)
            .service(api_lucky_draw)
            .service(api_reset_bracket)
            .service(api_rankings)
            .service(api_save_bracket)
            .service(api_get_saved)
    })
    .bind(bind)?
    .run()
    .await
}
