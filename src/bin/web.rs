//! Single binary web server: league documents held in memory, keyed by slug, REST API over the engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use league_bracket::logic::{
    generate_season_schedule, load_league, player_name, total_rounds, winner_display,
    write_rankings_csv,
};
use league_bracket::{
    compute_rankings, generate_tournament, matches_by_round, record_bracket_result, round_name,
    top_players, Bracket, League, LeagueError, Player, Score, Season, Sport, UuidIds, Winner,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory store: one league document per slug. Last writer wins.
type AppState = Data<RwLock<HashMap<String, League>>>;

/// Bind address, read from the environment.
struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateLeagueBody {
    slug: String,
    name: String,
    #[serde(default)]
    sport: Sport,
}

#[derive(Deserialize)]
struct ReplaceLeagueBody {
    content: serde_json::Value,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    id: Option<String>,
    name: String,
}

#[derive(Deserialize)]
struct CreateBracketBody {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BracketPlayerBody {
    player_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordResultBody {
    match_id: String,
    #[serde(default)]
    winner: Winner,
    score: Option<Score>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSeasonBody {
    name: String,
    #[serde(default)]
    players: Vec<String>,
    start_date: String,
    end_date: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleBody {
    num_matches: usize,
}

#[derive(Deserialize)]
struct RankingsQuery {
    top: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoundView {
    round: u32,
    name: String,
    matches: Vec<MatchView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchView {
    match_id: String,
    position: u32,
    players: Vec<String>,
    winner: Winner,
    result: String,
}

#[derive(Deserialize)]
struct LeaguePath {
    slug: String,
}

#[derive(Deserialize)]
struct LeaguePlayerPath {
    slug: String,
    player_id: String,
}

#[derive(Deserialize)]
struct BracketPath {
    slug: String,
    bracket_id: String,
}

#[derive(Deserialize)]
struct BracketPlayerPath {
    slug: String,
    bracket_id: String,
    player_id: String,
}

#[derive(Deserialize)]
struct SeasonPath {
    slug: String,
    season_id: String,
}

fn error_response(e: &LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LeagueError::PlayerNotFound(_)
        | LeagueError::BracketNotFound(_)
        | LeagueError::SeasonNotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn no_league() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "League not found" }))
}

/// Apply `action` to the league under the write lock and answer with the updated document.
///
/// The action marks the league modified itself; a no-op leaves `updatedAt` alone.
fn update_league<F>(state: &AppState, slug: &str, action: F) -> HttpResponse
where
    F: FnOnce(&mut League) -> Result<(), LeagueError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let league = match g.get_mut(slug) {
        Some(l) => l,
        None => return no_league(),
    };
    match action(league) {
        Ok(()) => HttpResponse::Ok().json(&*league),
        Err(e) => error_response(&e),
    }
}

/// Run `view` against a league under the read lock.
fn read_league<F>(state: &AppState, slug: &str, view: F) -> HttpResponse
where
    F: FnOnce(&League) -> HttpResponse,
{
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get(slug) {
        Some(league) => view(league),
        None => no_league(),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "league-bracket",
    })
}

/// Create a league (409 if the slug is taken).
#[post("/api/leagues")]
async fn api_create_league(state: AppState, body: Json<CreateLeagueBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    if g.contains_key(&body.slug) {
        return HttpResponse::Conflict().json(serde_json::json!({ "error": "League already exists" }));
    }
    let league = League::new(body.slug.clone(), body.name.clone(), body.sport);
    log::info!("Created league {}", league.slug);
    let resp = HttpResponse::Ok().json(&league);
    g.insert(league.slug.clone(), league);
    resp
}

#[get("/api/leagues/{slug}")]
async fn api_get_league(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    read_league(&state, &path.slug, |league| HttpResponse::Ok().json(league))
}

/// Replace a league document; older schema versions are migrated, then validated.
#[put("/api/leagues/{slug}")]
async fn api_replace_league(state: AppState, path: Path<LeaguePath>, body: Json<ReplaceLeagueBody>) -> HttpResponse {
    let league = match load_league(body.into_inner().content) {
        Ok(l) => l,
        Err(e) => return error_response(&e),
    };
    if league.slug != path.slug {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Slug mismatch" }));
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.slug) {
        Some(existing) => {
            *existing = league;
            HttpResponse::Ok().json(&*existing)
        }
        None => no_league(),
    }
}

#[delete("/api/leagues/{slug}")]
async fn api_delete_league(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.remove(&path.slug) {
        Some(league) => HttpResponse::Ok().json(league),
        None => no_league(),
    }
}

/// Register a player; the id defaults to a fresh UUID.
#[post("/api/leagues/{slug}/players")]
async fn api_add_player(state: AppState, path: Path<LeaguePath>, body: Json<AddPlayerBody>) -> HttpResponse {
    let body = body.into_inner();
    let id = body.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    update_league(&state, &path.slug, |league| {
        league.add_player(Player::new(id, body.name.trim()))
    })
}

/// Remove a player from the league and everything that references it.
#[delete("/api/leagues/{slug}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<LeaguePlayerPath>) -> HttpResponse {
    update_league(&state, &path.slug, |league| league.remove_player(&path.player_id))
}

#[post("/api/leagues/{slug}/brackets")]
async fn api_create_bracket(state: AppState, path: Path<LeaguePath>, body: Json<CreateBracketBody>) -> HttpResponse {
    let bracket = Bracket::new(Uuid::new_v4().to_string(), body.name.trim());
    update_league(&state, &path.slug, |league| league.add_bracket(bracket))
}

#[post("/api/leagues/{slug}/brackets/{bracket_id}/players")]
async fn api_add_bracket_player(
    state: AppState,
    path: Path<BracketPath>,
    body: Json<BracketPlayerBody>,
) -> HttpResponse {
    update_league(&state, &path.slug, |league| {
        league.add_bracket_player(&path.bracket_id, &body.player_id)
    })
}

#[delete("/api/leagues/{slug}/brackets/{bracket_id}/players/{player_id}")]
async fn api_remove_bracket_player(state: AppState, path: Path<BracketPlayerPath>) -> HttpResponse {
    update_league(&state, &path.slug, |league| {
        league.remove_bracket_player(&path.bracket_id, &path.player_id)
    })
}

/// Generate (or replace) the bracket's tree, seeded by current rankings.
#[post("/api/leagues/{slug}/brackets/{bracket_id}/generate")]
async fn api_generate_tournament(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    update_league(&state, &path.slug, |league| {
        generate_tournament(league, &path.bracket_id, &mut rand::thread_rng(), &mut UuidIds)
    })
}

/// Record a match result; unknown match ids are ignored.
#[put("/api/leagues/{slug}/brackets/{bracket_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<BracketPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    update_league(&state, &path.slug, |league| {
        record_bracket_result(
            league,
            &path.bracket_id,
            &body.match_id,
            body.winner,
            body.score.as_ref(),
        )
        .map(|_| ())
    })
}

/// Bracket laid out round by round, with round names and readable results.
#[get("/api/leagues/{slug}/brackets/{bracket_id}/rounds")]
async fn api_bracket_rounds(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    read_league(&state, &path.slug, |league| {
        let bracket = match league.bracket(&path.bracket_id) {
            Some(b) => b,
            None => return error_response(&LeagueError::BracketNotFound(path.bracket_id.clone())),
        };
        let Some(root) = &bracket.final_match else {
            return HttpResponse::Ok().json(Vec::<RoundView>::new());
        };
        let total = total_rounds(root);
        let rounds: Vec<RoundView> = matches_by_round(root)
            .into_iter()
            .map(|(round, nodes)| RoundView {
                round,
                name: round_name(round, total),
                matches: nodes
                    .into_iter()
                    .map(|n| MatchView {
                        match_id: n.game.id.clone(),
                        position: n.position,
                        players: n
                            .game
                            .players
                            .iter()
                            .map(|p| {
                                if p.is_real() {
                                    player_name(&p.id, &league.players).to_string()
                                } else {
                                    p.name.clone()
                                }
                            })
                            .collect(),
                        winner: n.game.winner,
                        result: winner_display(&n.game, &league.players),
                    })
                    .collect(),
            })
            .collect();
        HttpResponse::Ok().json(rounds)
    })
}

#[get("/api/leagues/{slug}/rankings")]
async fn api_rankings(state: AppState, path: Path<LeaguePath>, query: Query<RankingsQuery>) -> HttpResponse {
    read_league(&state, &path.slug, |league| match query.top {
        Some(n) => HttpResponse::Ok().json(top_players(league, n)),
        None => HttpResponse::Ok().json(compute_rankings(league)),
    })
}

#[get("/api/leagues/{slug}/rankings.csv")]
async fn api_rankings_csv(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    read_league(&state, &path.slug, |league| {
        let mut out = Vec::new();
        match write_rankings_csv(&compute_rankings(league), &mut out) {
            Ok(()) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(out),
            Err(e) => {
                log::error!("CSV export failed for {}: {}", league.slug, e);
                HttpResponse::InternalServerError().body("csv error")
            }
        }
    })
}

#[post("/api/leagues/{slug}/seasons")]
async fn api_create_season(state: AppState, path: Path<LeaguePath>, body: Json<CreateSeasonBody>) -> HttpResponse {
    let body = body.into_inner();
    let season = Season {
        id: Uuid::new_v4().to_string(),
        name: body.name,
        players: body.players,
        start_date: body.start_date,
        end_date: body.end_date,
        matches: Vec::new(),
        sport: None,
    };
    update_league(&state, &path.slug, |league| league.add_season(season))
}

/// Append randomly paired matches to a season.
#[post("/api/leagues/{slug}/seasons/{season_id}/schedule")]
async fn api_generate_schedule(state: AppState, path: Path<SeasonPath>, body: Json<ScheduleBody>) -> HttpResponse {
    update_league(&state, &path.slug, |league| {
        generate_season_schedule(
            league,
            &path.season_id,
            body.num_matches,
            &mut rand::thread_rng(),
            &mut UuidIds,
        )
        .map(|_| ())
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state: AppState = Data::new(RwLock::new(HashMap::new()));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_league)
            .service(api_get_league)
            .service(api_replace_league)
            .service(api_delete_league)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_create_bracket)
            .service(api_add_bracket_player)
            .service(api_remove_bracket_player)
            .service(api_generate_tournament)
            .service(api_record_result)
            .service(api_bracket_rounds)
            .service(api_rankings_csv)
            .service(api_rankings)
            .service(api_create_season)
            .service(api_generate_schedule)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
