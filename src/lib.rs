//! League bracket engine: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    build_tournament, compute_rankings, generate_player_stats, generate_seed_order,
    generate_tournament, load_league, matches_by_round, migrate_league, order_for_seeding,
    rank_players, record_bracket_result, record_match_result, round_name, top_players,
    GeneratedTournament, IdSource, SequentialIds, UuidIds,
};
pub use models::{
    Bracket, BracketMatch, League, LeagueError, Match, Player, PlayerRanking, PlayerStats, Score,
    Season, Seeding, Sport, Winner,
};
