//! League business logic: rankings, seeding, bracket building and advancement, schedules, migration.

mod advancement;
mod builder;
mod export;
mod migration;
mod rounds;
mod schedule;
mod seeding;
mod stats;
mod tournament;

pub use advancement::{auto_winner, effective_player, record_match_result};
pub use builder::{build_tournament, GeneratedTournament, IdSource, SequentialIds, UuidIds};
pub use export::write_rankings_csv;
pub use migration::{league_version, load_league, migrate_league, needs_migration, Migration};
pub use rounds::{matches_by_round, player_name, round_name, total_rounds, winner_display};
pub use schedule::{generate_season_schedule, schedule_pairings};
pub use seeding::{generate_seed_order, order_for_seeding};
pub use stats::{
    all_matches, compute_rankings, generate_player_stats, parse_match_date, player_ranking,
    rank_players, ranking_score, top_players,
};
pub use tournament::{generate_tournament, record_bracket_result};
