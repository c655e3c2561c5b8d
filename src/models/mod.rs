//! Data structures for a league: players, matches, brackets, seasons.

mod bracket;
mod game;
mod league;
mod player;

pub use bracket::{Bracket, BracketId, BracketMatch, Seeding};
pub use game::{Match, MatchId, Score, SimpleScore, Sport, TennisScore, TennisSet, Winner};
pub use league::{
    check_winner, check_winner_index, League, LeagueError, Season, CURRENT_LEAGUE_VERSION,
};
pub use player::{Player, PlayerId, PlayerRanking, PlayerStats, BYE_PREFIX, TBD_ID};
