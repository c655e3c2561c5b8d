//! Player, PlayerStats and PlayerRanking data structures.

use serde::{Deserialize, Serialize};

/// Unique identifier for a player within a league.
pub type PlayerId = String;

/// Id of the placeholder used while a match participant is not yet known.
pub const TBD_ID: &str = "tbd";

/// Prefix of synthetic bye opponents.
pub const BYE_PREFIX: &str = "bye-";

/// A player registered in a league.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Placeholder for a slot whose player depends on an undecided match.
    pub fn tbd() -> Self {
        Self::new(TBD_ID, "TBD")
    }

    /// Synthetic bye opponent for the given bracket slot.
    pub fn bye(slot: usize) -> Self {
        Self::new(format!("{BYE_PREFIX}{slot}"), "BYE")
    }

    pub fn is_tbd(&self) -> bool {
        self.id == TBD_ID
    }

    pub fn is_bye(&self) -> bool {
        self.id.starts_with(BYE_PREFIX)
    }

    /// True for registered players (neither TBD nor BYE).
    pub fn is_real(&self) -> bool {
        !self.is_tbd() && !self.is_bye()
    }
}

/// Aggregated statistics for one player, recomputed from league state on demand.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub player_name: String,

    pub total_matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: f64,

    /// Points for simple scores; games (plus weighted tiebreak points) for tennis.
    pub total_points_scored: f64,
    pub total_points_conceded: f64,
    pub average_points_scored: f64,
    pub average_points_conceded: f64,
    pub point_differential: f64,

    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: f64,
    pub games_lost: f64,

    pub seasons_participated: u32,
    pub tournaments_participated: u32,

    /// Longest run of consecutive wins in dated matches.
    pub win_streak: u32,
    /// Positive for consecutive wins, negative for consecutive losses, counted from the most recent match.
    pub current_streak: i32,

    pub ranking_score: f64,
}

impl PlayerStats {
    /// Zeroed stats for a player.
    pub fn for_player(p: &Player) -> Self {
        Self {
            player_id: p.id.clone(),
            player_name: p.name.clone(),
            ..Self::default()
        }
    }
}

/// A player's position in the league ranking (rank 1 is best).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRanking {
    pub rank: u32,
    pub stats: PlayerStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_rank: Option<u32>,
    /// `previous_rank - rank`; positive means the player moved up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_change: Option<i32>,
}
