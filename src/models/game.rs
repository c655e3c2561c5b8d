//! Match, Winner, Score and Sport.

use crate::models::player::Player;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Unique identifier for a match.
pub type MatchId = String;

/// Outcome of a match.
///
/// On the wire this is the loose `winner` field: absent (or `null`) while
/// undecided, the string `"draw"`, or an index into the match's players.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Winner {
    #[default]
    Undecided,
    Draw,
    Player(usize),
}

impl Winner {
    pub fn is_undecided(&self) -> bool {
        matches!(self, Winner::Undecided)
    }

    /// Index of the winning player, if there is one.
    pub fn index(&self) -> Option<usize> {
        match *self {
            Winner::Player(i) => Some(i),
            Winner::Undecided | Winner::Draw => None,
        }
    }
}

impl Serialize for Winner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Winner::Undecided => serializer.serialize_none(),
            Winner::Draw => serializer.serialize_str("draw"),
            Winner::Player(i) => serializer.serialize_u64(i as u64),
        }
    }
}

struct WinnerVisitor;

impl<'de> Visitor<'de> for WinnerVisitor {
    type Value = Winner;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a player index, \"draw\" or null")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Winner, E> {
        usize::try_from(v)
            .map(Winner::Player)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Winner, E> {
        usize::try_from(v)
            .map(Winner::Player)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Winner, E> {
        if v == "draw" {
            Ok(Winner::Draw)
        } else {
            Err(E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    fn visit_none<E: de::Error>(self) -> Result<Winner, E> {
        Ok(Winner::Undecided)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Winner, E> {
        Ok(Winner::Undecided)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Winner, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Deserialize<'de> for Winner {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_option(WinnerVisitor)
    }
}

/// Which scoring scheme a league uses.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Tennis,
    #[default]
    #[serde(alias = "ping-pong")]
    Simple,
    Other,
}

/// Points per player, e.g. `21-15`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SimpleScore {
    pub points: [u32; 2],
}

/// One tennis set: games per player and an optional tiebreak.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TennisSet {
    pub games: [u32; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiebreak: Option<[u32; 2]>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TennisScore {
    pub sets: Vec<TennisSet>,
}

/// Score attached to a match. Stored documents tell the variants apart by key (`points` / `sets`).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Simple(SimpleScore),
    Tennis(TennisScore),
}

impl Score {
    pub fn simple(a: u32, b: u32) -> Self {
        Score::Simple(SimpleScore { points: [a, b] })
    }

    /// The sport whose scoring scheme this score follows.
    pub fn kind(&self) -> Sport {
        match self {
            Score::Simple(_) => Sport::Simple,
            Score::Tennis(_) => Sport::Tennis,
        }
    }
}

/// A single match between two players.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub players: Vec<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Score>,
    #[serde(default, skip_serializing_if = "Winner::is_undecided")]
    pub winner: Winner,
}

impl Match {
    /// An unplayed match between two players.
    pub fn new(id: impl Into<MatchId>, player_1: Player, player_2: Player) -> Self {
        Self {
            id: id.into(),
            players: vec![player_1, player_2],
            ..Self::default()
        }
    }

    /// The player who won, if the winner is a valid index.
    pub fn winning_player(&self) -> Option<&Player> {
        self.winner.index().and_then(|i| self.players.get(i))
    }

    /// Index of the player with the given id.
    pub fn player_index(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn involves(&self, player_id: &str) -> bool {
        self.player_index(player_id).is_some()
    }
}
