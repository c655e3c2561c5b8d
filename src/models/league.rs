//! League (root document), Season and LeagueError.

use crate::models::bracket::{Bracket, BracketId, BracketMatch};
use crate::models::game::{Match, Sport, Winner};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema version written into every league document.
pub const CURRENT_LEAGUE_VERSION: u32 = 0;

/// Errors that can occur during league and bracket operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeagueError {
    /// A bracket or schedule needs at least 2 players.
    InsufficientPlayers { count: usize },
    /// Seed order requested for a size that is not a power of two (or is below 2).
    InvalidBracketSize(usize),
    /// Winner index outside the match's players.
    InvalidWinnerIndex {
        match_id: String,
        index: usize,
        players: usize,
    },
    PlayerNotFound(PlayerId),
    /// A player with this id is already registered (or already entered in the bracket).
    DuplicatePlayer(PlayerId),
    BracketNotFound(BracketId),
    SeasonNotFound(String),
    /// Stored document has a schema version this build cannot migrate.
    UnsupportedVersion(i64),
    /// Stored document does not match the league schema.
    InvalidDocument(String),
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::InsufficientPlayers { count } => {
                write!(f, "Need at least 2 players (got {})", count)
            }
            LeagueError::InvalidBracketSize(size) => {
                write!(f, "Bracket size must be a power of two of at least 2 (got {})", size)
            }
            LeagueError::InvalidWinnerIndex {
                match_id,
                index,
                players,
            } => write!(
                f,
                "Winner index {} is out of range for match {} with {} players",
                index, match_id, players
            ),
            LeagueError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            LeagueError::DuplicatePlayer(id) => write!(f, "Player {} already exists", id),
            LeagueError::BracketNotFound(id) => write!(f, "Bracket {} not found", id),
            LeagueError::SeasonNotFound(id) => write!(f, "Season {} not found", id),
            LeagueError::UnsupportedVersion(v) => {
                write!(f, "Cannot migrate league from version {} to {}", v, CURRENT_LEAGUE_VERSION)
            }
            LeagueError::InvalidDocument(msg) => write!(f, "Invalid league data: {}", msg),
        }
    }
}

impl std::error::Error for LeagueError {}

/// Round-robin container of matches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub players: Vec<PlayerId>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<Sport>,
}

/// The root document; the store keeps exactly one per slug.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub brackets: Vec<Bracket>,
    #[serde(default)]
    pub sport: Sport,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u32,
}

impl League {
    /// Create an empty league at the current schema version.
    pub fn new(slug: impl Into<String>, name: impl Into<String>, sport: Sport) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            name: name.into(),
            players: Vec::new(),
            seasons: Vec::new(),
            brackets: Vec::new(),
            sport,
            created_at: now,
            updated_at: now,
            version: CURRENT_LEAGUE_VERSION,
        }
    }

    /// Mark the document as modified. Every successful edit calls this.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn bracket(&self, id: &str) -> Option<&Bracket> {
        self.brackets.iter().find(|b| b.id == id)
    }

    pub fn bracket_mut(&mut self, id: &str) -> Result<&mut Bracket, LeagueError> {
        self.brackets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| LeagueError::BracketNotFound(id.to_string()))
    }

    pub fn season_mut(&mut self, id: &str) -> Result<&mut Season, LeagueError> {
        self.seasons
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| LeagueError::SeasonNotFound(id.to_string()))
    }

    /// Register a player. Ids must be unique and must not use the reserved TBD/BYE ids.
    pub fn add_player(&mut self, player: Player) -> Result<(), LeagueError> {
        if !player.is_real() || player.name.trim().is_empty() {
            return Err(LeagueError::InvalidDocument(format!(
                "player id {:?} is reserved or name is empty",
                player.id
            )));
        }
        if self.player(&player.id).is_some() {
            return Err(LeagueError::DuplicatePlayer(player.id));
        }
        self.players.push(player);
        self.touch();
        Ok(())
    }

    /// Remove a player and every reference to it.
    ///
    /// Season matches involving the player are dropped. A bracket whose tree
    /// contains the player loses its tree and seedings and must be regenerated.
    pub fn remove_player(&mut self, player_id: &str) -> Result<(), LeagueError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| LeagueError::PlayerNotFound(player_id.to_string()))?;
        self.players.remove(idx);

        for season in &mut self.seasons {
            season.players.retain(|id| id != player_id);
            season.matches.retain(|m| !m.involves(player_id));
        }
        for bracket in &mut self.brackets {
            bracket.players.retain(|id| id != player_id);
            bracket.seedings.retain(|s| s.player_id != player_id);
            let in_tree = bracket
                .final_match
                .as_ref()
                .is_some_and(|root| root.leaves().iter().any(|n| n.game.involves(player_id)));
            if in_tree {
                log::info!(
                    "Discarding tree of bracket {} after removing player {}",
                    bracket.id,
                    player_id
                );
                bracket.final_match = None;
                bracket.seedings.clear();
            }
        }
        self.touch();
        Ok(())
    }

    /// Add a new, empty bracket.
    pub fn add_bracket(&mut self, bracket: Bracket) -> Result<(), LeagueError> {
        if self.bracket(&bracket.id).is_some() {
            return Err(LeagueError::InvalidDocument(format!(
                "bracket {} already exists",
                bracket.id
            )));
        }
        self.brackets.push(bracket);
        self.touch();
        Ok(())
    }

    /// Add a season. Its players must be registered in the league.
    pub fn add_season(&mut self, season: Season) -> Result<(), LeagueError> {
        if self.seasons.iter().any(|s| s.id == season.id) {
            return Err(LeagueError::InvalidDocument(format!(
                "season {} already exists",
                season.id
            )));
        }
        if let Some(missing) = season.players.iter().find(|id| self.player(id).is_none()) {
            return Err(LeagueError::PlayerNotFound(missing.clone()));
        }
        self.seasons.push(season);
        self.touch();
        Ok(())
    }

    pub fn rename_bracket(&mut self, bracket_id: &str, name: impl Into<String>) -> Result<(), LeagueError> {
        self.bracket_mut(bracket_id)?.name = name.into();
        self.touch();
        Ok(())
    }

    /// Enter a registered player in a bracket.
    pub fn add_bracket_player(&mut self, bracket_id: &str, player_id: &str) -> Result<(), LeagueError> {
        if self.player(player_id).is_none() {
            return Err(LeagueError::PlayerNotFound(player_id.to_string()));
        }
        let bracket = self.bracket_mut(bracket_id)?;
        if bracket.players.iter().any(|id| id == player_id) {
            return Err(LeagueError::DuplicatePlayer(player_id.to_string()));
        }
        bracket.players.push(player_id.to_string());
        self.touch();
        Ok(())
    }

    pub fn remove_bracket_player(&mut self, bracket_id: &str, player_id: &str) -> Result<(), LeagueError> {
        let bracket = self.bracket_mut(bracket_id)?;
        let before = bracket.players.len();
        bracket.players.retain(|id| id != player_id);
        if bracket.players.len() == before {
            return Err(LeagueError::PlayerNotFound(player_id.to_string()));
        }
        self.touch();
        Ok(())
    }

    /// Registered players entered in a bracket, in league order.
    pub fn bracket_players(&self, bracket_id: &str) -> Result<Vec<Player>, LeagueError> {
        let bracket = self
            .bracket(bracket_id)
            .ok_or_else(|| LeagueError::BracketNotFound(bracket_id.to_string()))?;
        Ok(self
            .players
            .iter()
            .filter(|p| bracket.players.contains(&p.id))
            .cloned()
            .collect())
    }

    /// Check invariants the engine relies on: unique player ids and winner indices in range.
    pub fn validate(&self) -> Result<(), LeagueError> {
        for (i, p) in self.players.iter().enumerate() {
            if self.players[..i].iter().any(|q| q.id == p.id) {
                return Err(LeagueError::DuplicatePlayer(p.id.clone()));
            }
        }
        for season in &self.seasons {
            for m in &season.matches {
                check_winner(m)?;
            }
        }
        for bracket in &self.brackets {
            if let Some(root) = &bracket.final_match {
                validate_tree(root)?;
            }
        }
        Ok(())
    }
}

fn validate_tree(node: &BracketMatch) -> Result<(), LeagueError> {
    check_winner(&node.game)?;
    if let Some([left, right]) = &node.children {
        validate_tree(left)?;
        validate_tree(right)?;
    }
    Ok(())
}

/// Reject a winner index that does not point at one of the match's players.
pub fn check_winner(m: &Match) -> Result<(), LeagueError> {
    check_winner_index(m, m.winner)
}

/// Validate a proposed winner for a match before it reaches the engine.
pub fn check_winner_index(m: &Match, winner: Winner) -> Result<(), LeagueError> {
    match winner {
        Winner::Player(index) if index >= m.players.len() => Err(LeagueError::InvalidWinnerIndex {
            match_id: m.id.clone(),
            index,
            players: m.players.len(),
        }),
        _ => Ok(()),
    }
}
