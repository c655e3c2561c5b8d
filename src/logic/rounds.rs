//! Round metadata for displaying a bracket.

use crate::models::{BracketMatch, Match, Player, Winner};
use std::collections::BTreeMap;

/// Tree nodes grouped by round; within a round, ordered by position.
pub fn matches_by_round(root: &BracketMatch) -> BTreeMap<u32, Vec<&BracketMatch>> {
    let mut rounds: BTreeMap<u32, Vec<&BracketMatch>> = BTreeMap::new();
    for node in root.nodes() {
        rounds.entry(node.round).or_default().push(node);
    }
    for nodes in rounds.values_mut() {
        nodes.sort_by_key(|n| n.position);
    }
    rounds
}

/// Number of rounds in the tree (the final's round).
pub fn total_rounds(root: &BracketMatch) -> u32 {
    root.round
}

/// Display name of a round, counted back from the final.
pub fn round_name(round: u32, total_rounds: u32) -> String {
    match (total_rounds + 1).saturating_sub(round) {
        1 => "Final".to_string(),
        2 => "Semifinals".to_string(),
        3 => "Quarterfinals".to_string(),
        4 => "Round of 16".to_string(),
        5 => "Round of 32".to_string(),
        _ => format!("Round {}", round),
    }
}

/// Name of a league player, or "Unknown Player".
pub fn player_name<'a>(player_id: &str, players: &'a [Player]) -> &'a str {
    players
        .iter()
        .find(|p| p.id == player_id)
        .map(|p| p.name.as_str())
        .unwrap_or("Unknown Player")
}

/// Human-readable result of a match, resolving the winner against league players.
pub fn winner_display(m: &Match, players: &[Player]) -> String {
    match m.winner {
        Winner::Undecided => "Not played".to_string(),
        Winner::Draw => "Draw".to_string(),
        Winner::Player(i) => match m.players.get(i) {
            Some(p) => player_name(&p.id, players).to_string(),
            None => "Unknown".to_string(),
        },
    }
}
