//! Recording results in a bracket tree and propagating winners toward the final.

use crate::models::{BracketMatch, Match, Player, Score, Winner};
use std::sync::Arc;

/// Player a finished child match sends up, or TBD while it is undecided or drawn.
pub fn effective_player(node: &BracketMatch) -> Player {
    node.game.winning_player().cloned().unwrap_or_else(Player::tbd)
}

/// Result forced by byes: a bye loses to anyone, and of two byes slot 0 goes through.
pub fn auto_winner(p0: &Player, p1: &Player) -> Winner {
    match (p0.is_bye(), p1.is_bye()) {
        (true, true) | (false, true) => Winner::Player(0),
        (true, false) => Winner::Player(1),
        (false, false) => Winner::Undecided,
    }
}

/// Refill a parent match from its two children.
///
/// Any result previously entered for the parent is discarded unless a bye decides it.
pub(crate) fn fill_from_children(game: &mut Match, left: &BracketMatch, right: &BracketMatch) {
    let players = [effective_player(left), effective_player(right)];
    game.winner = auto_winner(&players[0], &players[1]);
    game.players = players.to_vec();
}

/// Set the result of one match and recompute every match above it.
///
/// Returns a new root; the input tree is untouched and every subtree off the
/// path from the changed match to the root is shared with it. An unknown
/// `match_id` returns an equal tree. `score` replaces the stored score only
/// when given. The winner index must already be validated against the match.
pub fn record_match_result(
    root: &BracketMatch,
    match_id: &str,
    winner: Winner,
    score: Option<&Score>,
) -> BracketMatch {
    match update_node(root, match_id, winner, score) {
        Some(updated) => updated,
        None => {
            log::debug!("Match {} not in bracket {}, nothing to update", match_id, root.id);
            root.clone()
        }
    }
}

/// `None` when the match is not in this subtree.
fn update_node(
    node: &BracketMatch,
    match_id: &str,
    winner: Winner,
    score: Option<&Score>,
) -> Option<BracketMatch> {
    if node.game.id == match_id {
        let mut updated = node.clone();
        updated.game.winner = winner;
        if let Some(score) = score {
            updated.game.scores = Some(score.clone());
        }
        return Some(updated);
    }

    let [left, right] = node.children.as_ref()?;
    let new_left = update_node(left, match_id, winner, score);
    let new_right = update_node(right, match_id, winner, score);
    if new_left.is_none() && new_right.is_none() {
        return None;
    }
    let left = new_left.map(Arc::new).unwrap_or_else(|| Arc::clone(left));
    let right = new_right.map(Arc::new).unwrap_or_else(|| Arc::clone(right));

    let mut game = node.game.clone();
    fill_from_children(&mut game, &left, &right);
    if !game.winner.is_undecided() {
        log::debug!("Match {} decided by bye after update", game.id);
    }
    Some(BracketMatch {
        id: node.id.clone(),
        game,
        children: Some([left, right]),
        round: node.round,
        position: node.position,
    })
}
