//! Bracket operations on a league document: (re)generate a tournament, record results.

use crate::logic::advancement::record_match_result;
use crate::logic::builder::{build_tournament, IdSource};
use crate::logic::seeding::order_for_seeding;
use crate::logic::stats::compute_rankings;
use crate::models::{check_winner_index, League, LeagueError, Score, Winner};
use rand::Rng;

/// Generate (or regenerate) the tree of a bracket from its entered players.
///
/// Players are seeded by league ranking, unranked ones in random order drawn
/// from `rng`. Any existing tree and seedings are replaced.
pub fn generate_tournament<R: Rng + ?Sized, I: IdSource + ?Sized>(
    league: &mut League,
    bracket_id: &str,
    rng: &mut R,
    ids: &mut I,
) -> Result<(), LeagueError> {
    let entrants = league.bracket_players(bracket_id)?;
    if entrants.len() < 2 {
        return Err(LeagueError::InsufficientPlayers {
            count: entrants.len(),
        });
    }
    let rankings = compute_rankings(league);
    let seeded = order_for_seeding(&entrants, &rankings, rng);
    let generated = build_tournament(&seeded, ids)?;

    let bracket = league.bracket_mut(bracket_id)?;
    if bracket.final_match.is_some() {
        log::info!("Replacing existing tree of bracket {}", bracket_id);
    }
    bracket.final_match = Some(generated.final_match);
    bracket.seedings = generated.seedings;
    league.touch();
    Ok(())
}

/// Record a result in a bracket's tree.
///
/// The winner index is checked against the target match first. A match id
/// that is not in the tree (e.g. stale after regeneration) changes nothing and
/// returns `Ok(false)`.
pub fn record_bracket_result(
    league: &mut League,
    bracket_id: &str,
    match_id: &str,
    winner: Winner,
    score: Option<&Score>,
) -> Result<bool, LeagueError> {
    let bracket = league.bracket_mut(bracket_id)?;
    let Some(root) = bracket.final_match.as_ref() else {
        return Ok(false);
    };
    let Some(target) = root.find(match_id) else {
        log::debug!("Ignoring result for unknown match {} in bracket {}", match_id, bracket_id);
        return Ok(false);
    };
    check_winner_index(&target.game, winner)?;

    let updated = record_match_result(root, match_id, winner, score);
    bracket.final_match = Some(updated);
    league.touch();
    Ok(true)
}
