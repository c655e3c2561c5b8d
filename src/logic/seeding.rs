//! Seed order for a power-of-two bracket, and ordering players into seeds.

use crate::models::{LeagueError, Player, PlayerRanking};
use rand::seq::SliceRandom;
use rand::Rng;

/// Seed number that occupies each bracket slot, left to right.
///
/// `order(2) = [1, 2]`; each larger order pairs every seed `s` of the half-size
/// order with `n + 1 - s`, so for 8 slots the first round is 1v8, 4v5, 2v7, 3v6
/// and seeds 1 and 2 can only meet in the final.
///
/// Sizes that are not a power of two, or below 2, are rejected.
pub fn generate_seed_order(bracket_size: usize) -> Result<Vec<usize>, LeagueError> {
    if bracket_size < 2 || !bracket_size.is_power_of_two() {
        return Err(LeagueError::InvalidBracketSize(bracket_size));
    }
    let mut order = vec![1, 2];
    let mut n = 2;
    while n < bracket_size {
        n *= 2;
        order = order.iter().flat_map(|&s| [s, n + 1 - s]).collect();
    }
    Ok(order)
}

/// Order bracket entrants best-first for seeding.
///
/// Players who have played at least one match are sorted by their rank.
/// Players without ranking data are shuffled with `rng` and placed after them.
pub fn order_for_seeding<R: Rng + ?Sized>(
    players: &[Player],
    rankings: &[PlayerRanking],
    rng: &mut R,
) -> Vec<Player> {
    let rank_of = |p: &Player| {
        rankings
            .iter()
            .find(|r| r.stats.player_id == p.id && r.stats.total_matches > 0)
            .map(|r| r.rank)
    };

    let mut ranked: Vec<(u32, Player)> = Vec::new();
    let mut unranked: Vec<Player> = Vec::new();
    for p in players {
        match rank_of(p) {
            Some(rank) => ranked.push((rank, p.clone())),
            None => unranked.push(p.clone()),
        }
    }
    ranked.sort_by_key(|(rank, _)| *rank);
    unranked.shuffle(rng);
    if !unranked.is_empty() {
        log::debug!("Seeding {} unranked player(s) randomly", unranked.len());
    }

    ranked.into_iter().map(|(_, p)| p).chain(unranked).collect()
}
