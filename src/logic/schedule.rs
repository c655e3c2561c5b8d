//! Season schedule: simple pairings between season players.

use crate::logic::builder::IdSource;
use crate::models::{League, LeagueError, Match, Player};
use rand::seq::SliceRandom;
use rand::Rng;

/// Create `num_matches` unplayed matches between the given players.
///
/// With at most as many matches as distinct pairings, a random subset of
/// pairings is used. Otherwise every pairing is repeated evenly and the
/// remainder is drawn at random. The result is shuffled.
pub fn schedule_pairings<R: Rng + ?Sized, I: IdSource + ?Sized>(
    players: &[Player],
    num_matches: usize,
    rng: &mut R,
    ids: &mut I,
) -> Result<Vec<Match>, LeagueError> {
    if players.len() < 2 {
        return Err(LeagueError::InsufficientPlayers {
            count: players.len(),
        });
    }
    let mut pairings: Vec<(&Player, &Player)> = Vec::new();
    for (i, a) in players.iter().enumerate() {
        for b in &players[i + 1..] {
            pairings.push((a, b));
        }
    }

    let mut selected = Vec::with_capacity(num_matches);
    let times_each = num_matches / pairings.len();
    let remainder = num_matches % pairings.len();
    for _ in 0..times_each {
        pairings.shuffle(rng);
        selected.extend(pairings.iter().copied());
    }
    pairings.shuffle(rng);
    selected.extend(pairings.iter().copied().take(remainder));
    selected.shuffle(rng);

    Ok(selected
        .into_iter()
        .map(|(a, b)| Match::new(format!("match-{}", ids.next_id()), a.clone(), b.clone()))
        .collect())
}

/// Append a generated schedule to a season. Returns the number of matches added.
pub fn generate_season_schedule<R: Rng + ?Sized, I: IdSource + ?Sized>(
    league: &mut League,
    season_id: &str,
    num_matches: usize,
    rng: &mut R,
    ids: &mut I,
) -> Result<usize, LeagueError> {
    let season = league
        .seasons
        .iter()
        .find(|s| s.id == season_id)
        .ok_or_else(|| LeagueError::SeasonNotFound(season_id.to_string()))?;
    let players: Vec<Player> = league
        .players
        .iter()
        .filter(|p| season.players.contains(&p.id))
        .cloned()
        .collect();

    let matches = schedule_pairings(&players, num_matches, rng, ids)?;
    let added = matches.len();
    league.season_mut(season_id)?.matches.extend(matches);
    league.touch();
    log::info!("Scheduled {} match(es) in season {}", added, season_id);
    Ok(added)
}
