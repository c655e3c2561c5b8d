//! CSV export of rankings.

use crate::models::PlayerRanking;
use serde::Serialize;
use std::io;

#[derive(Serialize)]
struct RankingRow<'a> {
    rank: u32,
    player_id: &'a str,
    player_name: &'a str,
    matches: u32,
    wins: u32,
    losses: u32,
    draws: u32,
    win_rate: f64,
    point_differential: f64,
    current_streak: i32,
    ranking_score: f64,
}

/// Write one CSV row per ranking entry, with a header.
pub fn write_rankings_csv<W: io::Write>(rankings: &[PlayerRanking], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in rankings {
        let s = &r.stats;
        wtr.serialize(RankingRow {
            rank: r.rank,
            player_id: &s.player_id,
            player_name: &s.player_name,
            matches: s.total_matches,
            wins: s.wins,
            losses: s.losses,
            draws: s.draws,
            win_rate: s.win_rate,
            point_differential: s.point_differential,
            current_streak: s.current_streak,
            ranking_score: s.ranking_score,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
