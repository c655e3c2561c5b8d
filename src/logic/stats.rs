//! Player statistics and rankings, aggregated from season matches and bracket trees.

use crate::models::{League, Match, PlayerRanking, PlayerStats, Score, Winner};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::HashMap;

/// Weight of one tiebreak point relative to a game.
const TIEBREAK_WEIGHT: f64 = 0.1;
/// Cap on the per-match point differential contribution (either sign).
const POINT_DIFF_CAP: f64 = 20.0;
/// Activity bonus per match played, and its cap.
const ACTIVITY_PER_MATCH: f64 = 0.5;
const ACTIVITY_CAP: f64 = 10.0;
const STREAK_WEIGHT: f64 = 2.0;
const SET_RATE_WEIGHT: f64 = 5.0;

/// Per-player contribution of a single match.
#[derive(Default)]
struct MatchLine {
    win: u32,
    loss: u32,
    draw: u32,
    scored: f64,
    conceded: f64,
    sets_won: u32,
    sets_lost: u32,
    games_won: f64,
    games_lost: f64,
}

/// Split a match into the lines for players 0 and 1.
fn analyze_match(m: &Match) -> [MatchLine; 2] {
    let mut lines = [MatchLine::default(), MatchLine::default()];
    match m.winner {
        Winner::Player(0) => {
            lines[0].win = 1;
            lines[1].loss = 1;
        }
        Winner::Player(1) => {
            lines[0].loss = 1;
            lines[1].win = 1;
        }
        Winner::Draw => {
            lines[0].draw = 1;
            lines[1].draw = 1;
        }
        Winner::Player(_) | Winner::Undecided => {}
    }

    match &m.scores {
        Some(Score::Simple(s)) => {
            let [a, b] = s.points.map(f64::from);
            lines[0].scored = a;
            lines[0].conceded = b;
            lines[1].scored = b;
            lines[1].conceded = a;
        }
        Some(Score::Tennis(t)) => {
            let (mut sets, mut games) = ([0u32; 2], [0f64; 2]);
            for set in &t.sets {
                let [g0, g1] = set.games;
                games[0] += f64::from(g0);
                games[1] += f64::from(g1);
                if g0 > g1 {
                    sets[0] += 1;
                } else if g1 > g0 {
                    sets[1] += 1;
                }
                if let Some([t0, t1]) = set.tiebreak {
                    games[0] += f64::from(t0) * TIEBREAK_WEIGHT;
                    games[1] += f64::from(t1) * TIEBREAK_WEIGHT;
                }
            }
            for (i, line) in lines.iter_mut().enumerate() {
                let other = 1 - i;
                line.sets_won = sets[i];
                line.sets_lost = sets[other];
                line.games_won = games[i];
                line.games_lost = games[other];
                line.scored = games[i];
                line.conceded = games[other];
            }
        }
        None => {}
    }
    lines
}

fn apply_line(stats: &mut PlayerStats, line: &MatchLine) {
    stats.total_matches += 1;
    stats.wins += line.win;
    stats.losses += line.loss;
    stats.draws += line.draw;
    stats.total_points_scored += line.scored;
    stats.total_points_conceded += line.conceded;
    stats.sets_won += line.sets_won;
    stats.sets_lost += line.sets_lost;
    stats.games_won += line.games_won;
    stats.games_lost += line.games_lost;
}

/// Parse a match date: RFC 3339, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD` (taken as UTC).
pub fn parse_match_date(date: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Outcome {
    Win,
    Loss,
    Draw,
}

/// Returns `(win_streak, current_streak)` for a player.
///
/// Only matches with a parseable date and a decided result count, most recent first.
fn calculate_streaks(matches: &[&Match], player_id: &str) -> (u32, i32) {
    let mut dated: Vec<(DateTime<Utc>, Outcome)> = matches
        .iter()
        .filter_map(|m| {
            let idx = m.player_index(player_id)?;
            let when = parse_match_date(m.date.as_deref()?)?;
            let outcome = match m.winner {
                Winner::Undecided => return None,
                Winner::Draw => Outcome::Draw,
                Winner::Player(w) if w == idx => Outcome::Win,
                Winner::Player(_) => Outcome::Loss,
            };
            Some((when, outcome))
        })
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let current = match dated.first().map(|(_, o)| *o) {
        None | Some(Outcome::Draw) => 0,
        Some(first) => {
            let run = dated.iter().take_while(|(_, o)| *o == first).count() as i32;
            if first == Outcome::Win {
                run
            } else {
                -run
            }
        }
    };

    let (mut run, mut best) = (0u32, 0u32);
    for (_, outcome) in &dated {
        if *outcome == Outcome::Win {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    (best, current)
}

/// Composite score used to order the ranking.
///
/// `win_rate * 100`, plus the average point differential per match clamped to
/// ±20, plus 0.5 per match played (at most 10), plus twice a positive current
/// streak, plus `set_win_rate * 5` when sets were recorded.
pub fn ranking_score(stats: &PlayerStats) -> f64 {
    let win_rate_score = stats.win_rate * 100.0;
    let matches = f64::from(stats.total_matches.max(1));
    let point_diff_score = (stats.point_differential / matches).clamp(-POINT_DIFF_CAP, POINT_DIFF_CAP);
    let activity_bonus = (f64::from(stats.total_matches) * ACTIVITY_PER_MATCH).min(ACTIVITY_CAP);
    let streak_bonus = (f64::from(stats.current_streak) * STREAK_WEIGHT).max(0.0);
    let sets = stats.sets_won + stats.sets_lost;
    let set_bonus = if sets > 0 {
        f64::from(stats.sets_won) / f64::from(sets) * SET_RATE_WEIGHT
    } else {
        0.0
    };
    win_rate_score + point_diff_score + activity_bonus + streak_bonus + set_bonus
}

/// Every match in the league: season matches, then each bracket tree in pre-order.
pub fn all_matches(league: &League) -> Vec<&Match> {
    league
        .seasons
        .iter()
        .flat_map(|s| s.matches.iter())
        .chain(league.brackets.iter().flat_map(|b| b.matches()))
        .collect()
}

/// Statistics for every registered player, in league order.
///
/// Players that appear in matches but are not registered (including TBD and
/// BYE placeholders) get no entry.
pub fn generate_player_stats(league: &League) -> Vec<PlayerStats> {
    let mut stats: Vec<PlayerStats> = league.players.iter().map(PlayerStats::for_player).collect();
    let index: HashMap<&str, usize> = league
        .players
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.as_str(), i))
        .collect();

    for season in &league.seasons {
        for id in &season.players {
            if let Some(&i) = index.get(id.as_str()) {
                stats[i].seasons_participated += 1;
            }
        }
    }
    for bracket in &league.brackets {
        for id in &bracket.players {
            if let Some(&i) = index.get(id.as_str()) {
                stats[i].tournaments_participated += 1;
            }
        }
    }

    let matches = all_matches(league);
    for m in matches.iter().filter(|m| m.players.len() >= 2) {
        let lines = analyze_match(m);
        for (player, line) in m.players.iter().zip(lines.iter()) {
            match index.get(player.id.as_str()) {
                Some(&i) => apply_line(&mut stats[i], line),
                None if player.is_real() => {
                    log::warn!("Match {} references unknown player {}", m.id, player.id)
                }
                None => {}
            }
        }
    }

    for s in &mut stats {
        if s.total_matches > 0 {
            let n = f64::from(s.total_matches);
            s.win_rate = f64::from(s.wins) / n;
            s.average_points_scored = s.total_points_scored / n;
            s.average_points_conceded = s.total_points_conceded / n;
        }
        s.point_differential = s.total_points_scored - s.total_points_conceded;

        let involved: Vec<&Match> = matches
            .iter()
            .copied()
            .filter(|m| m.involves(&s.player_id))
            .collect();
        let (win_streak, current_streak) = calculate_streaks(&involved, &s.player_id);
        s.win_streak = win_streak;
        s.current_streak = current_streak;
        s.ranking_score = ranking_score(s);
    }
    stats
}

/// Rank every player by descending ranking score; ties go to the lower player id.
///
/// With `previous` rankings, each entry also carries its previous rank and the change.
pub fn rank_players(league: &League, previous: Option<&[PlayerRanking]>) -> Vec<PlayerRanking> {
    let mut stats = generate_player_stats(league);
    stats.sort_by(|a, b| {
        b.ranking_score
            .total_cmp(&a.ranking_score)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    stats
        .into_iter()
        .enumerate()
        .map(|(i, stats)| {
            let rank = i as u32 + 1;
            let previous_rank = previous.and_then(|prev| {
                prev.iter()
                    .find(|r| r.stats.player_id == stats.player_id)
                    .map(|r| r.rank)
            });
            PlayerRanking {
                rank,
                rank_change: previous_rank.map(|p| p as i32 - rank as i32),
                previous_rank,
                stats,
            }
        })
        .collect()
}

/// Current rankings with no history.
pub fn compute_rankings(league: &League) -> Vec<PlayerRanking> {
    rank_players(league, None)
}

/// The first `count` players of the ranking.
pub fn top_players(league: &League, count: usize) -> Vec<PlayerRanking> {
    let mut rankings = compute_rankings(league);
    rankings.truncate(count);
    rankings
}

/// Ranking entry for one player.
pub fn player_ranking(league: &League, player_id: &str) -> Option<PlayerRanking> {
    compute_rankings(league)
        .into_iter()
        .find(|r| r.stats.player_id == player_id)
}
