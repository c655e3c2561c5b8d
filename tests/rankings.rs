//! Integration tests for player statistics and rankings.

use league_bracket::logic::{player_ranking, write_rankings_csv};
use league_bracket::{
    compute_rankings, generate_player_stats, generate_tournament, rank_players, record_bracket_result,
    top_players, Bracket, League, Match, Player, PlayerStats, Score, Season, SequentialIds, Sport,
    Winner,
};
use league_bracket::models::{TennisScore, TennisSet};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn league(ids: &[&str]) -> League {
    let mut league = League::new("club", "Club", Sport::Simple);
    for id in ids {
        league.add_player(Player::new(*id, id.to_uppercase())).unwrap();
    }
    league
}

fn season(league: &mut League, matches: Vec<Match>) {
    let players = league.players.iter().map(|p| p.id.clone()).collect();
    league.seasons.push(Season {
        id: format!("s{}", league.seasons.len() + 1),
        name: "Season".into(),
        players,
        start_date: "2024-01-01".into(),
        end_date: "2024-12-31".into(),
        matches,
        sport: None,
    });
}

fn game(id: &str, a: &str, b: &str, winner: Winner, date: Option<&str>) -> Match {
    let mut m = Match::new(id, Player::new(a, a.to_uppercase()), Player::new(b, b.to_uppercase()));
    m.winner = winner;
    m.date = date.map(str::to_string);
    m
}

fn stats_of<'a>(stats: &'a [PlayerStats], id: &str) -> &'a PlayerStats {
    stats.iter().find(|s| s.player_id == id).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn single_simple_match() {
    let mut l = league(&["a", "b"]);
    let mut m = game("m1", "a", "b", Winner::Player(0), None);
    m.scores = Some(Score::simple(21, 15));
    season(&mut l, vec![m]);

    let stats = generate_player_stats(&l);
    let a = stats_of(&stats, "a");
    assert_eq!((a.wins, a.losses, a.total_matches), (1, 0, 1));
    assert!(close(a.win_rate, 1.0));
    assert!(close(a.point_differential, 6.0));
    assert!(close(a.ranking_score, 100.0 + 6.0 + 0.5));
    let b = stats_of(&stats, "b");
    assert_eq!((b.wins, b.losses), (0, 1));
    assert!(close(b.point_differential, -6.0));
    assert!(close(b.average_points_scored, 15.0));
    assert_eq!(b.seasons_participated, 1);

    let rankings = compute_rankings(&l);
    assert_eq!(rankings[0].stats.player_id, "a");
    assert_eq!(rankings[0].rank, 1);
    assert_eq!(rankings[1].rank, 2);
}

#[test]
fn tennis_scores_count_games_sets_and_weighted_tiebreaks() {
    let mut l = league(&["a", "b"]);
    let mut m = game("m1", "a", "b", Winner::Player(0), None);
    m.scores = Some(Score::Tennis(TennisScore {
        sets: vec![
            TennisSet { games: [6, 4], tiebreak: None },
            TennisSet { games: [3, 6], tiebreak: None },
            TennisSet { games: [7, 6], tiebreak: Some([7, 5]) },
        ],
    }));
    season(&mut l, vec![m]);

    let stats = generate_player_stats(&l);
    let a = stats_of(&stats, "a");
    assert_eq!((a.sets_won, a.sets_lost), (2, 1));
    assert!(close(a.games_won, 16.7));
    assert!(close(a.games_lost, 16.5));
    assert!(close(a.point_differential, 0.2));
    // win rate + diff + activity + set rate bonus
    assert!(close(a.ranking_score, 100.0 + 0.2 + 0.5 + 2.0 / 3.0 * 5.0));
    let b = stats_of(&stats, "b");
    assert_eq!((b.sets_won, b.sets_lost), (1, 2));
}

#[test]
fn draws_count_for_both_players() {
    let mut l = league(&["a", "b"]);
    season(&mut l, vec![game("m1", "a", "b", Winner::Draw, None)]);
    let stats = generate_player_stats(&l);
    for id in ["a", "b"] {
        let s = stats_of(&stats, id);
        assert_eq!((s.draws, s.wins, s.losses, s.total_matches), (1, 0, 0, 1));
        assert!(close(s.win_rate, 0.0));
    }
}

#[test]
fn streaks_use_most_recent_dated_results() {
    let mut l = league(&["a", "b"]);
    season(
        &mut l,
        vec![
            game("m1", "a", "b", Winner::Player(0), Some("2024-01-01")),
            game("m2", "a", "b", Winner::Player(0), Some("2024-01-02")),
            game("m3", "a", "b", Winner::Player(0), Some("2024-01-03")),
            game("m4", "a", "b", Winner::Draw, Some("2024-01-04")),
            game("m5", "b", "a", Winner::Player(1), Some("2024-01-05T10:00:00Z")),
            game("m6", "a", "b", Winner::Player(0), Some("2024-01-06")),
            // undated and unplayed matches are ignored
            game("m7", "a", "b", Winner::Player(1), None),
            game("m8", "a", "b", Winner::Undecided, Some("2024-02-01")),
        ],
    );
    let stats = generate_player_stats(&l);
    let a = stats_of(&stats, "a");
    assert_eq!(a.current_streak, 2);
    assert_eq!(a.win_streak, 3);
    let b = stats_of(&stats, "b");
    assert_eq!(b.current_streak, -2);
    assert_eq!(b.win_streak, 0);
}

#[test]
fn most_recent_draw_resets_current_streak() {
    let mut l = league(&["a", "b"]);
    season(
        &mut l,
        vec![
            game("m1", "a", "b", Winner::Player(0), Some("2024-01-01")),
            game("m2", "a", "b", Winner::Draw, Some("2024-01-02")),
        ],
    );
    let stats = generate_player_stats(&l);
    assert_eq!(stats_of(&stats, "a").current_streak, 0);
    assert_eq!(stats_of(&stats, "a").win_streak, 1);
}

#[test]
fn ties_are_broken_by_player_id() {
    let l = league(&["zed", "amy", "kim"]);
    let ids: Vec<String> = compute_rankings(&l).into_iter().map(|r| r.stats.player_id).collect();
    assert_eq!(ids, vec!["amy", "kim", "zed"]);
}

#[test]
fn previous_rankings_give_rank_change() {
    let mut l = league(&["a", "b"]);
    let before = compute_rankings(&l);
    assert_eq!(before[0].stats.player_id, "a");

    season(&mut l, vec![game("m1", "a", "b", Winner::Player(1), None)]);
    let after = rank_players(&l, Some(&before));
    assert_eq!(after[0].stats.player_id, "b");
    assert_eq!(after[0].previous_rank, Some(2));
    assert_eq!(after[0].rank_change, Some(1));
    assert_eq!(after[1].rank_change, Some(-1));

    assert!(compute_rankings(&l).iter().all(|r| r.rank_change.is_none()));
}

#[test]
fn unknown_players_are_skipped() {
    let mut l = league(&["a"]);
    season(&mut l, vec![game("m1", "a", "ghost", Winner::Player(1), None)]);
    let stats = generate_player_stats(&l);
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].losses, 1);
}

#[test]
fn empty_league_has_no_rankings() {
    let l = league(&[]);
    assert!(compute_rankings(&l).is_empty());
    assert!(top_players(&l, 3).is_empty());
}

#[test]
fn bracket_matches_count_toward_stats() {
    let mut l = league(&["a", "b", "c"]);
    let mut bracket = Bracket::new("b1", "Cup");
    bracket.players = vec!["a".into(), "b".into(), "c".into()];
    l.add_bracket(bracket).unwrap();
    generate_tournament(&mut l, "b1", &mut StdRng::seed_from_u64(1), &mut SequentialIds::default()).unwrap();

    let root = l.bracket("b1").unwrap().final_match.clone().unwrap();
    let [_, real_match] = root.children.as_ref().unwrap();
    let real_id = real_match.game.id.clone();
    let winner_id = real_match.game.players[0].id.clone();
    assert!(record_bracket_result(&mut l, "b1", &real_id, Winner::Player(0), None).unwrap());

    let stats = generate_player_stats(&l);
    for s in &stats {
        assert_eq!(s.tournaments_participated, 1);
    }
    let w = stats_of(&stats, &winner_id);
    assert!(w.wins >= 1);
    assert_eq!(
        stats.iter().map(|s| s.losses).sum::<u32>(),
        1,
        "only the decided real match has a loser"
    );
}

#[test]
fn top_players_and_single_lookup() {
    let mut l = league(&["a", "b", "c"]);
    season(
        &mut l,
        vec![
            game("m1", "a", "b", Winner::Player(0), None),
            game("m2", "a", "c", Winner::Player(0), None),
            game("m3", "b", "c", Winner::Player(0), None),
        ],
    );
    let top = top_players(&l, 2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].stats.player_id, "a");
    assert_eq!(top[1].stats.player_id, "b");
    assert_eq!(player_ranking(&l, "c").map(|r| r.rank), Some(3));
    assert!(player_ranking(&l, "nobody").is_none());
}

#[test]
fn rankings_export_as_csv() {
    let mut l = league(&["a", "b"]);
    season(&mut l, vec![game("m1", "a", "b", Winner::Player(0), None)]);
    let mut out = Vec::new();
    write_rankings_csv(&compute_rankings(&l), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("rank,player_id,player_name,matches"));
    assert!(lines.next().unwrap().starts_with("1,a,A,1,1,0,0,"));
    assert!(lines.next().unwrap().starts_with("2,b,B,1,0,1,0,"));
}
