//! Integration tests for building seeded brackets.

use league_bracket::logic::matches_by_round;
use league_bracket::{build_tournament, BracketMatch, LeagueError, Player, SequentialIds, UuidIds, Winner};

fn players(n: usize) -> Vec<Player> {
    (1..=n).map(|i| Player::new(format!("p{i}"), format!("Player {i}"))).collect()
}

fn ids(players: &[Player]) -> Vec<&str> {
    players.iter().map(|p| p.id.as_str()).collect()
}

fn leaf_players(root: &BracketMatch) -> Vec<Player> {
    root.leaves()
        .into_iter()
        .flat_map(|n| n.game.players.iter().cloned())
        .collect()
}

#[test]
fn build_requires_at_least_2_players() {
    for n in [0, 1] {
        assert!(matches!(
            build_tournament(&players(n), &mut SequentialIds::default()),
            Err(LeagueError::InsufficientPlayers { count }) if count == n
        ));
    }
}

#[test]
fn two_players_make_a_single_leaf() {
    let t = build_tournament(&players(2), &mut SequentialIds::default()).unwrap();
    let root = &t.final_match;
    assert!(root.is_leaf());
    assert_eq!(root.round, 1);
    assert_eq!(ids(&root.game.players), vec!["p1", "p2"]);
    assert_eq!(root.game.winner, Winner::Undecided);
}

#[test]
fn three_players_give_top_seed_a_bye() {
    let t = build_tournament(&players(3), &mut SequentialIds::default()).unwrap();
    let root = &t.final_match;
    assert_eq!(root.round, 2);

    let [left, right] = root.children.as_ref().unwrap();
    assert_eq!(left.game.players[0].id, "p1");
    assert!(left.game.players[1].is_bye());
    assert_eq!(left.game.winner, Winner::Player(0));
    assert_eq!(ids(&right.game.players), vec!["p2", "p3"]);
    assert_eq!(right.game.winner, Winner::Undecided);

    assert_eq!(root.game.players[0].id, "p1");
    assert!(root.game.players[1].is_tbd());
    assert_eq!(root.game.winner, Winner::Undecided);

    let seeds: Vec<(&str, u32)> = t.seedings.iter().map(|s| (s.player_id.as_str(), s.seed)).collect();
    assert_eq!(seeds, vec![("p1", 1), ("p2", 2), ("p3", 3)]);
}

#[test]
fn shape_and_bye_count_for_every_size() {
    for n in 2..=33 {
        let t = build_tournament(&players(n), &mut SequentialIds::default()).unwrap();
        let size = n.next_power_of_two();
        let root = &t.final_match;

        assert_eq!(root.round, size.trailing_zeros(), "rounds for {n} players");
        let slots = leaf_players(root);
        assert_eq!(slots.len(), size);
        assert_eq!(slots.iter().filter(|p| p.is_bye()).count(), size - n);

        let mut real: Vec<&str> = slots.iter().filter(|p| p.is_real()).map(|p| p.id.as_str()).collect();
        real.sort();
        let mut expected: Vec<String> = players(n).into_iter().map(|p| p.id).collect();
        expected.sort();
        assert_eq!(real, expected);
    }
}

#[test]
fn leaves_against_a_bye_are_decided_for_the_real_player() {
    for n in [3, 5, 6, 7, 11] {
        let t = build_tournament(&players(n), &mut SequentialIds::default()).unwrap();
        for leaf in t.final_match.leaves() {
            let [a, b] = [&leaf.game.players[0], &leaf.game.players[1]];
            assert!(!(a.is_bye() && b.is_bye()), "byes never meet with {n} players");
            let expected = match (a.is_bye(), b.is_bye()) {
                (false, true) => Winner::Player(0),
                (true, false) => Winner::Player(1),
                _ => Winner::Undecided,
            };
            assert_eq!(leaf.game.winner, expected);
        }
    }
}

#[test]
fn five_players_fill_second_round_from_byes() {
    let t = build_tournament(&players(5), &mut SequentialIds::default()).unwrap();
    let rounds = matches_by_round(&t.final_match);
    assert_eq!(rounds.len(), 3);

    let semis = &rounds[&2];
    assert_eq!(semis.len(), 2);
    assert_eq!(semis[0].game.players[0].id, "p1");
    assert!(semis[0].game.players[1].is_tbd());
    // p2 and p3 both advanced from byes
    assert_eq!(ids(&semis[1].game.players), vec!["p2", "p3"]);
    assert_eq!(semis[1].game.winner, Winner::Undecided);
}

#[test]
fn positions_are_ordered_within_each_round() {
    let t = build_tournament(&players(16), &mut SequentialIds::default()).unwrap();
    for (round, nodes) in matches_by_round(&t.final_match) {
        let positions: Vec<u32> = nodes.iter().map(|n| n.position).collect();
        let expected: Vec<u32> = (0..(16u32 >> round)).collect();
        assert_eq!(positions, expected, "round {round}");
    }
}

#[test]
fn match_ids_are_unique() {
    let t = build_tournament(&players(12), &mut SequentialIds::default()).unwrap();
    let nodes = t.final_match.nodes();
    let mut ids: Vec<&str> = nodes.iter().map(|n| n.game.id.as_str()).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(total, 15);
}

#[test]
fn ids_carry_the_round_prefix() {
    let t = build_tournament(&players(2), &mut SequentialIds::default()).unwrap();
    assert_eq!(t.final_match.game.id, "match-1-1");
    assert_eq!(t.final_match.id, "node-1-2");

    let t = build_tournament(&players(5), &mut UuidIds).unwrap();
    for n in t.final_match.nodes() {
        let token = n.game.id.strip_prefix(&format!("match-{}-", n.round)).unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(n.id.starts_with(&format!("node-{}-", n.round)));
    }
}
