//! Building a seeded single-elimination tree, padded with byes.

use crate::logic::advancement::{auto_winner, fill_from_children};
use crate::logic::seeding::generate_seed_order;
use crate::models::{BracketMatch, LeagueError, Match, Player, Seeding};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Source of unique id tokens for generated matches.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Counter starting at 1, for reproducible trees.
#[derive(Clone, Debug, Default)]
pub struct SequentialIds {
    next: u64,
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        self.next += 1;
        self.next.to_string()
    }
}

/// A freshly generated tree and the seeds it was built from.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTournament {
    pub final_match: BracketMatch,
    pub seedings: Vec<Seeding>,
}

/// Build a bracket from players ranked best-first.
///
/// The field is padded to the next power of two; slots whose seed exceeds the
/// number of players hold a BYE, so byes go to the top seeds and never meet
/// each other. First-round matches against a bye are decided immediately and
/// the winner is carried up.
pub fn build_tournament<I: IdSource + ?Sized>(
    ranked: &[Player],
    ids: &mut I,
) -> Result<GeneratedTournament, LeagueError> {
    let count = ranked.len();
    if count < 2 {
        return Err(LeagueError::InsufficientPlayers { count });
    }
    let bracket_size = count.next_power_of_two();
    let slots: Vec<Player> = generate_seed_order(bracket_size)?
        .into_iter()
        .enumerate()
        .map(|(slot, seed)| match ranked.get(seed - 1) {
            Some(p) => p.clone(),
            None => Player::bye(slot),
        })
        .collect();
    log::info!(
        "Building bracket of {} slots for {} players ({} byes)",
        bracket_size,
        count,
        bracket_size - count
    );

    let final_match = build_subtree(&slots, 0, ids);
    let seedings = ranked
        .iter()
        .enumerate()
        .map(|(i, p)| Seeding {
            player_id: p.id.clone(),
            seed: i as u32 + 1,
        })
        .collect();
    Ok(GeneratedTournament {
        final_match,
        seedings,
    })
}

/// Build the subtree for `slots`, whose first slot is `first_slot` in the whole bracket.
fn build_subtree<I: IdSource + ?Sized>(slots: &[Player], first_slot: usize, ids: &mut I) -> BracketMatch {
    if let [p0, p1] = slots {
        let round = 1;
        let mut game = Match::new(format!("match-{round}-{}", ids.next_id()), p0.clone(), p1.clone());
        game.winner = auto_winner(p0, p1);
        return BracketMatch {
            id: format!("node-{round}-{}", ids.next_id()),
            game,
            children: None,
            round,
            position: (first_slot / 2) as u32,
        };
    }

    let mid = slots.len() / 2;
    let left = build_subtree(&slots[..mid], first_slot, ids);
    let right = build_subtree(&slots[mid..], first_slot + mid, ids);
    let round = left.round + 1;
    let position = left.position / 2;

    let mut game = Match {
        id: format!("match-{round}-{}", ids.next_id()),
        ..Match::default()
    };
    fill_from_children(&mut game, &left, &right);
    BracketMatch {
        id: format!("node-{round}-{}", ids.next_id()),
        game,
        children: Some([Arc::new(left), Arc::new(right)]),
        round,
        position,
    }
}
