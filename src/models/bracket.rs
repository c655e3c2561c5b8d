//! Bracket and the BracketMatch tree.

use crate::models::game::{Match, MatchId};
use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique identifier for a bracket within a league.
pub type BracketId = String;

/// A node of the single-elimination tree.
///
/// Leaves (no `children`) are first-round matches at `round` 1; the root is
/// the final. Children are shared so an update only rebuilds the path from the
/// changed match to the root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: String,
    #[serde(rename = "match")]
    pub game: Match,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<[Arc<BracketMatch>; 2]>,
    pub round: u32,
    /// Left-to-right position within the round, starting at 0.
    pub position: u32,
}

impl BracketMatch {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn match_id(&self) -> &MatchId {
        &self.game.id
    }

    /// Every node of the tree in pre-order (root, left subtree, right subtree).
    pub fn nodes(&self) -> Vec<&BracketMatch> {
        let mut out = Vec::new();
        self.collect_nodes(&mut out);
        out
    }

    fn collect_nodes<'a>(&'a self, out: &mut Vec<&'a BracketMatch>) {
        out.push(self);
        if let Some([left, right]) = &self.children {
            left.collect_nodes(out);
            right.collect_nodes(out);
        }
    }

    /// First-round matches, left to right.
    pub fn leaves(&self) -> Vec<&BracketMatch> {
        self.nodes().into_iter().filter(|n| n.is_leaf()).collect()
    }

    /// Node whose match has the given id.
    pub fn find(&self, match_id: &str) -> Option<&BracketMatch> {
        self.nodes().into_iter().find(|n| n.game.id == match_id)
    }
}

/// A player's seed in a bracket (1 is the top seed).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seeding {
    pub player_id: PlayerId,
    pub seed: u32,
}

/// A single-elimination tournament inside a league.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub id: BracketId,
    pub name: String,
    /// Ids of league players entered in this bracket.
    #[serde(default)]
    pub players: Vec<PlayerId>,
    #[serde(default)]
    pub seedings: Vec<Seeding>,
    /// Root of the tree (the final); absent until a tournament is generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_match: Option<BracketMatch>,
}

impl Bracket {
    pub fn new(id: impl Into<BracketId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            players: Vec::new(),
            seedings: Vec::new(),
            final_match: None,
        }
    }

    /// Every match in the tree, pre-order. Empty before generation.
    pub fn matches(&self) -> Vec<&Match> {
        self.final_match
            .as_ref()
            .map(|root| root.nodes().into_iter().map(|n| &n.game).collect())
            .unwrap_or_default()
    }
}
