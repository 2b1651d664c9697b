//! Bracket (the full match list), ScoreRule, and BracketError.

use crate::models::game::{BracketMatch, MatchId, Slot};
use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Errors surfaced to the editor as rejection notices. The bracket is left unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Fewer than 4 players; no bracket can be generated.
    NotEnoughPlayers { count: usize },
    /// The match has a winner; unlock it before clearing.
    MatchConfirmed(MatchId),
    /// The same player would occupy both slots of one match.
    DuplicatePlayer { match_id: MatchId, player_id: PlayerId },
    /// Not enough unplaced qualified players to fill every lucky-draw slot.
    NotEnoughLuckyDrawPlayers { needed: usize, available: usize },
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::NotEnoughPlayers { count } => {
                write!(f, "Need at least 4 players to generate a bracket (got {})", count)
            }
            BracketError::MatchConfirmed(_) => write!(f, "Cannot clear a confirmed result"),
            BracketError::DuplicatePlayer { player_id, .. } => {
                write!(f, "Player {} is already in this match", player_id)
            }
            BracketError::NotEnoughLuckyDrawPlayers { needed, available } => write!(
                f,
                "Need {} players for the lucky draw but only {} are available",
                needed, available
            ),
        }
    }
}

impl std::error::Error for BracketError {}

/// How entered scores decide a match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRule {
    /// Reaching the win target decides; otherwise any difference between two entered scores does.
    #[default]
    TargetThenDifference,
    /// Only reaching the win target decides.
    TargetOnly,
}

/// Full bracket state: every match, ordered by round then vertical position.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub matches: Vec<BracketMatch>,
    #[serde(default)]
    pub score_rule: ScoreRule,
}

impl Bracket {
    /// Wrap matches as produced by the generator (already ordered).
    pub fn new(matches: Vec<BracketMatch>) -> Self {
        Self {
            matches,
            score_rule: ScoreRule::default(),
        }
    }

    /// Rebuild a bracket from previously saved matches: drops winners that no longer
    /// sit in their match and restores round/position order.
    pub fn resume(matches: Vec<BracketMatch>) -> Self {
        let mut bracket = Self::new(matches);
        for m in &mut bracket.matches {
            if let Some(stale) = m.repair_winner() {
                log::debug!("Dropped stale winner {} from {}", stale.id(), m.id);
            }
        }
        bracket.sort();
        bracket
    }

    pub fn sort(&mut self) {
        self.matches.sort_by_key(|m| (m.round, m.position.y));
    }

    pub fn get(&self, id: &str) -> Option<&BracketMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.matches.iter().position(|m| m.id == id)
    }

    pub fn third_place_index(&self) -> Option<usize> {
        self.matches.iter().position(|m| m.is_third_place())
    }

    /// Highest round number among regular (non third-place) matches.
    pub fn final_round(&self) -> Option<u32> {
        self.matches
            .iter()
            .filter(|m| !m.is_third_place())
            .map(|m| m.round)
            .max()
    }

    pub fn final_match(&self) -> Option<&BracketMatch> {
        let round = self.final_round()?;
        self.matches
            .iter()
            .find(|m| m.round == round && !m.is_third_place())
    }

    pub fn third_place_match(&self) -> Option<&BracketMatch> {
        self.third_place_index().map(|i| &self.matches[i])
    }

    /// Position of a regular match among the regular matches of its round.
    pub fn round_ordinal(&self, index: usize) -> usize {
        let target = &self.matches[index];
        self.matches[..index]
            .iter()
            .filter(|m| m.round == target.round && !m.is_third_place())
            .count()
    }

    /// Slot of the next match that the winner of `matches[index]` advances into.
    pub fn advance_slot(&self, index: usize) -> Slot {
        Slot::for_ordinal(self.round_ordinal(index))
    }

    /// Number of bye placeholders currently in the bracket.
    pub fn bye_count(&self) -> usize {
        self.matches
            .iter()
            .flat_map(|m| m.participants())
            .filter(|p| p.is_bye())
            .count()
    }

    /// Ids of every real player placed anywhere in the bracket.
    pub fn placed_player_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .matches
            .iter()
            .flat_map(|m| m.participants())
            .filter(|p| p.is_player())
            .map(|p| p.id())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
