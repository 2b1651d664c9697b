//! A single bracket match, its player slots, and its derived status.

use crate::models::player::Participant;
use serde::{Deserialize, Serialize};

/// Stable key of a match within one bracket.
pub type MatchId = String;

/// Id reserved for the match between the two semifinal losers.
pub const THIRD_PLACE_ID: &str = "third_place_playoff";

/// Label of the third-place match.
pub const THIRD_PLACE_ROUND_NAME: &str = "Third place playoff";

/// Which of the two player slots of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Player1,
    Player2,
}

impl Slot {
    pub fn other(self) -> Slot {
        match self {
            Slot::Player1 => Slot::Player2,
            Slot::Player2 => Slot::Player1,
        }
    }

    /// Slot a feeder match's winner lands in, from the feeder's ordinal within its round.
    pub fn for_ordinal(ordinal: usize) -> Slot {
        if ordinal % 2 == 0 {
            Slot::Player1
        } else {
            Slot::Player2
        }
    }
}

/// Layout coordinates for the editor canvas. Not used by the algorithm.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// How far a match has progressed, derived from which fields are filled.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Empty,
    PartiallyAssigned,
    AwaitingResult,
    Confirmed,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    /// 1-based; the final has the highest round number.
    pub round: u32,
    pub round_name: String,
    #[serde(default)]
    pub player1: Option<Participant>,
    #[serde(default)]
    pub player2: Option<Participant>,
    /// Non-negative integer as text; None until entered.
    #[serde(default)]
    pub player1_score: Option<String>,
    #[serde(default)]
    pub player2_score: Option<String>,
    /// Always one of `player1` / `player2` when set.
    #[serde(default)]
    pub winner: Option<Participant>,
    #[serde(default)]
    pub position: Position,
    /// Match the winner advances into. None for the final and third place.
    #[serde(default)]
    pub next_match_id: Option<MatchId>,
}

impl BracketMatch {
    pub fn new(id: impl Into<MatchId>, round: u32, round_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            round,
            round_name: round_name.into(),
            player1: None,
            player2: None,
            player1_score: None,
            player2_score: None,
            winner: None,
            position: Position::default(),
            next_match_id: None,
        }
    }

    pub fn is_third_place(&self) -> bool {
        self.id == THIRD_PLACE_ID
    }

    pub fn slot(&self, slot: Slot) -> Option<&Participant> {
        match slot {
            Slot::Player1 => self.player1.as_ref(),
            Slot::Player2 => self.player2.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut Option<Participant> {
        match slot {
            Slot::Player1 => &mut self.player1,
            Slot::Player2 => &mut self.player2,
        }
    }

    pub fn score(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Player1 => self.player1_score.as_deref(),
            Slot::Player2 => self.player2_score.as_deref(),
        }
    }

    pub fn score_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::Player1 => &mut self.player1_score,
            Slot::Player2 => &mut self.player2_score,
        }
    }

    /// Both occupied slots, in slot order.
    pub fn participants(&self) -> Vec<&Participant> {
        self.player1.iter().chain(self.player2.iter()).collect()
    }

    /// Slot currently holding `participant`, if any.
    pub fn slot_of(&self, participant: &Participant) -> Option<Slot> {
        [Slot::Player1, Slot::Player2]
            .into_iter()
            .find(|&s| self.slot(s).is_some_and(|p| p.same_as(participant)))
    }

    /// The participant that did not win. None while unresolved.
    pub fn loser(&self) -> Option<&Participant> {
        let winner = self.winner.as_ref()?;
        let slot = self.slot_of(winner)?;
        self.slot(slot.other())
    }

    pub fn clear_result(&mut self) {
        self.winner = None;
        self.player1_score = None;
        self.player2_score = None;
    }

    /// Clears winner and scores when the winner no longer sits in either slot.
    /// Returns the dropped winner.
    pub fn repair_winner(&mut self) -> Option<Participant> {
        let winner = self.winner.as_ref()?;
        if self.slot_of(winner).is_some() {
            return None;
        }
        let stale = self.winner.take();
        self.player1_score = None;
        self.player2_score = None;
        stale
    }

    pub fn status(&self) -> MatchStatus {
        if self.winner.is_some() {
            return MatchStatus::Confirmed;
        }
        match (&self.player1, &self.player2) {
            (None, None) => MatchStatus::Empty,
            (Some(_), Some(_)) => MatchStatus::AwaitingResult,
            _ => MatchStatus::PartiallyAssigned,
        }
    }
}
