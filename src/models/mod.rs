//! Data structures for the knockout bracket: players, matches, bracket state.

mod bracket;
mod game;
mod player;

pub use bracket::{Bracket, BracketError, ScoreRule};
pub use game::{
    BracketMatch, MatchId, MatchStatus, Position, Slot, THIRD_PLACE_ID, THIRD_PLACE_ROUND_NAME,
};
pub use player::{Participant, Player, PlayerId, QualifiedPlayer, BYE_ID, LUCKY_DRAW_ID};
