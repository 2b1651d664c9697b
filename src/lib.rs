//! Knockout bracket editor engine: library with models and bracket logic.

pub mod logic;
pub mod models;

pub use logic::{
    advance_all_winners, assign_player, clear_match, delete_match, draw_lucky_players,
    final_rankings, generate_bracket, generate_empty_bracket, generate_seeded_bracket, propagate,
    reset_bracket, resolve_bye, resolve_byes, resolve_from_manual_pick, resolve_from_scores,
    resolve_with_rule, set_manual_winner, set_score, set_score_rule, unlock_match, AdvanceOutcome,
    GenerationMode, Ranking, WIN_TARGET,
};
pub use models::{
    Bracket, BracketError, BracketMatch, MatchId, MatchStatus, Participant, Player, PlayerId,
    Position, QualifiedPlayer, ScoreRule, Slot, THIRD_PLACE_ID,
};
