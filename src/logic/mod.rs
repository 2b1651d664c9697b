//! Bracket business logic: generation, resolution, propagation, editor operations.

mod editor;
mod generator;
mod lucky_draw;
mod propagation;
mod rankings;
mod resolver;

pub use editor::{
    assign_player, clear_match, delete_match, reset_bracket, set_manual_winner, set_score,
    set_score_rule, unlock_match,
};
pub use generator::{
    bracket_size, bye_count, generate_bracket, generate_empty_bracket, generate_seeded_bracket,
    match_id, round_count, round_name, GenerationMode, FINAL, MIN_PLAYERS, QUARTERFINAL, SEMIFINAL,
};
pub use lucky_draw::draw_lucky_players;
pub use propagation::{advance_all_winners, propagate, resolve_byes, AdvanceOutcome};
pub use rankings::{final_rankings, Ranking};
pub use resolver::{
    normalize_score, resolve_bye, resolve_from_manual_pick, resolve_from_scores, resolve_with_rule,
    winning_slot, WIN_TARGET,
};
