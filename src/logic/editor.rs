//! Editor operations. Each takes the current bracket and returns the updated one;
//! on error the caller keeps its bracket as it was.

use crate::logic::propagation::{
    propagate_from, propagate_in_place, replace_slot_in_place, resolve_byes_in_place,
};
use crate::logic::resolver::{apply_manual_pick, apply_scores, normalize_score};
use crate::models::{Bracket, BracketError, Participant, ScoreRule, Slot};

fn find(bracket: &Bracket, match_id: &str, action: &str) -> Option<usize> {
    let index = bracket.index_of(match_id);
    if index.is_none() {
        log::warn!("{}: match {} not found, nothing changed", action, match_id);
    }
    index
}

/// Put `participant` (or nothing) into a slot. The match's winner is cleared and pulled
/// back out of later matches, then byes are resolved across the bracket and the match is
/// propagated. The displaced occupant does not linger downstream.
pub fn assign_player(
    bracket: &Bracket,
    match_id: &str,
    slot: Slot,
    participant: Option<Participant>,
) -> Result<Bracket, BracketError> {
    let Some(index) = find(bracket, match_id, "Assign player") else {
        return Ok(bracket.clone());
    };
    if let Some(p) = participant.as_ref().filter(|p| p.is_player()) {
        let duplicate = bracket.matches[index]
            .slot(slot.other())
            .is_some_and(|other| other.same_as(p));
        if duplicate {
            return Err(BracketError::DuplicatePlayer {
                match_id: match_id.to_string(),
                player_id: p.id().to_string(),
            });
        }
    }

    let mut out = bracket.clone();
    let displaced = replace_slot_in_place(&mut out, index, slot, participant);

    resolve_byes_in_place(&mut out);
    propagate_from(&mut out, index, displaced.as_slice());
    Ok(out)
}

/// Enter a score and re-decide the match from both scores.
pub fn set_score(
    bracket: &Bracket,
    match_id: &str,
    slot: Slot,
    value: &str,
) -> Result<Bracket, BracketError> {
    let Some(index) = find(bracket, match_id, "Set score") else {
        return Ok(bracket.clone());
    };
    let mut out = bracket.clone();
    let rule = out.score_rule;
    let m = &mut out.matches[index];
    *m.score_mut(slot) = normalize_score(value);
    apply_scores(m, rule);

    propagate_in_place(&mut out, index);
    Ok(out)
}

/// Pick the winner by player id. An id that is in neither slot clears the winner.
pub fn set_manual_winner(
    bracket: &Bracket,
    match_id: &str,
    player_id: &str,
) -> Result<Bracket, BracketError> {
    let Some(index) = find(bracket, match_id, "Set winner") else {
        return Ok(bracket.clone());
    };
    let mut out = bracket.clone();
    apply_manual_pick(&mut out.matches[index], player_id);

    propagate_in_place(&mut out, index);
    Ok(out)
}

/// Empty both slots and both scores. Refused while the match has a winner.
pub fn clear_match(bracket: &Bracket, match_id: &str) -> Result<Bracket, BracketError> {
    let Some(index) = find(bracket, match_id, "Clear match") else {
        return Ok(bracket.clone());
    };
    if bracket.matches[index].winner.is_some() {
        return Err(BracketError::MatchConfirmed(match_id.to_string()));
    }
    let mut out = bracket.clone();
    let m = &mut out.matches[index];
    m.player1 = None;
    m.player2 = None;
    m.clear_result();
    Ok(out)
}

/// Remove a match outright.
pub fn delete_match(bracket: &Bracket, match_id: &str) -> Result<Bracket, BracketError> {
    let Some(index) = find(bracket, match_id, "Delete match") else {
        return Ok(bracket.clone());
    };
    let mut out = bracket.clone();
    out.matches.remove(index);
    Ok(out)
}

/// Drop the winner and scores but keep the players, so the result can be re-entered.
pub fn unlock_match(bracket: &Bracket, match_id: &str) -> Result<Bracket, BracketError> {
    let Some(index) = find(bracket, match_id, "Unlock match") else {
        return Ok(bracket.clone());
    };
    let mut out = bracket.clone();
    out.matches[index].clear_result();
    Ok(out)
}

/// Empty every match, confirmed or not.
pub fn reset_bracket(bracket: &Bracket) -> Bracket {
    let mut out = bracket.clone();
    for m in &mut out.matches {
        m.player1 = None;
        m.player2 = None;
        m.clear_result();
    }
    log::info!("Reset bracket ({} matches)", out.matches.len());
    out
}

/// Choose how scores decide matches from now on. Existing results are kept.
pub fn set_score_rule(bracket: &Bracket, rule: ScoreRule) -> Bracket {
    Bracket {
        score_rule: rule,
        ..bracket.clone()
    }
}
