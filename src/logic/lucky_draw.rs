//! Lucky draw: fill placeholder slots with random qualified players.

use crate::logic::propagation::{
    propagate_in_place, replace_slot_in_place, resolve_byes_in_place,
};
use crate::models::{Bracket, BracketError, Participant, QualifiedPlayer, Slot};
use rand::seq::SliceRandom;
use rand::Rng;

/// Replace every lucky-draw slot with a random player from `pool` who is not yet in the
/// bracket. Byes opposite a drawn player are then resolved and every drawn match is
/// propagated, as when assigning by hand.
pub fn draw_lucky_players<R: Rng + ?Sized>(
    bracket: &Bracket,
    pool: &[QualifiedPlayer],
    rng: &mut R,
) -> Result<Bracket, BracketError> {
    let slots: Vec<(usize, Slot)> = bracket
        .matches
        .iter()
        .enumerate()
        .flat_map(|(i, m)| {
            [Slot::Player1, Slot::Player2]
                .into_iter()
                .filter(move |&s| matches!(m.slot(s), Some(Participant::LuckyDraw)))
                .map(move |s| (i, s))
        })
        .collect();
    if slots.is_empty() {
        return Ok(bracket.clone());
    }

    let placed = bracket.placed_player_ids();
    let mut candidates: Vec<&QualifiedPlayer> = Vec::new();
    for p in pool {
        if !placed.contains(&p.id.as_str()) && !candidates.iter().any(|c| c.id == p.id) {
            candidates.push(p);
        }
    }
    if candidates.len() < slots.len() {
        return Err(BracketError::NotEnoughLuckyDrawPlayers {
            needed: slots.len(),
            available: candidates.len(),
        });
    }
    candidates.shuffle(rng);

    let mut out = bracket.clone();
    let mut drawn: Vec<usize> = Vec::with_capacity(slots.len());
    for ((index, slot), player) in slots.into_iter().zip(candidates) {
        log::debug!("Lucky draw in {}: {}", out.matches[index].id, player.name);
        replace_slot_in_place(&mut out, index, slot, Some(player.to_participant()));
        if !drawn.contains(&index) {
            drawn.push(index);
        }
    }
    resolve_byes_in_place(&mut out);
    for index in drawn {
        propagate_in_place(&mut out, index);
    }
    Ok(out)
}
