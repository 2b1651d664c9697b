//! Moving winners forward: single-match propagation with stale cleanup, bye cascades,
//! and the bulk "advance all winners" pass.

use crate::logic::generator::SEMIFINAL;
use crate::logic::resolver::apply_bye;
use crate::models::{Bracket, BracketMatch, Participant, Slot};
use serde::{Deserialize, Serialize};

/// Result of [`advance_all_winners`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    /// No match has both a winner and a next match.
    NothingToAdvance,
    /// Winners written into empty next-round slots.
    Advanced { count: usize },
}

/// Where an incoming participant goes in the downstream match.
#[derive(Clone, Copy, Debug)]
enum Placement {
    Slot(Slot),
    FirstEmpty,
}

impl Placement {
    fn accepts(self, slot: Slot) -> bool {
        match self {
            Placement::Slot(s) => s == slot,
            Placement::FirstEmpty => true,
        }
    }
}

/// Outcome of writing a participant into a downstream match.
struct Placed {
    changed: bool,
    /// Participants that left the match (cleared as stale or overwritten).
    removed: Vec<Participant>,
    /// Winner dropped because it left the match.
    dropped_winner: Option<Participant>,
}

/// Write `incoming` into `target`. Slots holding any of `stale` are emptied first,
/// unless they already hold `incoming` where it belongs.
fn place(
    target: &mut BracketMatch,
    incoming: &Participant,
    stale: &[Participant],
    placement: Placement,
) -> Placed {
    let before = target.clone();
    let in_place = |slot: Slot, p: &Participant| p.same_as(incoming) && placement.accepts(slot);
    let mut removed = Vec::new();

    for slot in [Slot::Player1, Slot::Player2] {
        let clear = target
            .slot(slot)
            .is_some_and(|p| stale.iter().any(|s| s.same_as(p)) && !in_place(slot, p));
        if clear {
            removed.extend(target.slot_mut(slot).take());
        }
    }

    let placed = [Slot::Player1, Slot::Player2]
        .into_iter()
        .any(|s| target.slot(s).is_some_and(|p| in_place(s, p)));
    if !placed {
        let dest = match placement {
            Placement::Slot(s) => Some(s),
            Placement::FirstEmpty => [Slot::Player1, Slot::Player2]
                .into_iter()
                .find(|&s| target.slot(s).is_none()),
        };
        match dest {
            Some(dest) => removed.extend(target.slot_mut(dest).replace(incoming.clone())),
            None => log::debug!("{}: no free slot for {}", target.id, incoming.id()),
        }
    }
    removed.retain(|p| !p.same_as(incoming));

    let dropped_winner = target.repair_winner();
    Placed {
        changed: *target != before,
        removed,
        dropped_winner,
    }
}

fn remove_participant(m: &mut BracketMatch, participant: &Participant) -> bool {
    let mut removed = false;
    for slot in [Slot::Player1, Slot::Player2] {
        if m.slot(slot).is_some_and(|p| p.same_as(participant)) {
            *m.slot_mut(slot) = None;
            removed = true;
        }
    }
    removed
}

/// Undo what an un-confirmed match had sent downstream: its former winner leaves the
/// next match, and a former semifinal loser leaves the third-place match.
fn withdraw(
    bracket: &mut Bracket,
    index: usize,
    former_winner: &Participant,
    former_loser: Option<&Participant>,
    depth: usize,
) {
    if depth > bracket.matches.len() {
        log::warn!("Stopped withdrawing at {}: next-match links loop", bracket.matches[index].id);
        return;
    }
    let m = bracket.matches[index].clone();
    log::debug!("{} no longer confirmed, withdrawing {}", m.id, former_winner.id());

    if let Some(next_idx) = m.next_match_id.as_deref().and_then(|id| bracket.index_of(id)) {
        let next_loser = bracket.matches[next_idx].loser().cloned();
        if remove_participant(&mut bracket.matches[next_idx], former_winner) {
            match bracket.matches[next_idx].repair_winner() {
                Some(dropped) => {
                    withdraw(bracket, next_idx, &dropped, next_loser.as_ref(), depth + 1)
                }
                // Still decided, but its loser left: that loser no longer plays for third.
                None if next_loser.as_ref().is_some_and(|l| l.same_as(former_winner)) => {
                    withdraw_third_place(bracket, next_idx, former_winner);
                }
                None => {}
            }
        }
    }

    if let Some(loser) = former_loser {
        withdraw_third_place(bracket, index, loser);
    }
}

/// Take a former semifinal loser of `matches[index]` out of the third-place match.
fn withdraw_third_place(bracket: &mut Bracket, index: usize, loser: &Participant) {
    if bracket.matches[index].round_name != SEMIFINAL {
        return;
    }
    if let Some(tp) = bracket.third_place_index() {
        if remove_participant(&mut bracket.matches[tp], loser) {
            bracket.matches[tp].repair_winner();
        }
    }
}

fn place_and_cascade(
    bracket: &mut Bracket,
    target: usize,
    incoming: &Participant,
    stale: &[Participant],
    placement: Placement,
) -> bool {
    let former_loser = bracket.matches[target].loser().cloned();
    let placed = place(&mut bracket.matches[target], incoming, stale, placement);
    match placed.dropped_winner {
        Some(dropped) => withdraw(bracket, target, &dropped, former_loser.as_ref(), 0),
        // Still confirmed but with a new loser: refresh what it sent downstream.
        None if placed.changed && bracket.matches[target].winner.is_some() => {
            propagate_from(bracket, target, &placed.removed);
        }
        None => {}
    }
    placed.changed
}

/// Push the winner of `matches[index]` into its next match, and a semifinal loser into
/// the third-place match. `extra_stale` are former participants that must not linger
/// downstream. Returns true when anything downstream changed.
pub(crate) fn propagate_from(
    bracket: &mut Bracket,
    index: usize,
    extra_stale: &[Participant],
) -> bool {
    let changed = bracket.matches[index].clone();
    let Some(winner) = changed.winner.clone() else {
        return false;
    };
    let stale: Vec<Participant> = changed
        .participants()
        .into_iter()
        .chain(extra_stale)
        .cloned()
        .collect();
    let mut any = false;

    if let Some(next_id) = changed.next_match_id.as_deref() {
        match bracket.index_of(next_id) {
            Some(next_idx) => {
                let slot = bracket.advance_slot(index);
                any |= place_and_cascade(bracket, next_idx, &winner, &stale, Placement::Slot(slot));
            }
            None => log::debug!("{}: next match {} not found, skipping", changed.id, next_id),
        }
    }

    if changed.round_name == SEMIFINAL {
        let loser = changed.loser().filter(|p| p.is_player()).cloned();
        if let (Some(loser), Some(tp)) = (loser, bracket.third_place_index()) {
            any |= place_and_cascade(bracket, tp, &loser, &stale, Placement::FirstEmpty);
        }
    }

    if any {
        log::debug!("Propagated {} from {}", winner.id(), changed.id);
    }
    any
}

pub(crate) fn propagate_in_place(bracket: &mut Bracket, index: usize) -> bool {
    propagate_from(bracket, index, &[])
}

/// Overwrite one slot of `matches[index]` and drop its winner, withdrawing whatever the
/// old result had sent downstream. Returns the displaced occupant.
pub(crate) fn replace_slot_in_place(
    bracket: &mut Bracket,
    index: usize,
    slot: Slot,
    participant: Option<Participant>,
) -> Option<Participant> {
    let m = &mut bracket.matches[index];
    let former_loser = m.loser().cloned();
    let former_winner = m.winner.take();
    let displaced = std::mem::replace(m.slot_mut(slot), participant);
    if let Some(winner) = former_winner {
        withdraw(bracket, index, &winner, former_loser.as_ref(), 0);
    }
    displaced
}

/// Auto-win every bye match and propagate each new walkover. Returns the number of
/// matches resolved.
pub(crate) fn resolve_byes_in_place(bracket: &mut Bracket) -> usize {
    let mut resolved = 0;
    // A walkover can place a player opposite a manually assigned bye further on.
    for _ in 0..=bracket.matches.len() {
        let mut pass = 0;
        for index in 0..bracket.matches.len() {
            if apply_bye(&mut bracket.matches[index]) {
                pass += 1;
                propagate_in_place(bracket, index);
            }
        }
        if pass == 0 {
            break;
        }
        resolved += pass;
    }
    resolved
}

/// Bracket with the winner of `changed_id` pushed downstream. Unknown ids are a no-op.
pub fn propagate(bracket: &Bracket, changed_id: &str) -> Bracket {
    let mut out = bracket.clone();
    match out.index_of(changed_id) {
        Some(index) => {
            propagate_in_place(&mut out, index);
        }
        None => log::warn!("Propagate: match {} not found", changed_id),
    }
    out
}

/// Bracket with every bye walkover applied and cascaded.
pub fn resolve_byes(bracket: &Bracket) -> Bracket {
    let mut out = bracket.clone();
    resolve_byes_in_place(&mut out);
    out
}

/// Write every decided winner into its next match, round by round, without
/// overwriting occupied slots. Semifinal losers go to the third-place match.
pub fn advance_all_winners(bracket: &Bracket) -> (Bracket, AdvanceOutcome) {
    let mut out = bracket.clone();
    let mut pending: Vec<usize> = (0..out.matches.len())
        .filter(|&i| out.matches[i].winner.is_some() && out.matches[i].next_match_id.is_some())
        .collect();
    if pending.is_empty() {
        log::info!("Advance all: nothing to advance");
        return (out, AdvanceOutcome::NothingToAdvance);
    }
    pending.sort_by_key(|&i| out.matches[i].round);

    let mut count = 0;
    for index in pending {
        let m = out.matches[index].clone();
        let Some(winner) = m.winner.clone() else {
            continue;
        };

        if let Some(next_idx) = m.next_match_id.as_deref().and_then(|id| out.index_of(id)) {
            let slot = out.advance_slot(index);
            let target = &mut out.matches[next_idx];
            if target.slot(slot).is_none() {
                *target.slot_mut(slot) = Some(winner);
                count += 1;
            }
        }

        if m.round_name == SEMIFINAL {
            let loser = m.loser().filter(|p| p.is_player()).cloned();
            if let (Some(loser), Some(tp)) = (loser, out.third_place_index()) {
                let third = &mut out.matches[tp];
                if third.slot_of(&loser).is_none() {
                    if let Some(slot) = [Slot::Player1, Slot::Player2]
                        .into_iter()
                        .find(|&s| third.slot(s).is_none())
                    {
                        *third.slot_mut(slot) = Some(loser);
                    }
                }
            }
        }
    }

    log::info!("Advance all: {} winner(s) advanced", count);
    (out, AdvanceOutcome::Advanced { count })
}
