//! Match resolution: winner from scores, from a manual pick, or from a bye.

use crate::models::{BracketMatch, Participant, ScoreRule, Slot};

/// Score a side must reach (and exceed the opponent by) to win outright.
pub const WIN_TARGET: u32 = 3;

/// Normalize a raw score entry: blank or non-numeric input means "not entered",
/// negative numbers clamp to 0.
pub fn normalize_score(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: i64 = trimmed.parse().ok()?;
    Some(value.clamp(0, i64::from(u32::MAX)).to_string())
}

fn parse_score(score: Option<&str>) -> Option<u32> {
    normalize_score(score?)?.parse().ok()
}

/// Which slot the entered scores make the winner, if any.
///
/// 1. A side that reached [`WIN_TARGET`] and strictly leads wins (a missing opposing score counts as 0).
/// 2. Under [`ScoreRule::TargetThenDifference`], two entered scores that differ decide as well.
/// 3. A slot without a real player never wins.
pub fn winning_slot(m: &BracketMatch, rule: ScoreRule) -> Option<Slot> {
    let s1 = parse_score(m.score(Slot::Player1));
    let s2 = parse_score(m.score(Slot::Player2));
    let (a, b) = (s1.unwrap_or(0), s2.unwrap_or(0));

    let by_target = if a >= WIN_TARGET && a > b {
        Some(Slot::Player1)
    } else if b >= WIN_TARGET && b > a {
        Some(Slot::Player2)
    } else {
        None
    };

    let slot = by_target.or_else(|| match (rule, s1, s2) {
        (ScoreRule::TargetThenDifference, Some(a), Some(b)) if a != b => {
            Some(if a > b { Slot::Player1 } else { Slot::Player2 })
        }
        _ => None,
    })?;

    m.slot(slot).filter(|p| p.is_player()).map(|_| slot)
}

/// Re-decide the winner from scores. Any previous winner is dropped first.
pub(crate) fn apply_scores(m: &mut BracketMatch, rule: ScoreRule) {
    m.winner = None;
    if let Some(slot) = winning_slot(m, rule) {
        m.winner = m.slot(slot).cloned();
    }
}

/// Set the winner to the real player with `player_id`; anything else clears it.
pub(crate) fn apply_manual_pick(m: &mut BracketMatch, player_id: &str) {
    let picked = m
        .participants()
        .into_iter()
        .find(|p| p.is_player() && p.id() == player_id)
        .cloned();
    m.winner = picked;
}

/// A real player facing a bye wins `WIN_TARGET`-0. Returns true when the match changed.
pub(crate) fn apply_bye(m: &mut BracketMatch) -> bool {
    if m.is_third_place() {
        return false;
    }
    let (winner_slot, winner) = match (&m.player1, &m.player2) {
        (Some(p @ Participant::Player(_)), Some(Participant::Bye)) => (Slot::Player1, p.clone()),
        (Some(Participant::Bye), Some(p @ Participant::Player(_))) => (Slot::Player2, p.clone()),
        _ => return false,
    };
    let win = WIN_TARGET.to_string();
    let already = m.winner.as_ref().is_some_and(|w| w.same_as(&winner))
        && m.score(winner_slot) == Some(win.as_str())
        && m.score(winner_slot.other()) == Some("0");
    if already {
        return false;
    }
    log::debug!("Bye in {}: {} advances", m.id, winner.id());
    *m.score_mut(winner_slot) = Some(win);
    *m.score_mut(winner_slot.other()) = Some("0".to_string());
    m.winner = Some(winner);
    true
}

/// Match with its winner decided from the entered scores under the default rule.
pub fn resolve_from_scores(m: &BracketMatch) -> BracketMatch {
    resolve_with_rule(m, ScoreRule::default())
}

pub fn resolve_with_rule(m: &BracketMatch, rule: ScoreRule) -> BracketMatch {
    let mut out = m.clone();
    apply_scores(&mut out, rule);
    out
}

/// Match with the winner set by hand; scores are ignored.
pub fn resolve_from_manual_pick(m: &BracketMatch, player_id: &str) -> BracketMatch {
    let mut out = m.clone();
    apply_manual_pick(&mut out, player_id);
    out
}

/// Match with a bye walkover applied (unchanged when it is not a bye match).
pub fn resolve_bye(m: &BracketMatch) -> BracketMatch {
    let mut out = m.clone();
    apply_bye(&mut out);
    out
}
