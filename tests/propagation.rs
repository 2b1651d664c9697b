//! Integration tests for winner propagation, the third-place route, and bulk advance.

use knockout_bracket_web::{
    advance_all_winners, generate_empty_bracket, generate_seeded_bracket, propagate,
    set_manual_winner, set_score, AdvanceOutcome, Bracket, Participant, QualifiedPlayer, Slot,
    THIRD_PLACE_ID,
};

fn seeded(n: usize) -> Bracket {
    let players: Vec<QualifiedPlayer> = (1..=n)
        .map(|i| QualifiedPlayer::new(format!("s{i}"), format!("Seed {i}")).with_seed(i as u32))
        .collect();
    generate_seeded_bracket(&players).unwrap()
}

fn slot_id<'a>(b: &'a Bracket, match_id: &str, slot: Slot) -> Option<&'a str> {
    b.get(match_id).unwrap().slot(slot).map(|p| p.id())
}

fn winner_id<'a>(b: &'a Bracket, match_id: &str) -> Option<&'a str> {
    b.get(match_id).unwrap().winner.as_ref().map(|w| w.id())
}

fn assert_winners_consistent(b: &Bracket) {
    for m in &b.matches {
        if let Some(w) = &m.winner {
            assert!(m.slot_of(w).is_some(), "dangling winner in {}", m.id);
        }
    }
}

#[test]
fn winners_land_by_ordinal() {
    let b = seeded(8);
    let b = set_manual_winner(&b, "match_1_0", "s2").unwrap();
    let b = set_manual_winner(&b, "match_1_1", "s3").unwrap();
    let b = set_manual_winner(&b, "match_1_3", "s8").unwrap();
    assert_eq!(slot_id(&b, "match_2_0", Slot::Player1), Some("s2"));
    assert_eq!(slot_id(&b, "match_2_0", Slot::Player2), Some("s3"));
    assert_eq!(slot_id(&b, "match_2_1", Slot::Player1), None);
    assert_eq!(slot_id(&b, "match_2_1", Slot::Player2), Some("s8"));
}

#[test]
fn semifinal_loser_goes_to_third_place() {
    let b = seeded(4);
    let b = set_score(&b, "match_1_0", Slot::Player1, "3").unwrap();
    let b = set_score(&b, "match_1_0", Slot::Player2, "1").unwrap();
    assert_eq!(winner_id(&b, "match_1_0"), Some("s1"));
    assert_eq!(slot_id(&b, "match_2_0", Slot::Player1), Some("s1"));
    assert_eq!(slot_id(&b, THIRD_PLACE_ID, Slot::Player1), Some("s2"));

    let b = set_manual_winner(&b, "match_1_1", "s4").unwrap();
    assert_eq!(slot_id(&b, "match_2_0", Slot::Player2), Some("s4"));
    assert_eq!(slot_id(&b, THIRD_PLACE_ID, Slot::Player2), Some("s3"));
}

#[test]
fn changed_result_replaces_stale_participant_downstream() {
    let b = seeded(4);
    let b = set_manual_winner(&b, "match_1_0", "s1").unwrap();
    let b = set_manual_winner(&b, "match_1_1", "s3").unwrap();
    let b = set_score(&b, "match_2_0", Slot::Player1, "3").unwrap();
    assert_eq!(winner_id(&b, "match_2_0"), Some("s1"));

    let b = set_manual_winner(&b, "match_1_0", "s2").unwrap();
    let final_match = b.get("match_2_0").unwrap();
    assert_eq!(slot_id(&b, "match_2_0", Slot::Player1), Some("s2"));
    assert!(final_match.winner.is_none());
    assert!(final_match.player1_score.is_none());
    assert!(final_match.player2_score.is_none());
    // s2 is no longer a loser; s1 takes the third-place slot instead.
    assert_eq!(slot_id(&b, THIRD_PLACE_ID, Slot::Player1), Some("s1"));
    assert_eq!(slot_id(&b, THIRD_PLACE_ID, Slot::Player2), Some("s4"));
    assert_winners_consistent(&b);
}

#[test]
fn invalidation_cascades_through_later_rounds() {
    let mut b = seeded(8);
    for (m, w) in [("match_1_0", "s1"), ("match_1_1", "s3"), ("match_1_2", "s5"), ("match_1_3", "s7")] {
        b = set_manual_winner(&b, m, w).unwrap();
    }
    b = set_manual_winner(&b, "match_2_0", "s1").unwrap();
    b = set_manual_winner(&b, "match_2_1", "s5").unwrap();
    assert_eq!(slot_id(&b, "match_3_0", Slot::Player1), Some("s1"));
    assert_eq!(slot_id(&b, THIRD_PLACE_ID, Slot::Player1), Some("s3"));
    assert_eq!(slot_id(&b, THIRD_PLACE_ID, Slot::Player2), Some("s7"));

    let b = set_manual_winner(&b, "match_1_0", "s2").unwrap();
    assert_eq!(slot_id(&b, "match_2_0", Slot::Player1), Some("s2"));
    assert_eq!(winner_id(&b, "match_2_0"), None);
    assert_eq!(slot_id(&b, "match_3_0", Slot::Player1), None);
    assert_eq!(slot_id(&b, "match_3_0", Slot::Player2), Some("s5"));
    assert_eq!(slot_id(&b, THIRD_PLACE_ID, Slot::Player1), None);
    assert_eq!(slot_id(&b, THIRD_PLACE_ID, Slot::Player2), Some("s7"));
    assert_winners_consistent(&b);
}

#[test]
fn propagate_is_idempotent() {
    let mut b = seeded(8);
    b.matches[0].winner = b.matches[0].player1.clone();
    let once = propagate(&b, "match_1_0");
    let twice = propagate(&once, "match_1_0");
    assert_eq!(once, twice);
    assert_eq!(slot_id(&once, "match_2_0", Slot::Player1), Some("s1"));

    // A settled downstream result survives re-propagation.
    let settled = set_manual_winner(&once, "match_1_1", "s3").unwrap();
    let settled = set_manual_winner(&settled, "match_2_0", "s1").unwrap();
    assert_eq!(propagate(&settled, "match_1_0"), settled);
    assert_eq!(propagate(&settled, "match_2_0"), settled);
}

#[test]
fn propagate_skips_missing_targets() {
    let mut b = seeded(4);
    b.matches[0].winner = b.matches[0].player1.clone();
    b.matches[0].next_match_id = Some("nowhere".to_string());
    let out = propagate(&b, "match_1_0");
    assert_eq!(out.get("match_2_0").unwrap().player1, None);
    assert_eq!(propagate(&b, "no_such_match"), b);
}

#[test]
fn advance_all_fills_empty_slots_only() {
    let mut b = seeded(8);
    let y = Participant::player("y", "Someone Else");
    let i0 = b.index_of("match_1_0").unwrap();
    let i1 = b.index_of("match_1_1").unwrap();
    let q = b.index_of("match_2_0").unwrap();
    b.matches[i0].winner = b.matches[i0].player1.clone();
    b.matches[i1].winner = b.matches[i1].player2.clone();
    b.matches[q].player1 = Some(y.clone());

    let (out, outcome) = advance_all_winners(&b);
    assert_eq!(outcome, AdvanceOutcome::Advanced { count: 1 });
    assert_eq!(out.matches[q].player1, Some(y));
    assert_eq!(slot_id(&out, "match_2_0", Slot::Player2), Some("s4"));
}

#[test]
fn advance_all_reports_nothing_to_advance() {
    let b = generate_empty_bracket(8).unwrap();
    let (out, outcome) = advance_all_winners(&b);
    assert_eq!(outcome, AdvanceOutcome::NothingToAdvance);
    assert_eq!(out, b);
}

#[test]
fn advance_all_moves_rounds_in_order_and_routes_losers() {
    let mut b = seeded(4);
    for i in 0..2 {
        b.matches[i].winner = b.matches[i].player1.clone();
    }
    let (out, outcome) = advance_all_winners(&b);
    assert_eq!(outcome, AdvanceOutcome::Advanced { count: 2 });
    assert_eq!(slot_id(&out, "match_2_0", Slot::Player1), Some("s1"));
    assert_eq!(slot_id(&out, "match_2_0", Slot::Player2), Some("s3"));
    assert_eq!(slot_id(&out, THIRD_PLACE_ID, Slot::Player1), Some("s2"));
    assert_eq!(slot_id(&out, THIRD_PLACE_ID, Slot::Player2), Some("s4"));

    // Second pass: slots already filled, nothing counted.
    let (again, outcome) = advance_all_winners(&out);
    assert_eq!(outcome, AdvanceOutcome::Advanced { count: 0 });
    assert_eq!(again, out);
}
