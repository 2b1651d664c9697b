//! Integration tests for bracket generation: structure, seeding, byes, third place.

use knockout_bracket_web::logic::{bye_count, round_count, round_name};
use knockout_bracket_web::{
    generate_empty_bracket, generate_seeded_bracket, BracketError, Participant, QualifiedPlayer,
    THIRD_PLACE_ID,
};

fn qualified(n: usize) -> Vec<QualifiedPlayer> {
    (1..=n)
        .map(|i| QualifiedPlayer::new(format!("p{i}"), format!("Player {i}")).with_seed(i as u32))
        .collect()
}

fn id_of(p: Option<&Participant>) -> Option<&str> {
    p.map(|p| p.id())
}

#[test]
fn generate_requires_at_least_4_players() {
    assert_eq!(
        generate_seeded_bracket(&qualified(3)),
        Err(BracketError::NotEnoughPlayers { count: 3 })
    );
    assert!(matches!(
        generate_empty_bracket(2),
        Err(BracketError::NotEnoughPlayers { count: 2 })
    ));
}

#[test]
fn round_and_bye_counts_follow_next_power_of_two() {
    for n in 4..=40usize {
        let size = n.next_power_of_two();
        let b = generate_seeded_bracket(&qualified(n)).unwrap();
        let rounds = b.matches.iter().map(|m| m.round).max().unwrap();
        assert_eq!(rounds, size.trailing_zeros(), "rounds for {n}");
        assert_eq!(rounds, round_count(n));
        assert_eq!(b.bye_count(), size - n, "byes for {n}");
        assert_eq!(bye_count(n), size - n);
        // size - 1 regular matches plus the third-place match
        assert_eq!(b.matches.len(), size);
    }
}

#[test]
fn five_players_get_three_byes_and_three_rounds() {
    let b = generate_seeded_bracket(&qualified(5)).unwrap();
    assert_eq!(b.bye_count(), 3);
    assert_eq!(b.final_round(), Some(3));

    for (i, seed) in [(0, "p1"), (1, "p2"), (2, "p3")] {
        let m = b.get(&format!("match_1_{i}")).unwrap();
        assert_eq!(id_of(m.player1.as_ref()), Some(seed));
        assert_eq!(m.player2, Some(Participant::Bye));
        assert_eq!(id_of(m.winner.as_ref()), Some(seed));
        assert_eq!(m.player1_score.as_deref(), Some("3"));
        assert_eq!(m.player2_score.as_deref(), Some("0"));
    }
    let last = b.get("match_1_3").unwrap();
    assert_eq!(id_of(last.player1.as_ref()), Some("p4"));
    assert_eq!(id_of(last.player2.as_ref()), Some("p5"));
    assert!(last.winner.is_none());

    // Walkovers are already advanced.
    let q0 = b.get("match_2_0").unwrap();
    assert_eq!(id_of(q0.player1.as_ref()), Some("p1"));
    assert_eq!(id_of(q0.player2.as_ref()), Some("p2"));
    let q1 = b.get("match_2_1").unwrap();
    assert_eq!(id_of(q1.player1.as_ref()), Some("p3"));
    assert!(q1.player2.is_none());
}

#[test]
fn seeding_uses_seed_then_group_position() {
    let players = vec![
        QualifiedPlayer::new("d", "D").with_position(4),
        QualifiedPlayer::new("a", "A").with_seed(1),
        QualifiedPlayer::new("c", "C").with_position(1).with_seed(3),
        QualifiedPlayer::new("b", "B").with_seed(2),
    ];
    let b = generate_seeded_bracket(&players).unwrap();
    let m0 = b.get("match_1_0").unwrap();
    let m1 = b.get("match_1_1").unwrap();
    assert_eq!(id_of(m0.player1.as_ref()), Some("a"));
    assert_eq!(id_of(m0.player2.as_ref()), Some("b"));
    assert_eq!(id_of(m1.player1.as_ref()), Some("c"));
    assert_eq!(id_of(m1.player2.as_ref()), Some("d"));
}

#[test]
fn next_match_links_and_third_place() {
    let b = generate_empty_bracket(8).unwrap();
    for i in 0..4 {
        let m = b.get(&format!("match_1_{i}")).unwrap();
        assert_eq!(m.next_match_id.as_deref(), Some(format!("match_2_{}", i / 2).as_str()));
    }
    assert_eq!(
        b.get("match_2_1").unwrap().next_match_id.as_deref(),
        Some("match_3_0")
    );
    let final_match = b.final_match().unwrap();
    assert_eq!(final_match.id, "match_3_0");
    assert!(final_match.next_match_id.is_none());

    let third = b.get(THIRD_PLACE_ID).unwrap();
    assert_eq!(third.round, 3);
    assert!(third.next_match_id.is_none());
    assert_eq!(b.matches.iter().filter(|m| m.is_third_place()).count(), 1);
}

#[test]
fn empty_skeleton_has_no_players() {
    let b = generate_empty_bracket(6).unwrap();
    assert_eq!(b.matches.len(), 8);
    assert!(b.matches.iter().all(|m| m.player1.is_none() && m.player2.is_none()));
    assert!(b.matches.iter().all(|m| m.winner.is_none()));
}

#[test]
fn matches_are_ordered_by_round_then_layout() {
    let b = generate_empty_bracket(16).unwrap();
    let keys: Vec<_> = b.matches.iter().map(|m| (m.round, m.position.y)).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(b.matches.last().unwrap().id, THIRD_PLACE_ID);
}

#[test]
fn round_names_by_match_count() {
    assert_eq!(round_name(1), "Final");
    assert_eq!(round_name(2), "Semifinal");
    assert_eq!(round_name(4), "Quarterfinal");
    assert_eq!(round_name(8), "1/8-final");
    assert_eq!(round_name(16), "1/16-final");
    assert_eq!(round_name(32), "1/64-final");
    assert_eq!(round_name(3), "3 matches");

    let b = generate_empty_bracket(8).unwrap();
    assert_eq!(b.get("match_1_0").unwrap().round_name, "Quarterfinal");
    assert_eq!(b.get("match_2_0").unwrap().round_name, "Semifinal");
    assert_eq!(b.get("match_3_0").unwrap().round_name, "Final");
}
