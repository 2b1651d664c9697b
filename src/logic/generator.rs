//! Bracket generation: round structure, seeding, byes, and the third-place match.

use crate::logic::propagation::resolve_byes_in_place;
use crate::models::{
    Bracket, BracketError, BracketMatch, Participant, Position, QualifiedPlayer, THIRD_PLACE_ID,
    THIRD_PLACE_ROUND_NAME,
};
use serde::{Deserialize, Serialize};

/// Smallest field a knockout bracket is generated for.
pub const MIN_PLAYERS: usize = 4;

pub const FINAL: &str = "Final";
pub const SEMIFINAL: &str = "Semifinal";
pub const QUARTERFINAL: &str = "Quarterfinal";

const ROUND_SPACING_X: i32 = 300;
const MATCH_SPACING_Y: i32 = 120;

/// How the first round is filled.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Qualified players by seed, byes opposite the top seeds.
    #[default]
    Seeded,
    /// Same structure with every slot left open for manual assignment.
    Empty,
}

/// Label of a round, from how many matches it has.
pub fn round_name(match_count: usize) -> String {
    match match_count {
        1 => FINAL.to_string(),
        2 => SEMIFINAL.to_string(),
        4 => QUARTERFINAL.to_string(),
        8 => "1/8-final".to_string(),
        16 => "1/16-final".to_string(),
        n if n.is_power_of_two() => format!("1/{}-final", 2 * n),
        n => format!("{} matches", n),
    }
}

/// Slots in the first round: the next power of two.
pub fn bracket_size(player_count: usize) -> usize {
    player_count.next_power_of_two()
}

pub fn round_count(player_count: usize) -> u32 {
    bracket_size(player_count).trailing_zeros()
}

pub fn bye_count(player_count: usize) -> usize {
    bracket_size(player_count) - player_count
}

pub fn match_id(round: u32, index: usize) -> String {
    format!("match_{}_{}", round, index)
}

/// Vertical position: first-round matches stack evenly, later ones sit between their feeders.
/// Coordinates saturate at the `i32` bounds for absurdly large fields.
fn layout(round: u32, index: usize) -> Position {
    let span = 1i64
        .checked_shl(round.saturating_sub(1))
        .filter(|s| *s > 0)
        .unwrap_or(i64::MAX);
    let spacing = i64::from(MATCH_SPACING_Y);
    let index = i64::try_from(index).unwrap_or(i64::MAX);
    let y = spacing
        .saturating_mul(span)
        .saturating_mul(index)
        .saturating_add(spacing.saturating_mul(span - 1) / 2);
    let x = (i64::from(round) - 1).saturating_mul(i64::from(ROUND_SPACING_X));
    Position {
        x: clamp_coord(x),
        y: clamp_coord(y),
    }
}

fn clamp_coord(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn build_skeleton(player_count: usize) -> Result<Vec<BracketMatch>, BracketError> {
    if player_count < MIN_PLAYERS {
        return Err(BracketError::NotEnoughPlayers {
            count: player_count,
        });
    }
    let size = bracket_size(player_count);
    let rounds = round_count(player_count);

    let mut matches = Vec::with_capacity(size);
    for round in 1..=rounds {
        let count = size >> round;
        let name = round_name(count);
        for index in 0..count {
            let mut m = BracketMatch::new(match_id(round, index), round, name.clone());
            m.position = layout(round, index);
            if round < rounds {
                m.next_match_id = Some(match_id(round + 1, index / 2));
            }
            matches.push(m);
        }
    }

    if rounds >= 2 {
        let final_pos = layout(rounds, 0);
        let mut third = BracketMatch::new(THIRD_PLACE_ID, rounds, THIRD_PLACE_ROUND_NAME);
        third.position = Position {
            x: final_pos.x,
            y: final_pos.y.saturating_add(2 * MATCH_SPACING_Y),
        };
        matches.push(third);
    }

    matches.sort_by_key(|m| (m.round, m.position.y));
    Ok(matches)
}

/// Bracket structure for `player_count` players with every slot open.
pub fn generate_empty_bracket(player_count: usize) -> Result<Bracket, BracketError> {
    let matches = build_skeleton(player_count)?;
    log::info!(
        "Generated empty bracket: {} players, {} rounds",
        player_count,
        round_count(player_count)
    );
    Ok(Bracket::new(matches))
}

/// Bracket seeded from qualified players.
///
/// Players are ordered by seed (falling back to group position). The first `bye_count`
/// first-round matches pair one player with a bye; the rest get two players each.
/// Bye walkovers are resolved and advanced straight away.
pub fn generate_seeded_bracket(players: &[QualifiedPlayer]) -> Result<Bracket, BracketError> {
    let mut matches = build_skeleton(players.len())?;
    let byes = bye_count(players.len());

    let mut seeded: Vec<&QualifiedPlayer> = players.iter().collect();
    seeded.sort_by_key(|p| p.seeding_key());
    let mut next_player = seeded.into_iter().map(QualifiedPlayer::to_participant);

    for (index, m) in matches.iter_mut().filter(|m| m.round == 1).enumerate() {
        m.player1 = next_player.next();
        m.player2 = if index < byes {
            Some(Participant::Bye)
        } else {
            next_player.next()
        };
    }

    let mut bracket = Bracket::new(matches);
    let walkovers = resolve_byes_in_place(&mut bracket);
    log::info!(
        "Generated seeded bracket: {} players, {} rounds, {} byes ({} walkovers)",
        players.len(),
        round_count(players.len()),
        byes,
        walkovers
    );
    Ok(bracket)
}

pub fn generate_bracket(
    players: &[QualifiedPlayer],
    mode: GenerationMode,
) -> Result<Bracket, BracketError> {
    match mode {
        GenerationMode::Seeded => generate_seeded_bracket(players),
        GenerationMode::Empty => generate_empty_bracket(players.len()),
    }
}
