//! Final standings from the final and the third-place match.

use crate::models::{Bracket, Player};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub place: u32,
    pub player: Player,
}

/// 1st and 2nd from the final, 3rd from the third-place match. Only places that are
/// already decided appear.
pub fn final_rankings(bracket: &Bracket) -> Vec<Ranking> {
    let mut rankings = Vec::new();

    if let Some(m) = bracket.final_match().filter(|m| m.winner.is_some()) {
        let placed = [m.winner.as_ref(), m.loser()];
        for (place, participant) in (1..).zip(placed) {
            if let Some(player) = participant.and_then(|p| p.as_player()) {
                rankings.push(Ranking {
                    place,
                    player: player.clone(),
                });
            }
        }
    }

    if let Some(player) = bracket
        .third_place_match()
        .and_then(|m| m.winner.as_ref())
        .and_then(|w| w.as_player())
    {
        rankings.push(Ranking {
            place: 3,
            player: player.clone(),
        });
    }

    rankings
}
