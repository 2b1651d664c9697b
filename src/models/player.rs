//! Player, Participant (real player or placeholder), and QualifiedPlayer.

use serde::{Deserialize, Serialize};

/// Identifier of a player, as handed over by the registration system.
pub type PlayerId = String;

/// Reserved id of the automatic-advance placeholder.
pub const BYE_ID: &str = "bye";

/// Reserved id of the random-assignment placeholder.
pub const LUCKY_DRAW_ID: &str = "lucky_draw";

/// A real player as referenced from inside a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Whatever occupies a player slot of a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Participant {
    Player(Player),
    /// Walkover opponent; the other side advances without playing.
    Bye,
    /// Slot to be filled by a random qualified player later.
    LuckyDraw,
}

impl Participant {
    pub fn player(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Participant::Player(Player::new(id, name))
    }

    /// Player id, or the reserved id for placeholders.
    pub fn id(&self) -> &str {
        match self {
            Participant::Player(p) => p.id.as_str(),
            Participant::Bye => BYE_ID,
            Participant::LuckyDraw => LUCKY_DRAW_ID,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Participant::Player(_))
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Participant::Bye)
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Participant::Player(p) => Some(p),
            _ => None,
        }
    }

    /// Identity comparison: two participants are the same when their ids match.
    pub fn same_as(&self, other: &Participant) -> bool {
        self.id() == other.id()
    }
}

impl From<Player> for Participant {
    fn from(p: Player) -> Self {
        Participant::Player(p)
    }
}

/// A player who qualified for the knockout stage (input from registration).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct QualifiedPlayer {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub group_name: Option<String>,
    /// Explicit seed (1 = top seed).
    #[serde(default)]
    pub seed: Option<u32>,
    /// Finishing position in the group stage; seeding fallback when `seed` is absent.
    #[serde(default)]
    pub position: Option<u32>,
}

impl QualifiedPlayer {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group_name: None,
            seed: None,
            position: None,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    /// Ranking key used for seeding; players with neither seed nor position go last.
    pub fn seeding_key(&self) -> u32 {
        self.seed.or(self.position).unwrap_or(u32::MAX)
    }

    pub fn to_participant(&self) -> Participant {
        Participant::player(self.id.clone(), self.name.clone())
    }
}
