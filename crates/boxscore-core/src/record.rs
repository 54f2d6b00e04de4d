// One event record from a game log: who was where when a play happened.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::play::{Base, FieldPosition};

/// Opaque player key as it appears in the event logs (e.g. `troum001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        PlayerId::new(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which team is batting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Visitor,
    Home,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Visitor => Side::Home,
            Side::Home => Side::Visitor,
        }
    }
}

/// The nine defenders on the field for a play, indexed by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defense([PlayerId; 9]);

impl Defense {
    /// Players in scorer order: pitcher, catcher, first base, ..., right field.
    pub fn new(players: [PlayerId; 9]) -> Self {
        Defense(players)
    }

    pub fn at(&self, position: FieldPosition) -> &PlayerId {
        &self.0[position.index()]
    }

    pub fn pitcher(&self) -> &PlayerId {
        self.at(FieldPosition::Pitcher)
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.0.contains(player)
    }

    /// (position, player) pairs in scorer order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldPosition, &PlayerId)> {
        FieldPosition::ALL.into_iter().zip(self.0.iter())
    }
}

/// A single play as recorded in the game log, in game order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub game_id: String,
    pub event_in_game: u32,
    pub visiting_team: String,
    pub home_team: String,
    pub batting_side: Side,
    pub batter: PlayerId,
    pub defense: Defense,
    /// Runners on first, second and third when the play started.
    pub runners: [Option<PlayerId>; 3],
    /// Score when the play started, when the log carries it.
    pub visitor_score: Option<u32>,
    pub home_score: Option<u32>,
    pub play_code: String,
    pub advance_code: String,
}

impl PlayRecord {
    pub fn pitcher(&self) -> &PlayerId {
        self.defense.pitcher()
    }

    /// Runners paired with the base they started on.
    pub fn runners_on_base(&self) -> impl Iterator<Item = (Base, &PlayerId)> {
        [Base::First, Base::Second, Base::Third]
            .into_iter()
            .zip(self.runners.iter())
            .filter_map(|(base, runner)| runner.as_ref().map(|id| (base, id)))
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Visitor => &self.visiting_team,
            Side::Home => &self.home_team,
        }
    }
}
