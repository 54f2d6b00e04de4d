// Lineup tracking: starting defense, batting order, designated hitter, and a
// per-team bullpen window that carries over from game to game.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::record::{Defense, PlayRecord, PlayerId, Side};

/// Defensive slots at the front of every team's layout.
pub const DEFENSE_SLOTS: usize = 9;

/// Batting order length.
pub const MAX_BATTERS: usize = 9;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineupError {
    #[error("roster layout has {actual} slots, expected {expected}")]
    RosterWidth { expected: usize, actual: usize },
}

/// Which optional slots a roster layout carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupConfig {
    pub use_dh: bool,
    /// Size of the bullpen window, or `None` to leave bullpens out.
    pub bullpen_size: Option<usize>,
}

impl LineupConfig {
    /// Slots per team: nine fielders, the DH, then the bullpen window.
    pub fn team_width(&self) -> usize {
        DEFENSE_SLOTS + usize::from(self.use_dh) + self.bullpen_size.unwrap_or(0)
    }

    /// Slots for both teams together.
    pub fn roster_width(&self) -> usize {
        2 * self.team_width()
    }
}

/// One game's roster layout, visitor first then home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineup {
    slots: Vec<Option<PlayerId>>,
}

impl Lineup {
    pub fn slots(&self) -> &[Option<PlayerId>] {
        &self.slots
    }

    /// Number of slots with a player in them.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Player id to slot offset. A player listed twice (a starter who is
    /// also in the bullpen window) keeps the earlier slot.
    pub fn assignments(&self) -> HashMap<PlayerId, usize> {
        let mut map = HashMap::new();
        for (slot, player) in self.slots.iter().enumerate() {
            if let Some(player) = player {
                map.entry(player.clone()).or_insert(slot);
            }
        }
        map
    }
}

#[derive(Debug, Default)]
struct TeamLineup {
    team: Option<String>,
    defense: Option<Defense>,
    batters: Vec<PlayerId>,
    pitchers: Vec<PlayerId>,
}

impl TeamLineup {
    /// First batter who is not one of the starting fielders. A team whose
    /// pitcher hit for himself has none.
    fn designated_hitter(&self) -> Option<&PlayerId> {
        let defense = self.defense.as_ref()?;
        self.batters.iter().find(|batter| !defense.contains(batter))
    }

    fn relief_pitchers(&self) -> impl Iterator<Item = &PlayerId> {
        let starter = self.defense.as_ref().map(Defense::pitcher);
        self.pitchers
            .iter()
            .filter(move |pitcher| Some(*pitcher) != starter)
    }
}

/// Watches one game at a time and hands out roster layouts. Bullpen windows
/// persist across games, keyed by team code.
#[derive(Debug)]
pub struct LineupTracker {
    config: LineupConfig,
    visitor: TeamLineup,
    home: TeamLineup,
    bullpens: HashMap<String, VecDeque<PlayerId>>,
}

impl LineupTracker {
    pub fn new(config: LineupConfig) -> Self {
        LineupTracker {
            config,
            visitor: TeamLineup::default(),
            home: TeamLineup::default(),
            bullpens: HashMap::new(),
        }
    }

    pub fn config(&self) -> LineupConfig {
        self.config
    }

    fn team(&self, side: Side) -> &TeamLineup {
        match side {
            Side::Visitor => &self.visitor,
            Side::Home => &self.home,
        }
    }

    fn team_mut(&mut self, side: Side) -> &mut TeamLineup {
        match side {
            Side::Visitor => &mut self.visitor,
            Side::Home => &mut self.home,
        }
    }

    /// Record who batted and who was in the field on this play.
    pub fn observe(&mut self, record: &PlayRecord) {
        let batting_side = record.batting_side;
        let batting = self.team_mut(batting_side);
        if batting.team.is_none() {
            batting.team = Some(record.team(batting_side).to_string());
        }
        if batting.batters.len() < MAX_BATTERS && !batting.batters.contains(&record.batter) {
            batting.batters.push(record.batter.clone());
        }

        let fielding_side = batting_side.opponent();
        let fielding = self.team_mut(fielding_side);
        if fielding.team.is_none() {
            fielding.team = Some(record.team(fielding_side).to_string());
        }
        if fielding.defense.is_none() {
            fielding.defense = Some(record.defense.clone());
        }
        let pitcher = record.pitcher();
        if !fielding.pitchers.contains(pitcher) {
            fielding.pitchers.push(pitcher.clone());
        }
    }

    /// The team's bullpen window, most recent reliever first, padded with
    /// `None` up to the configured size. Empty when bullpens are off.
    pub fn bullpen(&self, team: &str) -> Vec<Option<PlayerId>> {
        let Some(size) = self.config.bullpen_size else {
            return Vec::new();
        };
        let mut window: Vec<Option<PlayerId>> = self
            .bullpens
            .get(team)
            .map(|pen| pen.iter().rev().cloned().map(Some).collect())
            .unwrap_or_default();
        window.resize(size, None);
        window
    }

    /// Finish the current game: build its layout from the bullpen windows as
    /// they stood before this game, then fold this game's relievers into the
    /// windows and reset for the next game.
    pub fn fetch(&mut self) -> Result<Lineup, LineupError> {
        let mut slots = Vec::with_capacity(self.config.roster_width());
        for side in [Side::Visitor, Side::Home] {
            self.push_team_slots(side, &mut slots);
        }

        let expected = self.config.roster_width();
        if slots.len() != expected {
            self.discard_game();
            return Err(LineupError::RosterWidth {
                expected,
                actual: slots.len(),
            });
        }

        if let Some(size) = self.config.bullpen_size {
            for side in [Side::Visitor, Side::Home] {
                self.update_bullpen(side, size);
            }
        }
        self.discard_game();

        Ok(Lineup { slots })
    }

    /// Drop everything observed for the current game. Bullpen windows are
    /// kept.
    pub fn discard_game(&mut self) {
        self.visitor = TeamLineup::default();
        self.home = TeamLineup::default();
    }

    fn push_team_slots(&self, side: Side, slots: &mut Vec<Option<PlayerId>>) {
        let team = self.team(side);
        match &team.defense {
            Some(defense) => slots.extend(defense.iter().map(|(_, player)| Some(player.clone()))),
            None => slots.extend(std::iter::repeat(None).take(DEFENSE_SLOTS)),
        }
        if self.config.use_dh {
            slots.push(team.designated_hitter().cloned());
        }
        if let Some(size) = self.config.bullpen_size {
            match team.team.as_deref() {
                Some(code) => slots.extend(self.bullpen(code)),
                None => slots.extend(std::iter::repeat(None).take(size)),
            }
        }
    }

    fn update_bullpen(&mut self, side: Side, size: usize) {
        let team = self.team(side);
        let Some(code) = team.team.clone() else {
            return;
        };
        let relievers: Vec<PlayerId> = team.relief_pitchers().cloned().collect();
        let pen = self.bullpens.entry(code).or_default();
        for reliever in relievers {
            // A returning reliever moves to the most recent end.
            pen.retain(|p| *p != reliever);
            pen.push_back(reliever);
            while pen.len() > size {
                pen.pop_front();
            }
        }
        debug!(side = ?side, bullpen = pen.len(), "updated bullpen window");
    }
}
