// Fielding line for whatever positions a player was in the field at.

use serde::Serialize;

use super::ratio;
use crate::play::{FieldPosition, PlayEvent};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldingStats {
    /// Outs recorded on any play while this player was in the field.
    pub out_played: u32,
    pub putout: u32,
    pub assist: u32,
    pub error: u32,
    pub double_play: u32,
    pub triple_play: u32,
    // Catcher only
    pub passed_ball: u32,
    pub stolen_base: u32,
    pub caught_stealing: u32,
}

impl FieldingStats {
    pub const FEATURE_NAMES: [&'static str; 11] = [
        "innings_at_position",
        "putout",
        "assist",
        "error",
        "total_chance",
        "double_play",
        "triple_play",
        "passed_ball",
        "stolen_base",
        "caught_stealing",
        "fielding_percentage",
    ];

    /// Fold one play for the player stationed at `position`.
    pub fn apply(&mut self, event: &PlayEvent, position: FieldPosition) {
        let count = |list: &[FieldPosition]| list.iter().filter(|p| **p == position).count() as u32;

        self.out_played += event.num_out;
        let putouts = count(event.putouts.as_slice());
        let assists = count(event.assists.as_slice());
        self.putout += putouts;
        self.assist += assists;
        self.error += count(event.errors.as_slice());

        let involved = putouts + assists > 0;
        self.double_play += u32::from(involved && event.modifiers.double_play);
        self.triple_play += u32::from(involved && event.modifiers.triple_play);

        if position == FieldPosition::Catcher {
            self.passed_ball += u32::from(event.passed_ball);
            self.stolen_base += event.stolen_bases.len() as u32;
            self.caught_stealing += event.caught_stealing.len() as u32;
        }
    }

    pub fn merge(&mut self, other: &FieldingStats) {
        self.out_played += other.out_played;
        self.putout += other.putout;
        self.assist += other.assist;
        self.error += other.error;
        self.double_play += other.double_play;
        self.triple_play += other.triple_play;
        self.passed_ball += other.passed_ball;
        self.stolen_base += other.stolen_base;
        self.caught_stealing += other.caught_stealing;
    }

    pub fn innings_at_position(&self) -> f64 {
        self.out_played as f64 / 3.0
    }

    pub fn total_chance(&self) -> u32 {
        self.putout + self.assist + self.error
    }

    /// (PO + A) / TC
    pub fn fielding_percentage(&self) -> f64 {
        ratio((self.putout + self.assist) as f64, self.total_chance() as f64)
    }

    pub fn features(&self) -> [f64; 11] {
        [
            self.innings_at_position(),
            self.putout as f64,
            self.assist as f64,
            self.error as f64,
            self.total_chance() as f64,
            self.double_play as f64,
            self.triple_play as f64,
            self.passed_ball as f64,
            self.stolen_base as f64,
            self.caught_stealing as f64,
            self.fielding_percentage(),
        ]
    }
}
