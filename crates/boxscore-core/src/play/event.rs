// The decoded outcome of a single play.

use serde::Serialize;

use super::notation::{Advance, Base, FieldPosition};

/// Batted-ball and play-type annotations carried by the `/`-separated
/// modifiers of a play code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Modifiers {
    pub force_out: bool,
    pub ground_ball: bool,
    pub fly_ball: bool,
    pub line_drive: bool,
    pub pop_up: bool,
    pub bunt_grounder: bool,
    pub bunt_pop_up: bool,
    pub double_play: bool,
    pub triple_play: bool,
    pub ground_double_play: bool,
    pub line_double_play: bool,
    pub ground_triple_play: bool,
    pub line_triple_play: bool,
    pub sacrifice_hit: bool,
    pub sacrifice_fly: bool,
}

/// Everything that happened on one play, as credited to fielding positions
/// and bases. Built fresh by [`decode`](super::decode) and never mutated
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayEvent {
    // Primary outcome
    pub batter_out: bool,
    pub single: bool,
    pub double: bool,
    pub triple: bool,
    pub home_run: bool,
    pub ground_rule_double: bool,
    pub walk: bool,
    pub intentional_walk: bool,
    pub hit_by_pitch: bool,
    pub strikeout: bool,
    pub dropped_third_strike: bool,
    pub error_batter_on_base: bool,
    pub error_on_foul_fly: bool,
    pub fielders_choice: bool,
    pub catcher_interference: bool,
    pub no_play: bool,
    pub balk: bool,
    pub defensive_indifference: bool,
    pub passed_ball: bool,
    pub wild_pitch: bool,
    pub other_advance: bool,
    pub unknown: bool,

    pub modifiers: Modifiers,

    // Credits, in the order they appear in the notation
    pub putouts: Vec<FieldPosition>,
    pub assists: Vec<FieldPosition>,
    pub errors: Vec<FieldPosition>,
    /// Origin base of every runner who scored.
    pub runs_scored: Vec<Base>,
    /// Base reached on each steal.
    pub stolen_bases: Vec<Base>,
    /// Base the runner was picked off.
    pub pickoffs: Vec<Base>,
    /// Base the runner was trying to reach.
    pub caught_stealing: Vec<Base>,
    pub advances: Vec<Advance>,

    pub num_out: u32,
    pub num_run: u32,
    pub run_batted_in: u32,
    pub earned_run: u32,
}

impl PlayEvent {
    /// True for a single, double, triple or home run.
    pub fn is_hit(&self) -> bool {
        self.single || self.double || self.triple || self.home_run
    }

    pub fn is_sacrifice(&self) -> bool {
        self.modifiers.sacrifice_hit || self.modifiers.sacrifice_fly
    }

    /// The batter struck out, whether or not the third strike was caught.
    pub fn is_strikeout(&self) -> bool {
        self.strikeout || self.dropped_third_strike
    }

    /// Whether this play's RBI and earned-run credit is currently withheld.
    pub(crate) fn scoring_credit_withheld(&self) -> bool {
        self.modifiers.ground_double_play || !self.errors.is_empty() || self.wild_pitch
    }
}
