// Pitching line, seen from the pitcher of record on each play.

use serde::Serialize;

use super::ratio;
use crate::play::PlayEvent;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PitchingStats {
    pub out: u32,
    pub strike_out: u32,
    pub single: u32,
    pub double: u32,
    pub triple: u32,
    pub home_run: u32,
    pub walk: u32,
    pub intentional_walk: u32,
    pub hit_by_pitch: u32,
    pub wild_pitch: u32,
    pub balk: u32,
    pub pick_off: u32,
    pub caught_stealing: u32,
    pub stolen_base: u32,
    pub run: u32,
    pub earned_run: u32,
    pub error_on_base: u32,
    pub fielders_choice: u32,
    pub unknown: u32,
}

impl PitchingStats {
    pub const FEATURE_NAMES: [&'static str; 22] = [
        "out",
        "innings_pitched",
        "hit",
        "single",
        "double",
        "triple",
        "home_run",
        "run",
        "earned_run",
        "walk",
        "intentional_walk",
        "strike_out",
        "hit_by_pitch",
        "wild_pitch",
        "balk",
        "pick_off",
        "caught_stealing",
        "stolen_base",
        "error_on_base",
        "fielders_choice",
        "earned_run_average",
        "whip",
    ];

    pub fn apply(&mut self, event: &PlayEvent) {
        self.out += event.num_out;
        self.strike_out += u32::from(event.is_strikeout());
        self.single += u32::from(event.single);
        self.double += u32::from(event.double);
        self.triple += u32::from(event.triple);
        self.home_run += u32::from(event.home_run);
        self.walk += u32::from(event.walk);
        self.intentional_walk += u32::from(event.intentional_walk);
        self.hit_by_pitch += u32::from(event.hit_by_pitch);
        self.wild_pitch += u32::from(event.wild_pitch);
        self.balk += u32::from(event.balk);
        self.pick_off += event.pickoffs.len() as u32;
        self.caught_stealing += event.caught_stealing.len() as u32;
        self.stolen_base += event.stolen_bases.len() as u32;
        self.run += event.num_run;
        self.earned_run += event.earned_run;
        self.error_on_base += u32::from(event.error_batter_on_base);
        self.fielders_choice += u32::from(event.fielders_choice);
        self.unknown += u32::from(event.unknown);
    }

    pub fn merge(&mut self, other: &PitchingStats) {
        self.out += other.out;
        self.strike_out += other.strike_out;
        self.single += other.single;
        self.double += other.double;
        self.triple += other.triple;
        self.home_run += other.home_run;
        self.walk += other.walk;
        self.intentional_walk += other.intentional_walk;
        self.hit_by_pitch += other.hit_by_pitch;
        self.wild_pitch += other.wild_pitch;
        self.balk += other.balk;
        self.pick_off += other.pick_off;
        self.caught_stealing += other.caught_stealing;
        self.stolen_base += other.stolen_base;
        self.run += other.run;
        self.earned_run += other.earned_run;
        self.error_on_base += other.error_on_base;
        self.fielders_choice += other.fielders_choice;
        self.unknown += other.unknown;
    }

    pub fn hit(&self) -> u32 {
        self.single + self.double + self.triple + self.home_run
    }

    pub fn innings_pitched(&self) -> f64 {
        self.out as f64 / 3.0
    }

    /// Earned runs per nine innings.
    pub fn earned_run_average(&self) -> f64 {
        ratio(9.0 * self.earned_run as f64, self.innings_pitched())
    }

    /// Walks plus hits per inning pitched.
    pub fn whip(&self) -> f64 {
        ratio((self.walk + self.hit()) as f64, self.innings_pitched())
    }

    pub fn features(&self) -> [f64; 22] {
        [
            self.out as f64,
            self.innings_pitched(),
            self.hit() as f64,
            self.single as f64,
            self.double as f64,
            self.triple as f64,
            self.home_run as f64,
            self.run as f64,
            self.earned_run as f64,
            self.walk as f64,
            self.intentional_walk as f64,
            self.strike_out as f64,
            self.hit_by_pitch as f64,
            self.wild_pitch as f64,
            self.balk as f64,
            self.pick_off as f64,
            self.caught_stealing as f64,
            self.stolen_base as f64,
            self.error_on_base as f64,
            self.fielders_choice as f64,
            self.earned_run_average(),
            self.whip(),
        ]
    }
}
