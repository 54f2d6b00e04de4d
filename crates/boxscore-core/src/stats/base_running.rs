// Base-running line, credited to the runner by the base they started on.

use serde::Serialize;

use crate::play::{Base, PlayEvent};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BaseRunningStats {
    pub caught_stealing_second: u32,
    pub caught_stealing_third: u32,
    pub caught_stealing_home: u32,
    pub pick_off_first: u32,
    pub pick_off_second: u32,
    pub pick_off_third: u32,
    pub score_from_first: u32,
    pub score_from_second: u32,
    pub score_from_third: u32,
    pub steal_second: u32,
    pub steal_third: u32,
    pub steal_home: u32,
    pub advance12: u32,
    pub advance13: u32,
    pub advance23: u32,
}

impl BaseRunningStats {
    pub const FEATURE_NAMES: [&'static str; 19] = [
        "stolen_base",
        "steal_second",
        "steal_third",
        "steal_home",
        "caught_stealing",
        "caught_stealing_second",
        "caught_stealing_third",
        "caught_stealing_home",
        "pick_off",
        "pick_off_first",
        "pick_off_second",
        "pick_off_third",
        "score_from_base",
        "score_from_first",
        "score_from_second",
        "score_from_third",
        "advance12",
        "advance13",
        "advance23",
    ];

    /// Fold one play for the runner who started it on `base`. Events that
    /// belong to a different runner are ignored.
    pub fn apply(&mut self, event: &PlayEvent, base: Base) {
        for target in &event.caught_stealing {
            if target.previous() != Some(base) {
                continue;
            }
            match target {
                Base::Second => self.caught_stealing_second += 1,
                Base::Third => self.caught_stealing_third += 1,
                Base::Home => self.caught_stealing_home += 1,
                Base::Batter | Base::First => {}
            }
        }

        for picked in &event.pickoffs {
            if *picked != base {
                continue;
            }
            match picked {
                Base::First => self.pick_off_first += 1,
                Base::Second => self.pick_off_second += 1,
                Base::Third => self.pick_off_third += 1,
                Base::Batter | Base::Home => {}
            }
        }

        for origin in &event.runs_scored {
            if *origin != base {
                continue;
            }
            match origin {
                Base::First => self.score_from_first += 1,
                Base::Second => self.score_from_second += 1,
                Base::Third => self.score_from_third += 1,
                Base::Batter | Base::Home => {}
            }
        }

        for target in &event.stolen_bases {
            if target.previous() != Some(base) {
                continue;
            }
            match target {
                Base::Second => self.steal_second += 1,
                Base::Third => self.steal_third += 1,
                Base::Home => self.steal_home += 1,
                Base::Batter | Base::First => {}
            }
        }

        for advance in &event.advances {
            if advance.from != base {
                continue;
            }
            match (advance.from, advance.to) {
                (Base::First, Base::Second) => self.advance12 += 1,
                (Base::First, Base::Third) => self.advance13 += 1,
                (Base::Second, Base::Third) => self.advance23 += 1,
                _ => {}
            }
        }
    }

    pub fn merge(&mut self, other: &BaseRunningStats) {
        self.caught_stealing_second += other.caught_stealing_second;
        self.caught_stealing_third += other.caught_stealing_third;
        self.caught_stealing_home += other.caught_stealing_home;
        self.pick_off_first += other.pick_off_first;
        self.pick_off_second += other.pick_off_second;
        self.pick_off_third += other.pick_off_third;
        self.score_from_first += other.score_from_first;
        self.score_from_second += other.score_from_second;
        self.score_from_third += other.score_from_third;
        self.steal_second += other.steal_second;
        self.steal_third += other.steal_third;
        self.steal_home += other.steal_home;
        self.advance12 += other.advance12;
        self.advance13 += other.advance13;
        self.advance23 += other.advance23;
    }

    pub fn stolen_base(&self) -> u32 {
        self.steal_second + self.steal_third + self.steal_home
    }

    pub fn caught_stealing(&self) -> u32 {
        self.caught_stealing_second + self.caught_stealing_third + self.caught_stealing_home
    }

    pub fn pick_off(&self) -> u32 {
        self.pick_off_first + self.pick_off_second + self.pick_off_third
    }

    pub fn score_from_base(&self) -> u32 {
        self.score_from_first + self.score_from_second + self.score_from_third
    }

    pub fn features(&self) -> [f64; 19] {
        [
            self.stolen_base() as f64,
            self.steal_second as f64,
            self.steal_third as f64,
            self.steal_home as f64,
            self.caught_stealing() as f64,
            self.caught_stealing_second as f64,
            self.caught_stealing_third as f64,
            self.caught_stealing_home as f64,
            self.pick_off() as f64,
            self.pick_off_first as f64,
            self.pick_off_second as f64,
            self.pick_off_third as f64,
            self.score_from_base() as f64,
            self.score_from_first as f64,
            self.score_from_second as f64,
            self.score_from_third as f64,
            self.advance12 as f64,
            self.advance13 as f64,
            self.advance23 as f64,
        ]
    }
}
