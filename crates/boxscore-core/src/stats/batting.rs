// Batting line accumulated from the plays where a player was the batter.

use serde::Serialize;

use super::ratio;
use crate::play::{Base, PlayEvent};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BattingStats {
    pub sacrifice_hit: u32,
    pub sacrifice_fly: u32,
    pub out: u32,
    pub strike_out: u32,
    pub single: u32,
    pub double: u32,
    pub triple: u32,
    pub home_run: u32,
    pub hit_by_pitch: u32,
    pub error_on_base: u32,
    pub walk: u32,
    pub intentional_walk: u32,
    pub fielders_choice: u32,
    pub run: u32,
    pub run_batted_in: u32,
    pub unknown: u32,
}

impl BattingStats {
    pub const FEATURE_NAMES: [&'static str; 22] = [
        "at_bat",
        "run",
        "hit",
        "single",
        "double",
        "triple",
        "home_run",
        "run_batted_in",
        "walk",
        "intentional_walk",
        "strike_out",
        "hit_by_pitch",
        "sacrifice_hit",
        "sacrifice_fly",
        "error_on_base",
        "fielders_choice",
        "out",
        "times_reached_base",
        "total_bases",
        "batting_average",
        "on_base_percentage",
        "slugging",
    ];

    /// Fold one plate appearance into the line.
    pub fn apply(&mut self, event: &PlayEvent) {
        let m = &event.modifiers;
        self.sacrifice_hit += u32::from(m.sacrifice_hit);
        self.sacrifice_fly += u32::from(m.sacrifice_fly);
        // Sacrifices are not at-bats.
        if !event.is_sacrifice() {
            self.out += u32::from(event.batter_out);
        }

        self.strike_out += u32::from(event.is_strikeout());
        self.single += u32::from(event.single);
        self.double += u32::from(event.double);
        self.triple += u32::from(event.triple);
        self.home_run += u32::from(event.home_run);
        self.hit_by_pitch += u32::from(event.hit_by_pitch);
        self.error_on_base += u32::from(event.error_batter_on_base);
        self.walk += u32::from(event.walk);
        self.intentional_walk += u32::from(event.intentional_walk);
        self.fielders_choice += u32::from(event.fielders_choice);
        self.run += u32::from(event.runs_scored.contains(&Base::Batter));
        self.run_batted_in += event.run_batted_in;
        self.unknown += u32::from(event.unknown);
    }

    pub fn merge(&mut self, other: &BattingStats) {
        self.sacrifice_hit += other.sacrifice_hit;
        self.sacrifice_fly += other.sacrifice_fly;
        self.out += other.out;
        self.strike_out += other.strike_out;
        self.single += other.single;
        self.double += other.double;
        self.triple += other.triple;
        self.home_run += other.home_run;
        self.hit_by_pitch += other.hit_by_pitch;
        self.error_on_base += other.error_on_base;
        self.walk += other.walk;
        self.intentional_walk += other.intentional_walk;
        self.fielders_choice += other.fielders_choice;
        self.run += other.run;
        self.run_batted_in += other.run_batted_in;
        self.unknown += other.unknown;
    }

    pub fn hit(&self) -> u32 {
        self.single + self.double + self.triple + self.home_run
    }

    pub fn at_bat(&self) -> u32 {
        self.strike_out + self.out + self.hit() + self.error_on_base + self.fielders_choice
    }

    /// H / AB
    pub fn batting_average(&self) -> f64 {
        ratio(self.hit() as f64, self.at_bat() as f64)
    }

    /// H + BB + HBP
    pub fn times_reached_base(&self) -> u32 {
        self.hit() + self.walk + self.hit_by_pitch
    }

    /// AB + BB + HBP + SF
    pub fn at_bats_plus(&self) -> u32 {
        self.at_bat() + self.walk + self.hit_by_pitch + self.sacrifice_fly
    }

    pub fn on_base_percentage(&self) -> f64 {
        ratio(self.times_reached_base() as f64, self.at_bats_plus() as f64)
    }

    pub fn total_bases(&self) -> u32 {
        self.single + 2 * self.double + 3 * self.triple + 4 * self.home_run
    }

    /// TB / AB
    pub fn slugging(&self) -> f64 {
        ratio(self.total_bases() as f64, self.at_bat() as f64)
    }

    pub fn features(&self) -> [f64; 22] {
        [
            self.at_bat() as f64,
            self.run as f64,
            self.hit() as f64,
            self.single as f64,
            self.double as f64,
            self.triple as f64,
            self.home_run as f64,
            self.run_batted_in as f64,
            self.walk as f64,
            self.intentional_walk as f64,
            self.strike_out as f64,
            self.hit_by_pitch as f64,
            self.sacrifice_hit as f64,
            self.sacrifice_fly as f64,
            self.error_on_base as f64,
            self.fielders_choice as f64,
            self.out as f64,
            self.times_reached_base() as f64,
            self.total_bases() as f64,
            self.batting_average(),
            self.on_base_percentage(),
            self.slugging(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play::decode;

    fn line(plays: &[(&str, &str)]) -> BattingStats {
        let mut stats = BattingStats::default();
        for (play, advance) in plays {
            stats.apply(&decode(play, advance));
        }
        stats
    }

    #[test]
    fn sacrifices_are_not_at_bats() {
        let stats = line(&[("54(B)/BG25/SH", "1-2"), ("9/SF", "3-H")]);
        assert_eq!(stats.sacrifice_hit, 1);
        assert_eq!(stats.sacrifice_fly, 1);
        assert_eq!(stats.out, 0);
        assert_eq!(stats.at_bat(), 0);
        assert_eq!(stats.run_batted_in, 1);
        assert_eq!(stats.at_bats_plus(), 1);
    }

    #[test]
    fn batting_average_over_five_at_bats() {
        let stats = line(&[
            ("S8/G4", ""),
            ("63/G6M", ""),
            ("K", ""),
            ("8/F78", ""),
            ("FC5/G5", "3X4(52)"),
            ("W", ""),
        ]);
        assert_eq!(stats.at_bat(), 5);
        assert_eq!(stats.hit(), 1);
        assert!((stats.batting_average() - 0.2).abs() < 1e-12);
        assert_eq!(stats.times_reached_base(), 2);
        assert_eq!(stats.at_bats_plus(), 6);
        assert!((stats.on_base_percentage() - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn slugging_weights_extra_base_hits() {
        let stats = line(&[("S7", ""), ("D8", ""), ("T9", ""), ("HR", "")]);
        assert_eq!(stats.total_bases(), 10);
        assert!((stats.slugging() - 2.5).abs() < 1e-12);
        assert_eq!(stats.run, 1);
    }

    #[test]
    fn reached_on_error_counts_as_at_bat_without_hit() {
        let stats = line(&[("E6/G6", ""), ("3E1", "")]);
        assert_eq!(stats.error_on_base, 2);
        assert_eq!(stats.at_bat(), 2);
        assert_eq!(stats.batting_average(), 0.0);
    }

    #[test]
    fn dropped_third_strike_is_a_strikeout() {
        let stats = line(&[("K23", ""), ("K", "")]);
        assert_eq!(stats.strike_out, 2);
        assert_eq!(stats.at_bat(), 2);
    }

    #[test]
    fn ratios_are_zero_without_plate_appearances() {
        let stats = BattingStats::default();
        assert_eq!(stats.batting_average(), 0.0);
        assert_eq!(stats.on_base_percentage(), 0.0);
        assert_eq!(stats.slugging(), 0.0);
        assert!(stats.features().iter().all(|v| *v == 0.0));
    }
}
