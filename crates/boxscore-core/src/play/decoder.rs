// Table-driven decoder for play codes and base-running strings.
//
// A play code looks like `64(1)3/GDP/G6` (primary, then `/`-separated
// modifiers) and may carry an extra event after a `+` in the primary, as in
// `K+CS2(26)/DP`. The base-running string is a `;`-separated list of runner
// movements such as `2-H;1-3;B-1` or `3X4(52)`.

use tracing::trace;

use super::event::PlayEvent;
use super::notation::{Advance, Base, FieldPosition};

// ---------------------------------------------------------------------------
// Precedence tables
// ---------------------------------------------------------------------------

/// How a table entry recognizes a primary code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// The code starts with a fielder digit, e.g. `63` or `8(B)84(2)`.
    Fielded,
    /// The code starts with the given letters.
    Prefix(&'static str),
}

impl Pattern {
    fn matches(&self, code: &str) -> bool {
        match self {
            Pattern::Fielded => code.starts_with(|c: char| c.is_ascii_digit()),
            Pattern::Prefix(prefix) => code.starts_with(prefix),
        }
    }
}

/// What a primary play code describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKind {
    FieldedOut,
    WildPitch,
    HitByPitch,
    HomeRun,
    IntentionalWalk,
    NoPlay,
    Balk,
    GroundRuleDouble,
    DefensiveIndifference,
    PickoffCaughtStealing,
    Pickoff,
    CaughtStealing,
    PassedBall,
    Error,
    StolenBase,
    Strikeout,
    Single,
    Double,
    Triple,
    Walk,
    FieldersChoice,
    ErrorOnFoulFly,
    CatcherInterference,
    OtherAdvance,
}

/// Primary codes in precedence order. The first matching entry wins, so an
/// entry must come before any shorter entry that is a prefix of it (`HR`
/// before `H`, `POCS` before `PO`, `CS` before `C`).
pub const PRIMARY_TABLE: &[(Pattern, PrimaryKind)] = &[
    (Pattern::Fielded, PrimaryKind::FieldedOut),
    (Pattern::Prefix("WP"), PrimaryKind::WildPitch),
    (Pattern::Prefix("HP"), PrimaryKind::HitByPitch),
    (Pattern::Prefix("HR"), PrimaryKind::HomeRun),
    (Pattern::Prefix("H"), PrimaryKind::HomeRun),
    (Pattern::Prefix("IW"), PrimaryKind::IntentionalWalk),
    (Pattern::Prefix("I"), PrimaryKind::IntentionalWalk),
    (Pattern::Prefix("NP"), PrimaryKind::NoPlay),
    (Pattern::Prefix("BK"), PrimaryKind::Balk),
    (Pattern::Prefix("DGR"), PrimaryKind::GroundRuleDouble),
    (Pattern::Prefix("DI"), PrimaryKind::DefensiveIndifference),
    (Pattern::Prefix("POCS"), PrimaryKind::PickoffCaughtStealing),
    (Pattern::Prefix("PO"), PrimaryKind::Pickoff),
    (Pattern::Prefix("CS"), PrimaryKind::CaughtStealing),
    (Pattern::Prefix("PB"), PrimaryKind::PassedBall),
    (Pattern::Prefix("E"), PrimaryKind::Error),
    (Pattern::Prefix("SB"), PrimaryKind::StolenBase),
    (Pattern::Prefix("K"), PrimaryKind::Strikeout),
    (Pattern::Prefix("S"), PrimaryKind::Single),
    (Pattern::Prefix("D"), PrimaryKind::Double),
    (Pattern::Prefix("T"), PrimaryKind::Triple),
    (Pattern::Prefix("W"), PrimaryKind::Walk),
    (Pattern::Prefix("FC"), PrimaryKind::FieldersChoice),
    (Pattern::Prefix("FLE"), PrimaryKind::ErrorOnFoulFly),
    (Pattern::Prefix("C"), PrimaryKind::CatcherInterference),
    (Pattern::Prefix("OA"), PrimaryKind::OtherAdvance),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtraKind {
    PickoffOrCaughtStealing,
    StolenBase,
    OtherAdvance,
    PassedBall,
    WildPitch,
    Error,
}

/// Events that may follow a `+` in the primary code.
const EXTRA_TABLE: &[(&str, ExtraKind)] = &[
    ("POCS", ExtraKind::PickoffOrCaughtStealing),
    ("PO", ExtraKind::PickoffOrCaughtStealing),
    ("CS", ExtraKind::PickoffOrCaughtStealing),
    ("SB", ExtraKind::StolenBase),
    ("OA", ExtraKind::OtherAdvance),
    ("PB", ExtraKind::PassedBall),
    ("WP", ExtraKind::WildPitch),
    ("E", ExtraKind::Error),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModifierKind {
    ForceOut,
    GroundDoublePlay,
    LineDoublePlay,
    GroundTriplePlay,
    LineTriplePlay,
    SacrificeFly,
    SacrificeHit,
    DoublePlay,
    TriplePlay,
    BuntGroundDoublePlay,
    BuntPopDoublePlay,
    BuntGrounder,
    BuntPopUp,
    Error,
    GroundBall,
    LineDrive,
    PopUp,
    FlyBall,
}

/// Whole modifiers that would otherwise be caught by a shorter prefix below
/// (`FL` is a foul, not a fly ball; `PASS` is a runner passing another).
const IGNORED_MODIFIERS: &[&str] = &["FL", "FLE", "FINT", "PASS"];

/// Modifier prefixes in precedence order. Unlisted modifiers (hit
/// locations, `TH`, `NDP`, ...) carry nothing the statistics use.
const MODIFIER_TABLE: &[(&str, ModifierKind)] = &[
    ("FO", ModifierKind::ForceOut),
    ("GDP", ModifierKind::GroundDoublePlay),
    ("LDP", ModifierKind::LineDoublePlay),
    ("GTP", ModifierKind::GroundTriplePlay),
    ("LTP", ModifierKind::LineTriplePlay),
    ("SF", ModifierKind::SacrificeFly),
    ("SH", ModifierKind::SacrificeHit),
    ("DP", ModifierKind::DoublePlay),
    ("TP", ModifierKind::TriplePlay),
    ("BGDP", ModifierKind::BuntGroundDoublePlay),
    ("BPDP", ModifierKind::BuntPopDoublePlay),
    ("BG", ModifierKind::BuntGrounder),
    ("BP", ModifierKind::BuntPopUp),
    ("E", ModifierKind::Error),
    ("G", ModifierKind::GroundBall),
    ("L", ModifierKind::LineDrive),
    ("P", ModifierKind::PopUp),
    ("F", ModifierKind::FlyBall),
];

/// Look up the primary kind for a play code (without modifiers).
pub fn classify_primary(code: &str) -> Option<PrimaryKind> {
    PRIMARY_TABLE
        .iter()
        .find(|(pattern, _)| pattern.matches(code))
        .map(|&(_, kind)| kind)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Decode one play into a fresh [`PlayEvent`].
///
/// Never fails: a primary code that matches nothing in the table produces
/// an event with only `unknown` set (plus whatever the base-running string
/// says happened on the bases).
pub fn decode(play_code: &str, advance_code: &str) -> PlayEvent {
    let mut event = PlayEvent::default();

    let segments = split_outside_parens(play_code.trim(), '/');
    let (primary, modifiers) = match segments.split_first() {
        Some((primary, modifiers)) => (*primary, modifiers),
        None => ("", &[][..]),
    };

    let (head, extra) = match primary.split_once('+') {
        Some((head, extra)) => (head, Some(extra)),
        None => (primary, None),
    };

    decode_primary(&mut event, head);
    if let Some(extra) = extra {
        decode_extra_event(&mut event, extra);
    }
    for modifier in modifiers {
        apply_modifier(&mut event, modifier);
    }
    decode_base_running(&mut event, advance_code.trim());

    event.num_out = event.putouts.len() as u32;
    infer_multi_out_play(&mut event);
    event
}

// ---------------------------------------------------------------------------
// Main play
// ---------------------------------------------------------------------------

fn decode_primary(event: &mut PlayEvent, code: &str) {
    let Some(kind) = classify_primary(code) else {
        trace!(code, "unrecognized primary play code");
        event.unknown = true;
        return;
    };

    match kind {
        PrimaryKind::FieldedOut => decode_fielded_out(event, code),
        PrimaryKind::WildPitch => event.wild_pitch = true,
        PrimaryKind::HitByPitch => event.hit_by_pitch = true,
        PrimaryKind::HomeRun => {
            event.home_run = true;
            event.runs_scored.push(Base::Batter);
        }
        PrimaryKind::IntentionalWalk => event.intentional_walk = true,
        PrimaryKind::NoPlay => event.no_play = true,
        PrimaryKind::Balk => event.balk = true,
        PrimaryKind::GroundRuleDouble => {
            event.double = true;
            event.ground_rule_double = true;
        }
        PrimaryKind::DefensiveIndifference => event.defensive_indifference = true,
        PrimaryKind::PickoffCaughtStealing | PrimaryKind::Pickoff | PrimaryKind::CaughtStealing => {
            decode_pickoff_caught_stealing(event, code)
        }
        PrimaryKind::PassedBall => event.passed_ball = true,
        PrimaryKind::Error => {
            event.errors.extend(fielder_at(code, 1));
            event.error_batter_on_base = true;
        }
        PrimaryKind::StolenBase => decode_stolen_bases(event, code),
        PrimaryKind::Strikeout => decode_strikeout(event, code),
        PrimaryKind::Single => event.single = true,
        PrimaryKind::Double => event.double = true,
        PrimaryKind::Triple => event.triple = true,
        PrimaryKind::Walk => event.walk = true,
        PrimaryKind::FieldersChoice => event.fielders_choice = true,
        PrimaryKind::ErrorOnFoulFly => {
            event.error_on_foul_fly = true;
            event.errors.extend(fielder_at(code, 3));
        }
        PrimaryKind::CatcherInterference => event.catcher_interference = true,
        PrimaryKind::OtherAdvance => event.other_advance = true,
    }
}

/// Digit-leading primary: the batter (or a marked runner) was put out by the
/// listed fielders.
fn decode_fielded_out(event: &mut PlayEvent, code: &str) {
    if code == "99" {
        event.unknown = true;
        return;
    }
    let mut reached_on_error = false;
    for sequence in fielder_sequences(code) {
        reached_on_error |= credit_fielders(event, &sequence);
    }
    event.batter_out = !reached_on_error;
    event.error_batter_on_base = reached_on_error;
}

/// `K` alone is a caught third strike, credited to the catcher. `K` followed
/// by fielders is a dropped third strike and the fielders finished the play.
fn decode_strikeout(event: &mut PlayEvent, code: &str) {
    let fielders = &code[1..];
    if fielders.chars().any(|c| FieldPosition::from_code(c).is_some()) {
        event.dropped_third_strike = true;
        credit_fielders(event, fielders);
    } else {
        event.strikeout = true;
        event.putouts.push(FieldPosition::Catcher);
    }
}

fn decode_stolen_bases(event: &mut PlayEvent, code: &str) {
    for token in code.split(';') {
        if let Some(idx) = token.find("SB") {
            event.stolen_bases.extend(base_at(token, idx + 2));
        }
    }
}

/// Shared by primaries and `+` suffixes: `POCS2(1361)`, `PO1(E3)`,
/// `CS2(24)`.
fn decode_pickoff_caught_stealing(event: &mut PlayEvent, code: &str) {
    if let Some(idx) = code.find("POCS") {
        // POCS2 picks the runner off first and charges a caught stealing at
        // second; anything without a runner base falls back to the batter.
        if let Some(target) = base_at(code, idx + 4) {
            event.pickoffs.push(target.previous().unwrap_or(Base::Batter));
            event.caught_stealing.push(target);
        }
    } else if let Some(idx) = code.find("PO") {
        event.pickoffs.extend(base_at(code, idx + 2));
    } else if let Some(idx) = code.find("CS") {
        event.caught_stealing.extend(base_at(code, idx + 2));
    }

    for group in parenthesized(code) {
        credit_fielders(event, group);
    }
}

fn decode_extra_event(event: &mut PlayEvent, suffix: &str) {
    let Some(&(_, kind)) = EXTRA_TABLE
        .iter()
        .find(|(prefix, _)| suffix.starts_with(prefix))
    else {
        trace!(suffix, "ignoring unrecognized extra event");
        return;
    };

    match kind {
        ExtraKind::PickoffOrCaughtStealing => decode_pickoff_caught_stealing(event, suffix),
        ExtraKind::StolenBase => decode_stolen_bases(event, suffix),
        ExtraKind::OtherAdvance => event.other_advance = true,
        ExtraKind::PassedBall => event.passed_ball = true,
        ExtraKind::WildPitch => event.wild_pitch = true,
        ExtraKind::Error => event.errors.extend(fielder_at(suffix, 1)),
    }
}

fn apply_modifier(event: &mut PlayEvent, modifier: &str) {
    if IGNORED_MODIFIERS.contains(&modifier) {
        return;
    }
    let Some(&(_, kind)) = MODIFIER_TABLE
        .iter()
        .find(|(prefix, _)| modifier.starts_with(prefix))
    else {
        return;
    };

    let m = &mut event.modifiers;
    match kind {
        ModifierKind::ForceOut => m.force_out = true,
        ModifierKind::GroundDoublePlay => {
            m.ground_ball = true;
            m.double_play = true;
            m.ground_double_play = true;
        }
        ModifierKind::LineDoublePlay => {
            m.line_drive = true;
            m.double_play = true;
            m.line_double_play = true;
        }
        ModifierKind::GroundTriplePlay => {
            m.ground_ball = true;
            m.triple_play = true;
            m.ground_triple_play = true;
        }
        ModifierKind::LineTriplePlay => {
            m.line_drive = true;
            m.triple_play = true;
            m.line_triple_play = true;
        }
        ModifierKind::SacrificeFly => m.sacrifice_fly = true,
        ModifierKind::SacrificeHit => m.sacrifice_hit = true,
        ModifierKind::DoublePlay => m.double_play = true,
        ModifierKind::TriplePlay => m.triple_play = true,
        ModifierKind::BuntGroundDoublePlay => {
            m.bunt_grounder = true;
            m.double_play = true;
        }
        ModifierKind::BuntPopDoublePlay => {
            m.bunt_pop_up = true;
            m.double_play = true;
        }
        ModifierKind::BuntGrounder => m.bunt_grounder = true,
        ModifierKind::BuntPopUp => m.bunt_pop_up = true,
        // Catcher interference is written `C/E2`.
        ModifierKind::Error => event.errors.extend(fielder_at(modifier, 1)),
        ModifierKind::GroundBall => m.ground_ball = true,
        ModifierKind::LineDrive => m.line_drive = true,
        ModifierKind::PopUp => m.pop_up = true,
        ModifierKind::FlyBall => m.fly_ball = true,
    }
}

// ---------------------------------------------------------------------------
// Base running
// ---------------------------------------------------------------------------

/// Scoring patterns, checked per token. The batter is written `0` or `B`.
const SCORING: &[(&str, &str, Base)] = &[
    ("0-4", "0-H", Base::Batter),
    ("B-4", "B-H", Base::Batter),
    ("1-4", "1-H", Base::First),
    ("2-4", "2-H", Base::Second),
    ("3-4", "3-H", Base::Third),
];

const PLAIN_ADVANCES: &[(&str, Advance)] = &[
    ("1-2", Advance::new(Base::First, Base::Second)),
    ("1-3", Advance::new(Base::First, Base::Third)),
    ("2-3", Advance::new(Base::Second, Base::Third)),
];

fn decode_base_running(event: &mut PlayEvent, advance_code: &str) {
    // A home run already put the batter in the scoring list.
    let mut earned = if event.runs_scored.is_empty() || event.scoring_credit_withheld() {
        0
    } else {
        event.runs_scored.len() as u32
    };

    for token in advance_code.split(';') {
        let token = token.trim();

        let token_error = error_marker(token);
        event.errors.extend(token_error);

        if token.contains('X') {
            for group in parenthesized(token) {
                credit_out_attempt(event, group);
            }
        }

        for &(four, home, origin) in SCORING {
            if (token.contains(four) || token.contains(home)) && !event.runs_scored.contains(&origin) {
                event.runs_scored.push(origin);
                if token_error.is_none() && !event.scoring_credit_withheld() {
                    earned += 1;
                }
            }
        }

        for &(pattern, advance) in PLAIN_ADVANCES {
            if token.contains(pattern) {
                event.advances.push(advance);
            }
        }

        event.num_run = event.runs_scored.len() as u32;
        // Once a double play, error or wild pitch shows up, RBI stays at
        // whatever it was before this token.
        if !event.scoring_credit_withheld() {
            event.run_batted_in = event.num_run;
        }
    }

    event.earned_run = earned;
}

/// The fielder named right after an `E` in a base-running token, as in
/// `1-2(E6)` or `0-4(E7/T4)`.
fn error_marker(token: &str) -> Option<FieldPosition> {
    token
        .match_indices('E')
        .find_map(|(idx, _)| fielder_at(token, idx + 1))
}

/// Fielders on an `X` token. An error inside the group means the runner was
/// safe; the error itself comes from the token's error marker.
fn credit_out_attempt(event: &mut PlayEvent, group: &str) {
    match group.split_once('E') {
        Some((before, _)) => event.assists.extend(fielders_in(before)),
        None => {
            credit_fielders(event, group);
        }
    }
}

/// Multi-out plays without an explicit DP/TP modifier.
fn infer_multi_out_play(event: &mut PlayEvent) {
    let m = &mut event.modifiers;
    if m.double_play || m.triple_play {
        return;
    }
    match event.num_out {
        2 => m.double_play = true,
        3 => m.triple_play = true,
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Credit a fielder sequence like `643` (putout to the last fielder, assists
/// to the rest) or `3E1` (assists before the error, error to the marked
/// fielder). Returns true when the sequence contained an error.
fn credit_fielders(event: &mut PlayEvent, sequence: &str) -> bool {
    match sequence.split_once('E') {
        Some((before, after)) => {
            event.assists.extend(fielders_in(before));
            event.errors.extend(fielder_at(after, 0));
            true
        }
        None => {
            let mut fielders: Vec<FieldPosition> = fielders_in(sequence).collect();
            if let Some(last) = fielders.pop() {
                event.putouts.push(last);
            }
            event.assists.extend(fielders);
            false
        }
    }
}

fn fielders_in(s: &str) -> impl Iterator<Item = FieldPosition> + '_ {
    s.chars().filter_map(FieldPosition::from_code)
}

fn fielder_at(s: &str, idx: usize) -> Option<FieldPosition> {
    s.get(idx..)
        .and_then(|rest| rest.chars().next())
        .and_then(FieldPosition::from_code)
}

fn base_at(s: &str, idx: usize) -> Option<Base> {
    s.get(idx..)
        .and_then(|rest| rest.chars().next())
        .and_then(Base::from_code)
}

/// Contents of every `(...)` group. An unclosed group runs to the end.
fn parenthesized(code: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut rest = code;
    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        match after.find(')') {
            Some(close) => {
                groups.push(&after[..close]);
                rest = &after[close + 1..];
            }
            None => {
                groups.push(after);
                break;
            }
        }
    }
    groups
}

/// Split a digit-leading primary on its runner markers: `64(1)3` becomes
/// `["64", "3"]` and `8(B)84(2)` becomes `["8", "84"]`. Groups holding
/// anything other than `B1234` (such as an error) stay in the sequence.
fn fielder_sequences(code: &str) -> Vec<String> {
    let mut sequences = Vec::new();
    let mut current = String::new();
    let mut rest = code;

    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(')') else {
            break;
        };
        let marker = &after[..close];
        current.push_str(&rest[..open]);
        if marker.chars().all(|c| matches!(c, 'B' | '1'..='4')) {
            sequences.push(std::mem::take(&mut current));
        } else {
            current.push('(');
            current.push_str(marker);
            current.push(')');
        }
        rest = &after[close + 1..];
    }
    current.push_str(rest);
    sequences.push(current);

    sequences.retain(|s| !s.is_empty());
    sequences
}

/// Split on `separator`, ignoring separators inside parentheses so that
/// `PO1(E2/TH)/G` keeps its fielder group intact.
fn split_outside_parens(code: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in code.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&code[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&code[start..]);
    parts
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use FieldPosition::*;

    /// Index pairs (earlier, later) where the earlier prefix makes the later
    /// entry unreachable.
    fn shadowed(prefixes: &[&str]) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        for (i, earlier) in prefixes.iter().enumerate() {
            for (j, later) in prefixes.iter().enumerate().skip(i + 1) {
                if later.starts_with(earlier) {
                    found.push((i, j));
                }
            }
        }
        found
    }

    #[test]
    fn no_primary_entry_is_shadowed() {
        let prefixes: Vec<&str> = PRIMARY_TABLE
            .iter()
            .filter_map(|(pattern, _)| match pattern {
                Pattern::Prefix(p) => Some(*p),
                Pattern::Fielded => None,
            })
            .collect();
        assert!(shadowed(&prefixes).is_empty(), "{:?}", shadowed(&prefixes));
    }

    #[test]
    fn no_modifier_or_extra_entry_is_shadowed() {
        let modifiers: Vec<&str> = MODIFIER_TABLE.iter().map(|(p, _)| *p).collect();
        assert!(shadowed(&modifiers).is_empty());
        let extras: Vec<&str> = EXTRA_TABLE.iter().map(|(p, _)| *p).collect();
        assert!(shadowed(&extras).is_empty());
    }

    #[test]
    fn whole_word_modifiers_do_not_fall_through_to_prefixes() {
        let foul = decode("9/FL", "");
        assert!(!foul.modifiers.fly_ball);
        assert_eq!(foul.putouts, vec![FieldPosition::RightField]);

        let fan = decode("8/FINT", "");
        assert!(!fan.modifiers.fly_ball);

        let passed = decode("9/PASS", "");
        assert!(!passed.modifiers.pop_up);
        assert_eq!(passed.modifiers, Default::default());

        // the prefixes still apply on their own
        assert!(decode("9/F9", "").modifiers.fly_ball);
        assert!(decode("4/P4", "").modifiers.pop_up);
    }

    #[test]
    fn longer_codes_win_over_their_prefixes() {
        assert_eq!(classify_primary("HR/F78"), Some(PrimaryKind::HomeRun));
        assert_eq!(classify_primary("HP"), Some(PrimaryKind::HitByPitch));
        assert_eq!(classify_primary("H"), Some(PrimaryKind::HomeRun));
        assert_eq!(classify_primary("DGR"), Some(PrimaryKind::GroundRuleDouble));
        assert_eq!(classify_primary("DI"), Some(PrimaryKind::DefensiveIndifference));
        assert_eq!(classify_primary("D7"), Some(PrimaryKind::Double));
        assert_eq!(classify_primary("WP"), Some(PrimaryKind::WildPitch));
        assert_eq!(classify_primary("W"), Some(PrimaryKind::Walk));
        assert_eq!(classify_primary("IW"), Some(PrimaryKind::IntentionalWalk));
        assert_eq!(classify_primary("POCS2(1361)"), Some(PrimaryKind::PickoffCaughtStealing));
        assert_eq!(classify_primary("PO1(E3)"), Some(PrimaryKind::Pickoff));
        assert_eq!(classify_primary("CSH(12)"), Some(PrimaryKind::CaughtStealing));
        assert_eq!(classify_primary("C"), Some(PrimaryKind::CatcherInterference));
        assert_eq!(classify_primary("FLE5"), Some(PrimaryKind::ErrorOnFoulFly));
        assert_eq!(classify_primary("FC5"), Some(PrimaryKind::FieldersChoice));
        assert_eq!(classify_primary("SB2"), Some(PrimaryKind::StolenBase));
        assert_eq!(classify_primary("S8"), Some(PrimaryKind::Single));
        assert_eq!(classify_primary("63"), Some(PrimaryKind::FieldedOut));
        assert_eq!(classify_primary(""), None);
        assert_eq!(classify_primary("ZZ"), None);
    }

    #[test]
    fn fielder_sequences_split_on_runner_markers_only() {
        assert_eq!(fielder_sequences("64(1)3"), vec!["64", "3"]);
        assert_eq!(fielder_sequences("8(B)84(2)"), vec!["8", "84"]);
        assert_eq!(fielder_sequences("1(B)16(2)63(1)"), vec!["1", "16", "63"]);
        assert_eq!(fielder_sequences("54(B)"), vec!["54"]);
        assert_eq!(fielder_sequences("3E1"), vec!["3E1"]);
    }

    #[test]
    fn parenthesized_groups_are_collected_in_order() {
        assert_eq!(parenthesized("K+POCSH(251)"), vec!["251"]);
        assert_eq!(parenthesized("3X4(52)"), vec!["52"]);
        assert_eq!(parenthesized("PO1(E2"), vec!["E2"]);
        assert!(parenthesized("S8").is_empty());
    }

    #[test]
    fn split_keeps_slashes_inside_groups() {
        assert_eq!(split_outside_parens("PO1(E2/TH)/G", '/'), vec!["PO1(E2/TH)", "G"]);
        assert_eq!(split_outside_parens("", '/'), vec![""]);
    }

    #[test]
    fn simple_fly_out() {
        let e = decode("8/F78", "");
        assert!(e.batter_out);
        assert_eq!(e.putouts, vec![CenterField]);
        assert!(e.assists.is_empty());
        assert_eq!(e.num_out, 1);
        assert!(e.modifiers.fly_ball);
    }

    #[test]
    fn ground_out_with_assist() {
        let e = decode("63/G6M", "");
        assert_eq!(e.putouts, vec![FirstBase]);
        assert_eq!(e.assists, vec![ShortStop]);
        assert!(e.modifiers.ground_ball);
    }

    #[test]
    fn bunt_out_on_marked_batter() {
        let e = decode("54(B)/BG25/SH", "1-2");
        assert_eq!(e.putouts, vec![SecondBase]);
        assert_eq!(e.assists, vec![ThirdBase]);
        assert!(e.modifiers.bunt_grounder);
        assert!(e.modifiers.sacrifice_hit);
        assert_eq!(e.advances, vec![Advance::new(Base::First, Base::Second)]);
    }

    #[test]
    fn ground_double_play() {
        let e = decode("64(1)3/GDP/G6", "");
        assert_eq!(e.putouts, vec![SecondBase, FirstBase]);
        assert_eq!(e.assists, vec![ShortStop]);
        assert_eq!(e.num_out, 2);
        assert!(e.modifiers.double_play);
        assert!(e.modifiers.ground_double_play);
    }

    #[test]
    fn double_play_inferred_from_out_count() {
        let e = decode("64(1)3", "");
        assert_eq!(e.num_out, 2);
        assert!(e.modifiers.double_play);
        assert!(!e.modifiers.ground_double_play);
    }

    #[test]
    fn ground_triple_play() {
        let e = decode("5(2)4(1)3/GTP", "");
        assert_eq!(e.num_out, 3);
        assert!(e.modifiers.triple_play);
        assert!(e.modifiers.ground_triple_play);
    }

    #[test]
    fn line_double_and_triple_plays() {
        let e = decode("8(B)84(2)/LDP/L8", "");
        assert_eq!(e.putouts, vec![CenterField, SecondBase]);
        assert_eq!(e.assists, vec![CenterField]);
        assert!(e.modifiers.line_double_play);

        let e = decode("1(B)16(2)63(1)/LTP/L1", "");
        assert_eq!(e.putouts, vec![Pitcher, ShortStop, FirstBase]);
        assert_eq!(e.assists, vec![Pitcher, ShortStop]);
        assert!(e.modifiers.line_triple_play);
    }

    #[test]
    fn unknown_fielded_play_has_no_credits() {
        let e = decode("99/SH", "1-2");
        assert!(e.unknown);
        assert!(!e.batter_out);
        assert_eq!(e.num_out, 0);
        assert!(e.putouts.is_empty());
    }

    #[test]
    fn catcher_interference_with_error_modifier() {
        let e = decode("C/E2", "1-2");
        assert!(e.catcher_interference);
        assert_eq!(e.errors, vec![Catcher]);
    }

    #[test]
    fn error_on_batted_ball() {
        let e = decode("E1/TH/BG15", "1-3");
        assert_eq!(e.errors, vec![Pitcher]);
        assert!(e.error_batter_on_base);
        assert_eq!(e.num_out, 0);
    }

    #[test]
    fn error_inside_fielder_sequence() {
        let e = decode("3E1", "");
        assert_eq!(e.assists, vec![FirstBase]);
        assert_eq!(e.errors, vec![Pitcher]);
        assert!(e.error_batter_on_base);
        assert!(!e.batter_out);
        assert_eq!(e.num_out, 0);
    }

    #[test]
    fn fielders_choice_with_runner_out() {
        let e = decode("FC5/G5", "3X4(52)");
        assert!(e.fielders_choice);
        assert_eq!(e.putouts, vec![Catcher]);
        assert_eq!(e.assists, vec![ThirdBase]);
        assert_eq!(e.num_out, 1);
    }

    #[test]
    fn error_on_foul_fly() {
        let e = decode("FLE5/P5F", "");
        assert!(e.error_on_foul_fly);
        assert_eq!(e.errors, vec![ThirdBase]);
    }

    #[test]
    fn single_drives_in_a_run() {
        let e = decode("S7/L7D", "3-H");
        assert!(e.single);
        assert_eq!(e.runs_scored, vec![Base::Third]);
        assert_eq!(e.num_run, 1);
        assert_eq!(e.run_batted_in, 1);
        assert_eq!(e.earned_run, 1);
    }

    #[test]
    fn home_run_scores_batter_once() {
        let e = decode("HR/F78XD", "2-H;1-H");
        assert!(e.home_run);
        assert_eq!(e.num_run, 3);
        assert_eq!(e.run_batted_in, 3);
        assert_eq!(e.earned_run, 3);

        let e = decode("HR/F89XD", "2-4;1-4;0-4");
        assert_eq!(e.num_run, 3);
        assert_eq!(e.runs_scored, vec![Base::Batter, Base::Second, Base::First]);
    }

    #[test]
    fn strikeout_credits_catcher_putout() {
        let e = decode("K", "");
        assert!(e.strikeout);
        assert_eq!(e.putouts, vec![Catcher]);
        assert_eq!(e.num_out, 1);
    }

    #[test]
    fn dropped_third_strike_credits_throw() {
        let e = decode("K23", "");
        assert!(e.dropped_third_strike);
        assert!(!e.strikeout);
        assert_eq!(e.putouts, vec![FirstBase]);
        assert_eq!(e.assists, vec![Catcher]);
    }

    #[test]
    fn strikeout_plus_stolen_base() {
        let e = decode("K+SB2", "");
        assert!(e.strikeout);
        assert_eq!(e.stolen_bases, vec![Base::Second]);
    }

    #[test]
    fn strikeout_plus_caught_stealing_double_play() {
        let e = decode("K+CS2(26)/DP", "");
        assert!(e.strikeout);
        assert_eq!(e.caught_stealing, vec![Base::Second]);
        assert_eq!(e.putouts, vec![Catcher, ShortStop]);
        assert_eq!(e.assists, vec![Catcher]);
        assert_eq!(e.num_out, 2);
        assert!(e.modifiers.double_play);
    }

    #[test]
    fn strikeout_plus_other_advance_with_runner_out() {
        let e = decode("K+OA/DP", "1X2(24)");
        assert!(e.other_advance);
        assert_eq!(e.putouts, vec![Catcher, SecondBase]);
        assert_eq!(e.assists, vec![Catcher]);
    }

    #[test]
    fn strikeout_plus_pickoff() {
        let e = decode("K+PO3(25)/DP", "");
        assert_eq!(e.pickoffs, vec![Base::Third]);
        assert_eq!(e.putouts, vec![Catcher, ThirdBase]);
        assert_eq!(e.assists, vec![Catcher]);
    }

    #[test]
    fn strikeout_plus_pickoff_caught_stealing_home() {
        let e = decode("K+POCSH(251)/DP", "");
        assert_eq!(e.pickoffs, vec![Base::Third]);
        assert_eq!(e.caught_stealing, vec![Base::Home]);
        assert_eq!(e.putouts, vec![Catcher, Pitcher]);
        assert_eq!(e.assists, vec![Catcher, ThirdBase]);
    }

    #[test]
    fn strikeout_plus_battery_events() {
        assert!(decode("K+PB", "").passed_ball);
        let e = decode("K+WP", "B-1");
        assert!(e.wild_pitch);
        assert!(e.strikeout);
        let e = decode("K23+WP", "");
        assert!(e.dropped_third_strike);
        assert!(e.wild_pitch);
        let e = decode("K+E1", "");
        assert_eq!(e.errors, vec![Pitcher]);
        assert!(!e.error_batter_on_base);
    }

    #[test]
    fn walk_plus_extra_events() {
        assert_eq!(decode("W+SB3", "").stolen_bases, vec![Base::Third]);
        let e = decode("W+CS3(25)", "");
        assert!(e.walk);
        assert_eq!(e.caught_stealing, vec![Base::Third]);
        assert_eq!(e.putouts, vec![ThirdBase]);
        assert_eq!(e.assists, vec![Catcher]);
        assert_eq!(e.num_out, 1);
        assert_eq!(decode("W+PO3(25)", "").pickoffs, vec![Base::Third]);
        assert!(decode("W+PB", "").passed_ball);
        assert!(decode("W+WP", "").wild_pitch);
        assert_eq!(decode("W+E2", "").errors, vec![Catcher]);
        let e = decode("IW+WP", "");
        assert!(e.intentional_walk);
        assert!(e.wild_pitch);
    }

    #[test]
    fn balk_and_battery_primaries() {
        assert!(decode("BK", "3-H").balk);
        assert!(decode("DI", "1-2").defensive_indifference);
        assert!(decode("PB", "2-3").passed_ball);
        assert!(decode("WP", "2-3").wild_pitch);
        let e = decode("HP", "");
        assert!(e.hit_by_pitch);
        assert!(!e.home_run);
        assert!(decode("NP", "").no_play);
    }

    #[test]
    fn caught_stealing_variants() {
        let e = decode("CSH(12)", "");
        assert_eq!(e.caught_stealing, vec![Base::Home]);
        assert_eq!(e.putouts, vec![Catcher]);
        assert_eq!(e.assists, vec![Pitcher]);

        let e = decode("CS2(24)", "2-3");
        assert_eq!(e.putouts, vec![SecondBase]);
        assert_eq!(e.assists, vec![Catcher]);

        let e = decode("CS2(2E4)", "1-3");
        assert_eq!(e.num_out, 0);
        assert_eq!(e.assists, vec![Catcher]);
        assert_eq!(e.errors, vec![SecondBase]);
    }

    #[test]
    fn pickoff_variants() {
        let e = decode("PO2(14)", "");
        assert_eq!(e.pickoffs, vec![Base::Second]);
        assert_eq!(e.putouts, vec![SecondBase]);
        assert_eq!(e.assists, vec![Pitcher]);

        let e = decode("PO1(E3)", "");
        assert_eq!(e.pickoffs, vec![Base::First]);
        assert_eq!(e.errors, vec![FirstBase]);
        assert_eq!(e.num_out, 0);

        let e = decode("PO1(E2/TH)", "1-2");
        assert_eq!(e.errors, vec![Catcher]);

        let e = decode("POCS2(1361)", "");
        assert_eq!(e.pickoffs, vec![Base::First]);
        assert_eq!(e.caught_stealing, vec![Base::Second]);
        assert_eq!(e.putouts, vec![Pitcher]);
        assert_eq!(e.assists, vec![Pitcher, FirstBase, ShortStop]);
    }

    #[test]
    fn multiple_stolen_bases_keep_order() {
        assert_eq!(decode("SB3;SB2", "").stolen_bases, vec![Base::Third, Base::Second]);
        assert_eq!(decode("SBH;SB2", "").stolen_bases, vec![Base::Home, Base::Second]);
    }

    #[test]
    fn other_advance_with_runner_out() {
        let e = decode("OA", "2X3(25)");
        assert!(e.other_advance);
        assert_eq!(e.putouts, vec![ThirdBase]);
        assert_eq!(e.assists, vec![Catcher]);
    }

    #[test]
    fn base_running_error_and_out() {
        let e = decode("S8", "1-2(E6);0-1");
        assert_eq!(e.errors, vec![ShortStop]);

        let e = decode("S9", "3X4(125)");
        assert_eq!(e.putouts, vec![ThirdBase]);
        assert_eq!(e.assists, vec![Pitcher, Catcher]);

        let e = decode("S9", "1X3(8E5)");
        assert!(e.putouts.is_empty());
        assert_eq!(e.assists, vec![CenterField]);
        assert_eq!(e.errors, vec![ThirdBase]);
    }

    #[test]
    fn plain_advances_are_recorded() {
        let e = decode("S7", "1-2;2-3;1-3");
        assert_eq!(
            e.advances,
            vec![
                Advance::new(Base::First, Base::Second),
                Advance::new(Base::Second, Base::Third),
                Advance::new(Base::First, Base::Third),
            ]
        );
    }

    #[test]
    fn runs_batted_in_counts_every_scoring_runner() {
        let e = decode("D7/G5", "3-4;2-4;1-4");
        assert_eq!(e.num_run, 3);
        assert_eq!(e.run_batted_in, 3);

        let e = decode("HR", "3-4;2-4;1-4");
        assert_eq!(e.num_run, 4);
        assert_eq!(e.run_batted_in, 4);
    }

    #[test]
    fn error_token_freezes_runs_batted_in() {
        let e = decode("T7/L7LS", "2-4;1-4;0-4(E7/T4)");
        assert_eq!(e.num_run, 3);
        assert_eq!(e.errors, vec![LeftField]);
        assert_eq!(e.run_batted_in, 2);
        assert_eq!(e.earned_run, 2);
    }

    #[test]
    fn runs_batted_in_exclusions() {
        let e = decode("46(1)3/GDP/G4", "3-4");
        assert_eq!(e.num_run, 1);
        assert_eq!(e.run_batted_in, 0);

        let e = decode("FC4/G4", "1-4(E4/T4);0-2");
        assert_eq!(e.num_run, 1);
        assert_eq!(e.run_batted_in, 0);
        assert_eq!(e.earned_run, 0);

        let e = decode("E4/G4", "3-4");
        assert_eq!(e.run_batted_in, 0);

        let e = decode("WP", "3-4");
        assert_eq!(e.num_run, 1);
        assert_eq!(e.run_batted_in, 0);
    }

    #[test]
    fn empty_play_is_unknown() {
        let e = decode("", "");
        assert!(e.unknown);
        assert_eq!(e, PlayEvent { unknown: true, ..PlayEvent::default() });
    }

    #[test]
    fn unrecognized_primary_is_unknown_without_credits() {
        let e = decode("ZZ7/G", "");
        assert!(e.unknown);
        assert!(e.putouts.is_empty());
        assert!(!e.batter_out);
    }

    #[test]
    fn decoding_is_pure() {
        let first = decode("K+POCSH(251)/DP", "1-2;3X4(52)");
        let second = decode("K+POCSH(251)/DP", "1-2;3X4(52)");
        assert_eq!(first, second);
    }
}
