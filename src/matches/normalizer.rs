//! Sheet export → match records.
//!
//! The first line is always the header. Every other line is tokenized and
//! mapped positionally:
//!
//! | column | field  | column | field |
//! |--------|--------|--------|-------|
//! | 0      | league | 6      | p1    |
//! | 1      | id     | 7      | x     |
//! | 2      | date   | 8      | p2    |
//! | 3      | time   | 9      | p1x   |
//! | 4      | team1  | 10     | p12   |
//! | 5      | team2  | 11     | px2   |
//!
//! Rows that cannot produce a record are dropped and counted, never
//! reported as errors.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::matches::csv_line::tokenize_line;
use crate::matches::models::MatchRecord;
use crate::matches::odds::OddsPolicy;
use crate::matches::sport::classify_sport;

pub const MIN_COLUMNS: usize = 12;
pub const DEFAULT_ODD: &str = "0.00";

/// "17 фев 20:45" and friends, left inside team-name cells by some exports.
/// Month letters are Cyrillic or Latin only.
static EMBEDDED_DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{1,2}\s+[а-яёА-ЯЁa-zA-Z]{2,4}\s+[0-9]{1,2}:[0-9]{2}")
        .expect("date/time pattern is valid")
});

/// Why a data row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    TooFewColumns,
    MissingRequiredField,
    EmptyTeamAfterCleaning,
    InvalidOdds,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewColumns => write!(f, "too_few_columns"),
            Self::MissingRequiredField => write!(f, "missing_required_field"),
            Self::EmptyTeamAfterCleaning => write!(f, "empty_team_after_cleaning"),
            Self::InvalidOdds => write!(f, "invalid_odds"),
        }
    }
}

/// Outcome of normalizing one document.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    /// Data rows seen, header excluded.
    pub rows: usize,
    pub matches: Vec<MatchRecord>,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl ParseReport {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    fn skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }
}

/// Normalize a whole document, keeping only the records.
pub fn normalize(text: &str) -> Vec<MatchRecord> {
    normalize_with_report(text).matches
}

/// Normalize a whole document, odds passed through untouched.
pub fn normalize_with_report(text: &str) -> ParseReport {
    normalize_with_policy(text, OddsPolicy::Passthrough)
}

/// Normalize a whole document, dropping rows the odds policy rejects.
pub fn normalize_with_policy(text: &str, policy: OddsPolicy) -> ParseReport {
    let mut report = ParseReport::default();

    for line in text.trim().split('\n').skip(1) {
        report.rows += 1;
        let line = line.strip_suffix('\r').unwrap_or(line);

        match parse_row(line) {
            Ok(record) if policy.accepts(&record) => report.matches.push(record),
            Ok(_) => report.skip(SkipReason::InvalidOdds),
            Err(reason) => report.skip(reason),
        }
    }

    report
}

/// Map one data line to a record.
pub fn parse_row(line: &str) -> Result<MatchRecord, SkipReason> {
    let row = tokenize_line(line);
    if row.len() < MIN_COLUMNS {
        return Err(SkipReason::TooFewColumns);
    }

    let field = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or("");
    let odd = |i: usize| match field(i) {
        "" => DEFAULT_ODD.to_string(),
        value => value.to_string(),
    };

    let league = field(0);
    let team1 = field(4);
    let team2 = field(5);
    if league.is_empty() || team1.is_empty() || team2.is_empty() {
        return Err(SkipReason::MissingRequiredField);
    }

    let team1 = clean_team_name(team1);
    let team2 = clean_team_name(team2);
    if team1.is_empty() || team2.is_empty() {
        return Err(SkipReason::EmptyTeamAfterCleaning);
    }

    Ok(MatchRecord {
        sport: classify_sport(league),
        league: league.to_string(),
        id: field(1).to_string(),
        date: field(2).to_string(),
        time: field(3).to_string(),
        team1,
        team2,
        p1: odd(6),
        x: odd(7),
        p2: odd(8),
        p1x: odd(9),
        p12: odd(10),
        px2: odd(11),
    })
}

/// Strip embedded "D MON H:MM" fragments from a team name and re-trim.
///
/// Removing one fragment can join its neighbours into a new one
/// (`"5 ab 6 cd 7:891:00"` leaves `"5 ab 1:00"`), so stripping repeats until
/// nothing matches. Every pass removes at least one character.
pub fn clean_team_name(name: &str) -> String {
    let mut cleaned = name.to_string();
    while EMBEDDED_DATE_TIME.is_match(&cleaned) {
        cleaned = EMBEDDED_DATE_TIME.replace_all(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}
