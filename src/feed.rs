//! Feed envelope served to the betting front-end.
//!
//! Wraps the normalized records with the time they were built, and gives
//! failures the same shape so clients can always read `matches`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ParserConfig;
use crate::matches::{normalize_with_policy, MatchRecord, Sport};

pub const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("document is empty")]
    EmptyDocument,
    #[error("no matches parsed from {rows} data rows")]
    NoMatches { rows: usize },
}

/// Successful feed: `{"last_update": "...", "matches": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchFeed {
    pub last_update: String,
    pub matches: Vec<MatchRecord>,
}

impl MatchFeed {
    pub fn new(matches: Vec<MatchRecord>, built_at: DateTime<Utc>) -> Self {
        Self {
            last_update: built_at.format(LAST_UPDATE_FORMAT).to_string(),
            matches,
        }
    }

    pub fn stats(&self) -> FeedStats {
        FeedStats::from_matches(&self.matches)
    }
}

/// Failure body. Same keys as [`MatchFeed`] plus the error, with no matches.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
    pub last_update: Option<String>,
    pub matches: Vec<MatchRecord>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            last_update: None,
            matches: Vec::new(),
        }
    }
}

/// Per-sport breakdown of a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub total: usize,
    pub leagues: usize,
    pub by_sport: BTreeMap<Sport, usize>,
}

impl FeedStats {
    pub fn from_matches(matches: &[MatchRecord]) -> Self {
        let mut by_sport = BTreeMap::new();
        let mut leagues = BTreeSet::new();
        for m in matches {
            *by_sport.entry(m.sport).or_insert(0) += 1;
            leagues.insert(m.league.as_str());
        }
        Self {
            total: matches.len(),
            leagues: leagues.len(),
            by_sport,
        }
    }
}

impl std::fmt::Display for FeedStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} matches, {} leagues", self.total, self.leagues)?;
        for (sport, count) in &self.by_sport {
            write!(f, ", {sport}: {count}")?;
        }
        Ok(())
    }
}

/// Turn a raw sheet export into a feed.
pub fn build_feed(
    text: &str,
    config: &ParserConfig,
    built_at: DateTime<Utc>,
) -> Result<MatchFeed, FeedError> {
    if text.trim().is_empty() {
        return Err(FeedError::EmptyDocument);
    }

    let report = normalize_with_policy(text, config.odds_policy);

    let skipped: Vec<String> = report
        .skipped
        .iter()
        .map(|(reason, count)| format!("{reason}={count}"))
        .collect();
    tracing::info!(
        rows = report.rows,
        matches = report.matches.len(),
        skipped = report.skipped_total(),
        reasons = %skipped.join(","),
        odds_policy = ?config.odds_policy,
        "Sheet normalized"
    );

    if config.require_matches && report.matches.is_empty() {
        return Err(FeedError::NoMatches { rows: report.rows });
    }

    Ok(MatchFeed::new(report.matches, built_at))
}
