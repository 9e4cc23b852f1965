//! Optional sanity check on quoted odds.
//!
//! Rows copied from bookmaker pages sometimes carry placeholder or garbage
//! prices. With [`OddsPolicy::Strict`] such rows are dropped; the default
//! [`OddsPolicy::Passthrough`] never looks at the odds at all.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::matches::models::MatchRecord;

pub const MIN_ODD: Decimal = dec!(1.01);
pub const MAX_ODD: Decimal = dec!(999.99);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsPolicy {
    #[default]
    Passthrough,
    Strict,
}

impl OddsPolicy {
    pub fn accepts(&self, record: &MatchRecord) -> bool {
        match self {
            Self::Passthrough => true,
            Self::Strict => has_plausible_odds(record),
        }
    }
}

/// A quoted odd is usable if it is a decimal within [`MIN_ODD`, `MAX_ODD`].
pub fn is_valid_odd(raw: &str) -> bool {
    let s = raw.trim();
    if s.is_empty() || s == "0.00" {
        return false;
    }
    match Decimal::from_str(s) {
        Ok(value) => (MIN_ODD..=MAX_ODD).contains(&value),
        Err(_) => false,
    }
}

/// All three main odds must be valid, plus at least two double-chance odds.
pub fn has_plausible_odds(record: &MatchRecord) -> bool {
    let main_ok = record.main_odds().iter().all(|odd| is_valid_odd(odd));
    let double_chance_valid = record
        .double_chance_odds()
        .iter()
        .filter(|odd| is_valid_odd(odd))
        .count();
    main_ok && double_chance_valid >= 2
}
