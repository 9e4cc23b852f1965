//! League-name based sport detection.
//!
//! Known leagues are matched by exact prefix first, in table order. Anything
//! else falls through to lower-cased keyword patterns, and finally to
//! football.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::matches::models::Sport;

/// Ordered (prefix, sport) rules. First match wins.
pub const PREFIX_RULES: &[(&str, Sport)] = &[
    // Football
    ("Лига чемпионов УЕФА", Sport::Football),
    ("Лига Европы УЕФА", Sport::Football),
    ("Лига конференций УЕФА", Sport::Football),
    ("Англия. Премьер-лига", Sport::Football),
    ("Англия. Кубок", Sport::Football),
    ("Испания. Ла Лига", Sport::Football),
    ("Италия. Серия A", Sport::Football),
    ("Германия. Бундеслига", Sport::Football),
    ("Франция. Лига 1", Sport::Football),
    ("Россия. Премьер-лига", Sport::Football),
    ("Россия. Кубок", Sport::Football),
    ("MLS", Sport::Football),
    ("Бразилия", Sport::Football),
    ("Аргентина", Sport::Football),
    ("Нидерланды", Sport::Football),
    ("Португалия", Sport::Football),
    ("Турция", Sport::Football),
    // Hockey
    ("КХЛ", Sport::Hockey),
    ("НХЛ", Sport::Hockey),
    ("NHL", Sport::Hockey),
    ("ВХЛ", Sport::Hockey),
    ("MHL", Sport::Hockey),
    ("AHL", Sport::Hockey),
    // Basketball
    ("NBA", Sport::Basket),
    ("НБА", Sport::Basket),
    ("Евролига", Sport::Basket),
    ("Единая лига ВТБ", Sport::Basket),
    ("EuroLeague", Sport::Basket),
    // Esports
    ("Dota 2", Sport::Esports),
    ("CS2", Sport::Esports),
    ("Counter-Strike", Sport::Esports),
    ("Valorant", Sport::Esports),
    ("League of Legends", Sport::Esports),
    ("LoL", Sport::Esports),
    ("Overwatch", Sport::Esports),
    ("Rocket League", Sport::Esports),
];

/// Keyword fallback, checked in this order against the lower-cased league.
static KEYWORD_RULES: Lazy<Vec<(Sport, Regex)>> = Lazy::new(|| {
    [
        (Sport::Football, "футбол|лига|премьер|кубок|uefa|уефа"),
        (Sport::Hockey, "хоккей|кхл|нхл|hockey|nhl"),
        (Sport::Basket, "баскет|nba|евролига"),
        (Sport::Esports, "dota|cs2|counter-strike|киберспорт|esports"),
    ]
    .into_iter()
    .map(|(sport, pattern)| {
        let re = Regex::new(pattern).expect("sport keyword pattern is valid");
        (sport, re)
    })
    .collect()
});

/// Classify a league name. Never fails; unknown leagues are football.
pub fn classify_sport(league: &str) -> Sport {
    if let Some(sport) = match_prefix(league) {
        return sport;
    }

    let lower = league.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(_, re)| re.is_match(&lower))
        .map(|(sport, _)| *sport)
        .unwrap_or_default()
}

fn match_prefix(league: &str) -> Option<Sport> {
    PREFIX_RULES
        .iter()
        .find(|(prefix, _)| league.starts_with(*prefix))
        .map(|(_, sport)| *sport)
}
