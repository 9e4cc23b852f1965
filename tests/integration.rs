//! Integration tests for cross-module functionality.

use chrono::{TimeZone, Utc};

use matchfeed::config::ParserConfig;
use matchfeed::feed::{build_feed, FeedError, MatchFeed};
use matchfeed::matches::normalizer::clean_team_name;
use matchfeed::matches::{
    classify_sport, normalize, normalize_with_policy, tokenize_line, OddsPolicy, SkipReason, Sport,
};

const HEADER: &str = "Лига,ID,Дата,Время,Команда 1,Команда 2,П1,X,П2,1X,12,X2";

fn sheet(rows: &[&str]) -> String {
    std::iter::once(HEADER)
        .chain(rows.iter().copied())
        .collect::<Vec<_>>()
        .join("\n")
}

// ──────────────────────────────────────────
// Tokenizer
// ──────────────────────────────────────────

#[test]
fn tokenizer_quoted_comma() {
    assert_eq!(tokenize_line(r#""a,b",c"#), vec!["a,b", "c"]);
}

#[test]
fn tokenizer_escaped_quote() {
    assert_eq!(tokenize_line(r#""a""b",c"#), vec!["a\"b", "c"]);
}

#[test]
fn tokenizer_field_count_is_unquoted_commas_plus_one() {
    let line = r#"a,"b,c",,"d""e",f"#;
    assert_eq!(tokenize_line(line).len(), 5);
}

// ──────────────────────────────────────────
// Normalizer
// ──────────────────────────────────────────

#[test]
fn reference_row_becomes_one_record() {
    let text = sheet(&[
        "Англия. Премьер-лига,123,17 фев,20:45,Арсенал 17 фев 20:45,Челси,2.10,3.40,3.20,1.25,1.10,1.35",
    ]);
    let matches = normalize(&text);
    assert_eq!(matches.len(), 1);

    let value = serde_json::to_value(&matches[0]).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "sport": "football",
            "league": "Англия. Премьер-лига",
            "id": "123",
            "date": "17 фев",
            "time": "20:45",
            "team1": "Арсенал",
            "team2": "Челси",
            "p1": "2.10",
            "x": "3.40",
            "p2": "3.20",
            "p1x": "1.25",
            "p12": "1.10",
            "px2": "1.35",
        })
    );
}

#[test]
fn short_rows_never_yield_records() {
    for row in [
        "",
        "КХЛ",
        "КХЛ,1,,,А,Б",
        "КХЛ,1,,,А,Б,1,2,3,4,5",
        r#""КХЛ,1,,,А,Б,1,2,3,4,5,6""#,
    ] {
        assert!(normalize(&sheet(&[row])).is_empty(), "row: {row}");
    }
}

#[test]
fn record_present_iff_required_fields_survive_cleaning() {
    let cases = [
        ("КХЛ,1,,,СКА,ЦСКА,,,,,,", true),
        (",1,,,СКА,ЦСКА,,,,,,", false),
        ("КХЛ,1,,, ,ЦСКА,,,,,,", false),
        ("КХЛ,1,,,СКА,\"\",,,,,,", false),
        ("КХЛ,1,,,СКА,5 мар 18:00,,,,,,", false),
        ("КХЛ,1,,,СКА 5 мар 18:00,ЦСКА,,,,,,", true),
    ];
    for (row, expected) in cases {
        assert_eq!(normalize(&sheet(&[row])).len() == 1, expected, "row: {row}");
    }
}

#[test]
fn report_counts_every_dropped_row() {
    let text = sheet(&[
        "КХЛ,1,,,СКА,ЦСКА,2.05,4.10,3.00,1.40,1.22,1.75",
        "too,short",
        ",2,,,СКА,ЦСКА,,,,,,",
        "КХЛ,3,,,18:00,1 янв 10:00,,,,,,",
        "КХЛ,4,,,СКА,ЦСКА,,,,,,",
    ]);
    let report = normalize_with_policy(&text, OddsPolicy::Strict);
    assert_eq!(report.rows, 5);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.skipped[&SkipReason::TooFewColumns], 1);
    assert_eq!(report.skipped[&SkipReason::MissingRequiredField], 1);
    assert_eq!(report.skipped[&SkipReason::EmptyTeamAfterCleaning], 1);
    assert_eq!(report.skipped[&SkipReason::InvalidOdds], 1);
}

#[test]
fn date_stripping_is_idempotent() {
    for name in [
        "Зенит 1 янв 10:00",
        "Зенит",
        "3 Mar 9:05 Boston 4 Apr 10:15",
        "Зенит 5 ab 6 cd 7:891:00",
    ] {
        let once = clean_team_name(name);
        assert_eq!(clean_team_name(&once), once, "name: {name}");
    }
}

#[test]
fn nested_date_fragments_do_not_survive_into_records() {
    let matches = normalize(&sheet(&["КХЛ,1,,,Зенит 5 ab 6 cd 7:891:00,ЦСКА,,,,,,"]));
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].team1, "Зенит");
}

// ──────────────────────────────────────────
// Sport classification
// ──────────────────────────────────────────

#[test]
fn unknown_league_is_football() {
    assert_eq!(classify_sport("Случайный Турнир"), Sport::Football);
}

#[test]
fn records_carry_their_sport() {
    let text = sheet(&[
        "КХЛ,1,,,СКА,ЦСКА,,,,,,",
        "NBA,2,,,Лейкерс,Бостон,,,,,,",
        "CS2. Major,3,,,NaVi,G2,,,,,,",
        "Хоккей. Кубок Шпенглера,4,,,Давос,Фрибур,,,,,,",
        "Случайный Турнир,5,,,А,Б,,,,,,",
    ]);
    let sports: Vec<Sport> = normalize(&text).iter().map(|m| m.sport).collect();
    assert_eq!(
        sports,
        vec![
            Sport::Hockey,
            Sport::Basket,
            Sport::Esports,
            // "кубок" is a football keyword and is checked first
            Sport::Football,
            Sport::Football,
        ]
    );
}

// ──────────────────────────────────────────
// Feed envelope
// ──────────────────────────────────────────

#[test]
fn feed_round_trips_through_json() {
    let built_at = Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap();
    let feed = build_feed(
        &sheet(&["NBA,2,,,Лейкерс,Бостон,1.90,15.0,1.95,1.05,1.01,1.06"]),
        &ParserConfig::default(),
        built_at,
    )
    .unwrap();

    let json = serde_json::to_string(&feed).unwrap();
    assert!(json.contains("\"last_update\":\"2026-03-01 18:00:00\""));
    assert!(json.contains("Лейкерс"));

    let back: MatchFeed = serde_json::from_str(&json).unwrap();
    assert_eq!(back, feed);
}

#[test]
fn empty_document_is_a_feed_error() {
    let err = build_feed("", &ParserConfig::default(), Utc::now()).unwrap_err();
    assert_eq!(err, FeedError::EmptyDocument);
}
