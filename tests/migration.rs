//! Integration tests for league schema migration.

use league_bracket::logic::{league_version, load_league, needs_migration};
use league_bracket::{migrate_league, League, LeagueError, Sport};
use serde_json::json;

fn pre_versioned() -> serde_json::Value {
    json!({
        "slug": "club",
        "name": "Club",
        "sport": "ping-pong",
        "players": [{ "id": "a", "name": "A" }],
        "seasons": [{
            "id": "s1",
            "name": "Spring",
            "players": ["a"],
            "startDate": "2024-03-01",
            "endDate": "2024-05-31",
            "matches": [],
            "sport": "tennis"
        }],
        "brackets": [{ "id": "b1", "rounds": [[]], "players": ["a"], "name": "" }]
    })
}

#[test]
fn pre_versioned_document_is_upgraded() {
    let raw = pre_versioned();
    assert_eq!(league_version(&raw), -1);
    assert!(needs_migration(&raw));

    let migration = migrate_league(raw).unwrap();
    assert_eq!(migration.original_version, -1);
    assert_eq!(migration.new_version, 0);
    assert_eq!(migration.changes.len(), 1);

    let league = migration.league;
    assert_eq!(league.version, 0);
    assert_eq!(league.sport, Sport::Simple);
    assert_eq!(league.seasons[0].sport, None);
    assert_eq!(league.brackets[0].name, "Untitled Bracket");
    assert!(league.brackets[0].seedings.is_empty());
    assert!(league.brackets[0].final_match.is_none());
}

#[test]
fn missing_collections_and_timestamps_are_filled() {
    let league = load_league(json!({ "slug": "bare", "name": "Bare" })).unwrap();
    assert!(league.players.is_empty());
    assert!(league.seasons.is_empty());
    assert!(league.brackets.is_empty());
    assert_eq!(league.sport, Sport::Simple);
    assert_eq!(league.created_at, league.updated_at);
}

#[test]
fn current_document_passes_through() {
    let original = League::new("club", "Club", Sport::Tennis);
    let raw = serde_json::to_value(&original).unwrap();
    assert!(!needs_migration(&raw));

    let migration = migrate_league(raw).unwrap();
    assert!(migration.changes.is_empty());
    assert_eq!(migration.league, original);
}

#[test]
fn unknown_versions_are_rejected() {
    let mut raw = serde_json::to_value(League::new("club", "Club", Sport::Simple)).unwrap();
    raw["version"] = json!(7);
    assert_eq!(migrate_league(raw).unwrap_err(), LeagueError::UnsupportedVersion(7));
}

#[test]
fn malformed_documents_are_rejected() {
    assert!(matches!(
        migrate_league(json!([1, 2, 3])),
        Err(LeagueError::InvalidDocument(_))
    ));
    assert!(matches!(
        migrate_league(json!({ "slug": "x", "name": "X", "players": [{ "id": 5 }] })),
        Err(LeagueError::InvalidDocument(_))
    ));
}

#[test]
fn load_rejects_out_of_range_winner() {
    let mut raw = pre_versioned();
    raw["seasons"][0]["matches"] = json!([{
        "id": "m1",
        "players": [{ "id": "a", "name": "A" }, { "id": "b", "name": "B" }],
        "winner": 4
    }]);
    assert!(matches!(
        load_league(raw),
        Err(LeagueError::InvalidWinnerIndex { index: 4, .. })
    ));
}
