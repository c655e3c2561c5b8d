//! Schema migration for stored league documents.
//!
//! Documents written before versioning have no `version` field and are
//! treated as version -1.

use crate::models::{League, LeagueError, CURRENT_LEAGUE_VERSION};
use chrono::Utc;
use serde_json::{Map, Value};

/// Outcome of migrating one document.
#[derive(Clone, Debug)]
pub struct Migration {
    pub original_version: i64,
    pub new_version: u32,
    /// Human-readable list of applied steps; empty if the document was current.
    pub changes: Vec<String>,
    pub league: League,
}

/// Schema version of a raw document, -1 if it has none.
pub fn league_version(raw: &Value) -> i64 {
    raw.get("version").and_then(Value::as_i64).unwrap_or(-1)
}

pub fn needs_migration(raw: &Value) -> bool {
    league_version(raw) < i64::from(CURRENT_LEAGUE_VERSION)
}

/// Bring a raw document to the current schema and parse it.
pub fn migrate_league(raw: Value) -> Result<Migration, LeagueError> {
    let original_version = league_version(&raw);
    let Value::Object(mut doc) = raw else {
        return Err(LeagueError::InvalidDocument("league must be a JSON object".to_string()));
    };
    let mut changes = Vec::new();
    let mut version = original_version;

    if version == -1 {
        migrate_from_pre_versioned(&mut doc);
        changes.push("Migrated from pre-versioned data to version 0".to_string());
        version = 0;
    }

    if version != i64::from(CURRENT_LEAGUE_VERSION) {
        return Err(LeagueError::UnsupportedVersion(original_version));
    }

    let league: League = serde_json::from_value(Value::Object(doc))
        .map_err(|e| LeagueError::InvalidDocument(e.to_string()))?;
    if !changes.is_empty() {
        log::info!(
            "League {} migrated from v{} to v{}: {:?}",
            league.slug,
            original_version,
            CURRENT_LEAGUE_VERSION,
            changes
        );
    }
    Ok(Migration {
        original_version,
        new_version: CURRENT_LEAGUE_VERSION,
        changes,
        league,
    })
}

/// Parse a stored document, migrating it first when needed.
pub fn load_league(raw: Value) -> Result<League, LeagueError> {
    let league = migrate_league(raw)?.league;
    league.validate()?;
    Ok(league)
}

fn ensure_array(obj: &mut Map<String, Value>, key: &str) {
    if !obj.get(key).is_some_and(Value::is_array) {
        obj.insert(key.to_string(), Value::Array(Vec::new()));
    }
}

fn is_blank(obj: &Map<String, Value>, key: &str) -> bool {
    match obj.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn migrate_from_pre_versioned(doc: &mut Map<String, Value>) {
    doc.insert("version".to_string(), Value::from(0));

    let sport = match doc.get("sport").and_then(Value::as_str) {
        None | Some("") | Some("ping-pong") => "simple".to_string(),
        Some(other) => other.to_string(),
    };
    doc.insert("sport".to_string(), Value::String(sport));

    for key in ["players", "seasons", "brackets"] {
        ensure_array(doc, key);
    }

    let now = Utc::now().to_rfc3339();
    for key in ["createdAt", "updatedAt"] {
        if is_blank(doc, key) {
            doc.insert(key.to_string(), Value::String(now.clone()));
        }
    }

    // Sport moved from seasons to the league.
    if let Some(Value::Array(seasons)) = doc.get_mut("seasons") {
        for season in seasons.iter_mut().filter_map(Value::as_object_mut) {
            season.remove("sport");
        }
    }

    // `rounds` was replaced by the `finalMatch` tree.
    if let Some(Value::Array(brackets)) = doc.get_mut("brackets") {
        for bracket in brackets.iter_mut().filter_map(Value::as_object_mut) {
            bracket.remove("rounds");
            ensure_array(bracket, "players");
            ensure_array(bracket, "seedings");
            if is_blank(bracket, "name") {
                bracket.insert("name".to_string(), Value::String("Untitled Bracket".to_string()));
            }
        }
    }
}
