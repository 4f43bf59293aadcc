//! Upgrade older configuration files in place.
//!
//! Files written by earlier releases lack keys added later (currency,
//! budget, people, sync settings). Missing keys are filled with their
//! defaults; existing values are never touched.

use super::{Config, default_currency, default_locale};
use crate::errors::AppResult;
use crate::models::person::default_people;
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

fn defaults() -> AppResult<Vec<(&'static str, Value)>> {
    Ok(vec![
        ("locale", Value::String(default_locale())),
        ("currency", Value::String(default_currency())),
        ("budget", Value::from(0.0)),
        ("gist_id", Value::Null),
        ("gist_token", Value::Null),
        ("people", serde_yaml::to_value(default_people())?),
        ("selected_person", Value::Null),
        ("time_offset_minutes", Value::from(0)),
    ])
}

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path)?;
    let yaml: Value = serde_yaml::from_str(&content)?;
    Ok(match yaml {
        Value::Mapping(m) => m,
        _ => Mapping::new(),
    })
}

/// Keys a config file is missing.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let map = read_mapping(path)?;
    let mut missing = Vec::new();

    if !map.contains_key(Value::String("database".into())) {
        missing.push("database".to_string());
    }
    for (key, _) in defaults()? {
        if !map.contains_key(Value::String(key.into())) {
            missing.push(key.to_string());
        }
    }
    Ok(missing)
}

/// Fill every missing key with its default and rewrite the file.
/// Returns the keys that were added.
pub fn migrate_config_file(path: &Path) -> AppResult<Vec<String>> {
    if !path.exists() {
        info(format!("No configuration file at {:?}: nothing to migrate.", path));
        return Ok(Vec::new());
    }

    let mut map = read_mapping(path)?;
    let mut added = Vec::new();

    let db_key = Value::String("database".into());
    if !map.contains_key(&db_key) {
        map.insert(
            db_key,
            Value::String(Config::database_file().to_string_lossy().to_string()),
        );
        added.push("database".to_string());
    }

    for (key, value) in defaults()? {
        let k = Value::String(key.into());
        if !map.contains_key(&k) {
            map.insert(k, value);
            added.push(key.to_string());
        }
    }

    if !added.is_empty() {
        fs::write(path, serde_yaml::to_string(&Value::Mapping(map))?)?;
        success(format!("Configuration migrated: added {}", added.join(", ")));
    }

    Ok(added)
}
