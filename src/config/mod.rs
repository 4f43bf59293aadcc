use crate::errors::{AppError, AppResult};
use crate::models::person::{Person, default_people};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub gist_id: Option<String>,
    #[serde(default)]
    pub gist_token: Option<String>,
    #[serde(default = "default_people")]
    pub people: Vec<Person>,
    #[serde(default)]
    pub selected_person: Option<String>,
    /// Development time offset applied to every "now".
    #[serde(default)]
    pub time_offset_minutes: i64,
}

pub(crate) fn default_locale() -> String {
    "en".to_string()
}

pub(crate) fn default_currency() -> String {
    "USD".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file().to_string_lossy().to_string())
    }
}

impl Config {
    pub fn with_database(database: String) -> Self {
        Self {
            database,
            locale: default_locale(),
            currency: default_currency(),
            budget: 0.0,
            gist_id: None,
            gist_token: None,
            people: default_people(),
            selected_person: None,
            time_offset_minutes: 0,
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rhousekeep")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rhousekeep")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rhousekeep.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rhousekeep.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let mut cfg: Config = serde_yaml::from_str(&content)?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&Self::config_file())
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())
            .map_err(|_| AppError::ConfigSave)?;
        Ok(())
    }

    /// The selected person, falling back to the first one.
    pub fn selected_person(&self) -> Option<&Person> {
        self.selected_person
            .as_deref()
            .and_then(|id| self.people.iter().find(|p| p.id == id))
            .or_else(|| self.people.first())
    }

    pub fn has_remote(&self) -> bool {
        self.gist_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }

    /// Initialize configuration and database files. Returns the database path.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<String> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };
        let db_str = db_path.to_string_lossy().to_string();

        if !is_test {
            // keep user settings when re-initialising
            let mut config = Self::load().unwrap_or_default();
            config.database = db_str.clone();
            config.save()?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_str)
    }
}
