use crate::config::Config;
use crate::config::migrate::{migrate_config_file, missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// The configuration as YAML. The gist token is masked.
    pub fn render(cfg: &Config) -> AppResult<String> {
        let mut shown = cfg.clone();
        if let Some(token) = &shown.gist_token
            && !token.is_empty()
        {
            shown.gist_token = Some(mask(token));
        }
        Ok(serde_yaml::to_string(&shown)?)
    }

    /// Open `path` in the requested editor, falling back to $EDITOR/$VISUAL
    /// (or nano/notepad) when it cannot be started.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let default_editor = std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            });
        let editor_to_use = editor.map(str::to_string).unwrap_or_else(|| default_editor.clone());

        match Command::new(&editor_to_use).arg(path).status() {
            Ok(s) if s.success() => {
                success(format!("Configuration file edited using '{}'", editor_to_use));
                return Ok(());
            }
            _ if editor_to_use == default_editor => {}
            _ => warning(format!(
                "Editor '{}' not available, falling back to '{}'",
                editor_to_use, default_editor
            )),
        }

        match Command::new(&default_editor).arg(path).status() {
            Ok(s) if s.success() => {
                success(format!("Configuration file edited using '{}'", default_editor));
                Ok(())
            }
            _ => Err(AppError::Config(format!(
                "Failed to edit configuration file with '{}'",
                default_editor
            ))),
        }
    }

    /// Report the keys `path` is missing. Returns them.
    pub fn check(path: &Path) -> AppResult<Vec<String>> {
        if !path.exists() {
            info(format!("No configuration file at {}", path.display()));
            return Ok(Vec::new());
        }
        let missing = missing_keys(path)?;
        if missing.is_empty() {
            success("Configuration file is up to date.");
        } else {
            warning(format!(
                "Missing keys: {} (run `config --migrate`)",
                missing.join(", ")
            ));
        }
        Ok(missing)
    }

    pub fn migrate(path: &Path) -> AppResult<Vec<String>> {
        let added = migrate_config_file(path)?;
        if added.is_empty() {
            info("Nothing to migrate.");
        }
        Ok(added)
    }
}

fn mask(token: &str) -> String {
    let tail: String = token.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("****{}", tail)
}
