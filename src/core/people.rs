//! People (exercise owners) and money preferences, both kept in the
//! configuration file.

use crate::context::AppContext;
use crate::errors::{AppError, AppResult};
use crate::models::person::Person;

pub const DEFAULT_EMOJI: &str = "🙂";

pub struct PeopleLogic;

impl PeopleLogic {
    pub fn list(ctx: &AppContext) -> &[Person] {
        &ctx.config.people
    }

    pub fn selected(ctx: &AppContext) -> Option<&Person> {
        ctx.config.selected_person()
    }

    /// Add a person and return the generated id.
    pub fn add(ctx: &mut AppContext, name: &str, emoji: Option<&str>) -> AppResult<String> {
        if name.trim().is_empty() {
            return Err(AppError::Other("Name cannot be empty".into()));
        }

        let base = format!("person_{}", ctx.now().timestamp_millis());
        let mut id = base.clone();
        let mut n = 1;
        while ctx.config.people.iter().any(|p| p.id == id) {
            id = format!("{}_{}", base, n);
            n += 1;
        }

        ctx.config.people.push(Person::new(
            &id,
            name.trim(),
            emoji.unwrap_or(DEFAULT_EMOJI),
        ));
        ctx.save_config()?;
        ctx.log("add", &format!("person {}", id), name.trim());
        Ok(id)
    }

    pub fn update(
        ctx: &mut AppContext,
        id: &str,
        name: Option<&str>,
        emoji: Option<&str>,
    ) -> AppResult<Person> {
        let person = ctx
            .config
            .people
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| unknown(id))?;

        if let Some(name) = name {
            person.name = name.trim().to_string();
        }
        if let Some(emoji) = emoji {
            person.emoji = emoji.to_string();
        }
        let updated = person.clone();

        ctx.save_config()?;
        ctx.log("edit", &format!("person {}", id), &updated.name);
        Ok(updated)
    }

    /// Remove a person. The last remaining person cannot be removed; when
    /// the selected person goes, the first one left becomes selected.
    pub fn delete(ctx: &mut AppContext, id: &str) -> AppResult<Person> {
        if ctx.config.people.len() <= 1 {
            return Err(AppError::Config("Cannot delete the last person".into()));
        }
        let index = ctx
            .config
            .people
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| unknown(id))?;

        let removed = ctx.config.people.remove(index);
        if ctx.config.selected_person.as_deref() == Some(id) {
            ctx.config.selected_person = ctx.config.people.first().map(|p| p.id.clone());
        }

        ctx.save_config()?;
        ctx.log("del", &format!("person {}", id), &removed.name);
        Ok(removed)
    }

    pub fn select(ctx: &mut AppContext, id: &str) -> AppResult<()> {
        if !ctx.config.people.iter().any(|p| p.id == id) {
            return Err(unknown(id));
        }
        ctx.config.selected_person = Some(id.to_string());
        ctx.save_config()
    }

    pub fn set_currency(ctx: &mut AppContext, currency: &str) -> AppResult<()> {
        let currency = currency.trim().to_uppercase();
        if currency.is_empty() {
            return Err(AppError::Config("Currency cannot be empty".into()));
        }
        ctx.config.currency = currency;
        ctx.save_config()
    }

    pub fn set_budget(ctx: &mut AppContext, amount: f64) -> AppResult<()> {
        if !amount.is_finite() {
            return Err(AppError::InvalidAmount(amount.to_string()));
        }
        ctx.config.budget = amount;
        ctx.save_config()
    }

    pub fn adjust_budget(ctx: &mut AppContext, delta: f64) -> AppResult<f64> {
        let budget = ctx.config.budget + delta;
        Self::set_budget(ctx, budget)?;
        Ok(ctx.config.budget)
    }
}

fn unknown(id: &str) -> AppError {
    AppError::Config(format!("Unknown person '{}'", id))
}
