use crate::cli::parser::Commands;
use crate::config::Config;
use crate::context::AppContext;
use crate::core::config::ConfigLogic;
use crate::core::people::PeopleLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::formatting::format_money;

/// Handle the `config` subcommand. Only the `--set-*` options open the database.
pub fn handle(cmd: &Commands, cfg: &Config, persist: bool) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
        check,
        migrate,
        set_currency,
        set_budget,
        set_gist_id,
        set_gist_token,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", ConfigLogic::render(cfg)?);
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor.as_deref())?;
        }

        if *check {
            ConfigLogic::check(&path)?;
        }

        if *migrate {
            ConfigLogic::migrate(&path)?;
        }

        let has_updates = set_currency.is_some()
            || set_budget.is_some()
            || set_gist_id.is_some()
            || set_gist_token.is_some();
        if !has_updates {
            return Ok(());
        }

        let mut ctx = AppContext::open(cfg.clone(), persist)?;

        if let Some(currency) = set_currency {
            PeopleLogic::set_currency(&mut ctx, currency)?;
            success(format!("Currency set to {}", ctx.config.currency));
        }

        if let Some(budget) = set_budget {
            PeopleLogic::set_budget(&mut ctx, *budget)?;
            success(format!(
                "Budget set to {}",
                format_money(ctx.config.budget, &ctx.config.currency)
            ));
        }

        if let Some(id) = set_gist_id {
            let id = id.trim();
            ctx.config.gist_id = if id.is_empty() { None } else { Some(id.to_string()) };
            ctx.save_config()?;
            match &ctx.config.gist_id {
                Some(id) => success(format!("Remote gist set to {}", id)),
                None => success("Remote gist unset"),
            }
        }

        if let Some(token) = set_gist_token {
            let token = token.trim();
            ctx.config.gist_token = if token.is_empty() { None } else { Some(token.to_string()) };
            ctx.save_config()?;
            success("Gist token updated");
        }
    }

    Ok(())
}
