use super::grocery::zero_based;
use crate::cli::parser::ExpenseAction;
use crate::context::AppContext;
use crate::core::expenses::ExpenseLogic;
use crate::errors::AppResult;
use crate::models::expense::ExpensePatch;
use crate::ui::messages::{detail, info, success};
use crate::utils::colors::{GREY, RESET, color_for_balance, colorize_optional};
use crate::utils::formatting::format_money;
use crate::utils::table::Table;

fn budget_line(ctx: &AppContext) -> String {
    let budget = ctx.config.budget;
    format!(
        "Budget: {}{}{}",
        color_for_balance(budget),
        format_money(budget, &ctx.config.currency),
        RESET
    )
}

pub fn handle(action: &ExpenseAction, ctx: &mut AppContext) -> AppResult<()> {
    match action {
        ExpenseAction::Add {
            name,
            cost,
            description,
        } => {
            let e = ExpenseLogic::add(ctx, name, description.as_deref(), *cost)?;
            success(format!(
                "Added #{} {} ({})",
                e.id,
                e.name,
                format_money(e.cost, &ctx.config.currency)
            ));
        }

        ExpenseAction::List => {
            let expenses = ExpenseLogic::list(ctx)?;
            if expenses.is_empty() {
                info("No expenses planned");
                detail(budget_line(ctx));
                return Ok(());
            }

            let currency = ctx.config.currency.clone();
            let mut table = Table::new(&["", "ID", "Expense", "Cost", "Notes"]);
            for e in &expenses {
                let (mark, name) = if e.completed {
                    ("✔", format!("{GREY}{}{RESET}", e.name))
                } else {
                    ("•", e.name.clone())
                };
                table.add_row(vec![
                    mark.to_string(),
                    e.id.to_string(),
                    name,
                    format_money(e.cost, &currency),
                    colorize_optional(e.description.as_deref().unwrap_or("--")),
                ]);
            }
            println!("💸 Expenses:\n");
            print!("{}", table.render());
            println!();
            println!(
                "Still to pay: {}",
                format_money(ExpenseLogic::open_total(ctx)?, &currency)
            );
            println!("{}", budget_line(ctx));
        }

        ExpenseAction::Done { id } | ExpenseAction::Reopen { id } => {
            let paid = matches!(action, ExpenseAction::Done { .. });
            let e = ExpenseLogic::set_completed(ctx, *id, paid)?;
            success(format!(
                "{} {}",
                e.name,
                if paid { "paid" } else { "reopened" }
            ));
            detail(budget_line(ctx));
        }

        ExpenseAction::Edit {
            id,
            name,
            cost,
            description,
        } => {
            let patch = ExpensePatch {
                name: name.clone(),
                description: description.clone(),
                cost: *cost,
            };
            let e = ExpenseLogic::update(ctx, *id, &patch)?;
            success(format!("Expense #{} updated", e.id));
        }

        ExpenseAction::Delete { id } => {
            let e = ExpenseLogic::delete(ctx, *id)?;
            success(format!("Removed {}", e.name));
        }

        ExpenseAction::Move { id, position } => {
            let e = ExpenseLogic::move_to(ctx, *id, zero_based(*position)?)?;
            success(format!("Moved {} to position {}", e.name, position));
        }
    }

    Ok(())
}
