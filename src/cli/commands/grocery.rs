use crate::cli::parser::GroceryAction;
use crate::context::AppContext;
use crate::core::groceries::GroceryLogic;
use crate::errors::{AppError, AppResult};
use crate::models::grocery::{GroceryItem, GroceryPatch};
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET, colorize_optional};
use crate::utils::table::Table;

/// CLI positions are 1-based.
pub(crate) fn zero_based(position: usize) -> AppResult<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| AppError::Other("Positions start at 1".into()))
}

pub fn handle(action: &GroceryAction, ctx: &mut AppContext) -> AppResult<()> {
    match action {
        GroceryAction::Add {
            name,
            quantity,
            category,
        } => {
            let item = GroceryLogic::add(ctx, name, quantity.as_deref(), category.as_deref())?;
            success(format!("Added #{} {}", item.id, item.name));
        }

        GroceryAction::List => {
            let (unchecked, checked) = GroceryLogic::list(ctx)?;
            if unchecked.is_empty() && checked.is_empty() {
                info("The shopping list is empty");
                return Ok(());
            }

            let mut table = Table::new(&["", "ID", "Item", "Qty", "Category"]);
            for g in &unchecked {
                table.add_row(row(g, false));
            }
            for g in &checked {
                table.add_row(row(g, true));
            }
            println!("🛒 Shopping list ({} to buy):\n", unchecked.len());
            print!("{}", table.render());
        }

        GroceryAction::Toggle { id } => {
            let item = GroceryLogic::toggle(ctx, *id)?;
            success(format!(
                "{} {}",
                item.name,
                if item.checked { "checked" } else { "unchecked" }
            ));
        }

        GroceryAction::Edit {
            id,
            name,
            quantity,
            category,
        } => {
            let patch = GroceryPatch {
                name: name.clone(),
                quantity: quantity.clone(),
                category: category.clone(),
            };
            let item = GroceryLogic::update(ctx, *id, &patch)?;
            success(format!("Grocery #{} updated", item.id));
        }

        GroceryAction::Delete { id } => {
            let item = GroceryLogic::delete(ctx, *id)?;
            success(format!("Removed {}", item.name));
        }

        GroceryAction::ClearChecked => {
            let n = GroceryLogic::clear_checked(ctx)?;
            success(format!("Removed {} checked item(s)", n));
        }

        GroceryAction::UncheckAll => {
            let n = GroceryLogic::uncheck_all(ctx)?;
            success(format!("Unchecked {} item(s)", n));
        }

        GroceryAction::Move { id, position } => {
            let item = GroceryLogic::move_to(ctx, *id, zero_based(*position)?)?;
            success(format!("Moved {} to position {}", item.name, position));
        }
    }

    Ok(())
}

fn row(g: &GroceryItem, checked: bool) -> Vec<String> {
    let mark = if checked { "☑" } else { "☐" };
    let name = if checked {
        format!("{GREY}{}{RESET}", g.name)
    } else {
        g.name.clone()
    };
    vec![
        mark.to_string(),
        g.id.to_string(),
        name,
        colorize_optional(g.quantity.as_deref().unwrap_or("--")),
        colorize_optional(g.category.as_deref().unwrap_or("--")),
    ]
}
