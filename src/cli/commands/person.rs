use crate::cli::parser::PersonAction;
use crate::context::AppContext;
use crate::core::people::PeopleLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::table::Table;

pub fn handle(action: &PersonAction, ctx: &mut AppContext) -> AppResult<()> {
    match action {
        PersonAction::Add { name, emoji } => {
            let id = PeopleLogic::add(ctx, name, emoji.as_deref())?;
            success(format!("Added {} ({})", name.trim(), id));
        }

        PersonAction::List => {
            let selected = PeopleLogic::selected(ctx).map(|p| p.id.clone());
            let mut table = Table::new(&["", "ID", "Name"]);
            for p in PeopleLogic::list(ctx) {
                let mark = if selected.as_deref() == Some(p.id.as_str()) { "▶" } else { "" };
                table.add_row(vec![
                    mark.to_string(),
                    p.id.clone(),
                    format!("{} {}", p.emoji, p.name),
                ]);
            }
            print!("{}", table.render());
        }

        PersonAction::Edit { id, name, emoji } => {
            let p = PeopleLogic::update(ctx, id, name.as_deref(), emoji.as_deref())?;
            success(format!("Updated {} {}", p.emoji, p.name));
        }

        PersonAction::Delete { id } => {
            let p = PeopleLogic::delete(ctx, id)?;
            success(format!("Removed {}", p.name));
        }

        PersonAction::Select { id } => {
            PeopleLogic::select(ctx, id)?;
            success(format!("Selected {}", id));
        }
    }

    Ok(())
}
