use crate::context::AppContext;
use crate::core::ordering::{move_to_position, next_order};
use crate::db::queries::expenses as xq;
use crate::errors::{AppError, AppResult};
use crate::models::change::{EntityPayload, EntityType};
use crate::models::expense::{Expense, ExpensePatch};
use crate::models::grocery::non_empty;

/// Planned expenses. Completing one pays it out of the configured budget.
pub struct ExpenseLogic;

impl ExpenseLogic {
    pub fn get(ctx: &AppContext, id: i64) -> AppResult<Expense> {
        xq::get_expense(&ctx.pool.conn, id)?.ok_or(AppError::NotFound {
            entity: "Expense",
            id,
        })
    }

    pub fn add(
        ctx: &mut AppContext,
        name: &str,
        description: Option<&str>,
        cost: f64,
    ) -> AppResult<Expense> {
        if name.trim().is_empty() {
            return Err(AppError::Other("Name cannot be empty".into()));
        }
        validate_cost(cost)?;

        let mut e = Expense {
            id: 0,
            name: name.trim().to_string(),
            description: description.and_then(non_empty),
            cost,
            order: next_order(xq::max_order(&ctx.pool.conn)?),
            completed: false,
            created_at: ctx.now(),
        };
        e.id = xq::insert_expense(&ctx.pool.conn, &e)?;

        ctx.ledger.track_add(EntityPayload::Expense(e.clone()));
        ctx.log("add", &format!("expense #{}", e.id), &format!("{} ({:.2})", e.name, e.cost));
        Ok(e)
    }

    pub fn update(ctx: &mut AppContext, id: i64, patch: &ExpensePatch) -> AppResult<Expense> {
        if let Some(cost) = patch.cost {
            validate_cost(cost)?;
        }
        let mut e = Self::get(ctx, id)?;
        patch.apply(&mut e);
        Self::store(ctx, &e)?;
        ctx.log("edit", &format!("expense #{}", id), &e.name);
        Ok(e)
    }

    pub fn delete(ctx: &mut AppContext, id: i64) -> AppResult<Expense> {
        let e = Self::get(ctx, id)?;
        xq::delete_expense(&ctx.pool.conn, id)?;
        ctx.ledger.track_delete(EntityType::Expense, id);
        ctx.log("del", &format!("expense #{}", id), &e.name);
        Ok(e)
    }

    /// Mark paid (deducting the cost from the budget) or reopen (refunding it).
    /// Setting the state it already has changes nothing.
    pub fn set_completed(ctx: &mut AppContext, id: i64, completed: bool) -> AppResult<Expense> {
        let mut e = Self::get(ctx, id)?;
        if e.completed == completed {
            return Ok(e);
        }

        e.completed = completed;
        Self::store(ctx, &e)?;

        let delta = if completed { -e.cost } else { e.cost };
        ctx.config.budget += delta;
        ctx.save_config()?;

        ctx.log(
            if completed { "done" } else { "reopen" },
            &format!("expense #{}", id),
            &format!("{} ({:+.2} budget)", e.name, delta),
        );
        Ok(e)
    }

    /// Move an expense to `position` among the expenses with the same state.
    pub fn move_to(ctx: &mut AppContext, id: i64, position: usize) -> AppResult<Expense> {
        let e = Self::get(ctx, id)?;
        let partition: Vec<Expense> = xq::list_expenses(&ctx.pool.conn)?
            .into_iter()
            .filter(|x| x.completed == e.completed)
            .collect();

        let ids = partition.iter().map(|x| x.id).collect();
        let ordered = move_to_position(ids, id, position).ok_or(AppError::NotFound {
            entity: "Expense",
            id,
        })?;

        for (order, xid) in ordered.iter().enumerate() {
            if let Some(mut x) = partition.iter().find(|x| x.id == *xid).cloned()
                && x.order != order as i64
            {
                x.order = order as i64;
                Self::store(ctx, &x)?;
            }
        }

        Self::get(ctx, id)
    }

    /// Open expenses first, then paid ones, each in manual order.
    pub fn list(ctx: &AppContext) -> AppResult<Vec<Expense>> {
        let (mut open, paid): (Vec<Expense>, Vec<Expense>) = xq::list_expenses(&ctx.pool.conn)?
            .into_iter()
            .partition(|e| !e.completed);
        open.extend(paid);
        Ok(open)
    }

    /// Sum of costs still to be paid.
    pub fn open_total(ctx: &AppContext) -> AppResult<f64> {
        Ok(xq::list_expenses(&ctx.pool.conn)?
            .iter()
            .filter(|e| !e.completed)
            .map(|e| e.cost)
            .sum())
    }

    fn store(ctx: &mut AppContext, e: &Expense) -> AppResult<()> {
        if xq::update_expense(&ctx.pool.conn, e)? == 0 {
            return Err(AppError::NotFound {
                entity: "Expense",
                id: e.id,
            });
        }
        ctx.ledger.track_add_or_update(EntityPayload::Expense(e.clone()));
        Ok(())
    }
}

fn validate_cost(cost: f64) -> AppResult<()> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(AppError::InvalidAmount(cost.to_string()));
    }
    Ok(())
}
