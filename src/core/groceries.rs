use crate::context::AppContext;
use crate::core::ordering::{move_to_position, next_order};
use crate::db::queries::groceries as gq;
use crate::errors::{AppError, AppResult};
use crate::models::change::{EntityPayload, EntityType};
use crate::models::grocery::{GroceryItem, GroceryPatch, non_empty};

/// Grocery list logic. Lists are split into unchecked and checked items,
/// each in manual order.
pub struct GroceryLogic;

impl GroceryLogic {
    pub fn get(ctx: &AppContext, id: i64) -> AppResult<GroceryItem> {
        gq::get_grocery(&ctx.pool.conn, id)?.ok_or(AppError::NotFound {
            entity: "Grocery item",
            id,
        })
    }

    pub fn add(
        ctx: &mut AppContext,
        name: &str,
        quantity: Option<&str>,
        category: Option<&str>,
    ) -> AppResult<GroceryItem> {
        if name.trim().is_empty() {
            return Err(AppError::Other("Name cannot be empty".into()));
        }

        let mut item = GroceryItem {
            id: 0,
            name: name.trim().to_string(),
            quantity: quantity.and_then(non_empty),
            category: category.and_then(non_empty),
            checked: false,
            created_at: ctx.now(),
            order: next_order(gq::max_order(&ctx.pool.conn)?),
        };
        item.id = gq::insert_grocery(&ctx.pool.conn, &item)?;

        ctx.ledger.track_add(EntityPayload::Grocery(item.clone()));
        ctx.log("add", &format!("grocery #{}", item.id), &item.name);
        Ok(item)
    }

    pub fn toggle(ctx: &mut AppContext, id: i64) -> AppResult<GroceryItem> {
        let mut item = Self::get(ctx, id)?;
        item.checked = !item.checked;
        Self::store(ctx, &item)?;
        Ok(item)
    }

    pub fn update(ctx: &mut AppContext, id: i64, patch: &GroceryPatch) -> AppResult<GroceryItem> {
        let mut item = Self::get(ctx, id)?;
        patch.apply(&mut item);
        Self::store(ctx, &item)?;
        ctx.log("edit", &format!("grocery #{}", id), &item.name);
        Ok(item)
    }

    pub fn delete(ctx: &mut AppContext, id: i64) -> AppResult<GroceryItem> {
        let item = Self::get(ctx, id)?;
        gq::delete_grocery(&ctx.pool.conn, id)?;
        ctx.ledger.track_delete(EntityType::Grocery, id);
        ctx.log("del", &format!("grocery #{}", id), &item.name);
        Ok(item)
    }

    /// Remove every checked item. Returns how many were removed.
    pub fn clear_checked(ctx: &mut AppContext) -> AppResult<usize> {
        let checked: Vec<i64> = gq::list_groceries(&ctx.pool.conn)?
            .into_iter()
            .filter(|g| g.checked)
            .map(|g| g.id)
            .collect();

        let tx = ctx.pool.conn.transaction()?;
        for id in &checked {
            gq::delete_grocery(&tx, *id)?;
        }
        tx.commit()?;

        for id in &checked {
            ctx.ledger.track_delete(EntityType::Grocery, *id);
        }
        ctx.log("del", "groceries", &format!("Cleared {} checked item(s)", checked.len()));
        Ok(checked.len())
    }

    pub fn uncheck_all(ctx: &mut AppContext) -> AppResult<usize> {
        let mut changed = 0;
        for mut item in gq::list_groceries(&ctx.pool.conn)? {
            if item.checked {
                item.checked = false;
                Self::store(ctx, &item)?;
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Move an item to `position` within its own partition.
    pub fn move_to(ctx: &mut AppContext, id: i64, position: usize) -> AppResult<GroceryItem> {
        let item = Self::get(ctx, id)?;
        let (unchecked, checked) = Self::list(ctx)?;
        let partition = if item.checked { checked } else { unchecked };

        let ids = partition.iter().map(|g| g.id).collect();
        let ordered = move_to_position(ids, id, position).ok_or(AppError::NotFound {
            entity: "Grocery item",
            id,
        })?;

        for (order, gid) in ordered.iter().enumerate() {
            if let Some(mut g) = partition.iter().find(|g| g.id == *gid).cloned()
                && g.order != order as i64
            {
                g.order = order as i64;
                Self::store(ctx, &g)?;
            }
        }

        Self::get(ctx, id)
    }

    /// `(unchecked, checked)`, each in manual order.
    pub fn list(ctx: &AppContext) -> AppResult<(Vec<GroceryItem>, Vec<GroceryItem>)> {
        Ok(gq::list_groceries(&ctx.pool.conn)?
            .into_iter()
            .partition(|g| !g.checked))
    }

    fn store(ctx: &mut AppContext, item: &GroceryItem) -> AppResult<()> {
        if gq::update_grocery(&ctx.pool.conn, item)? == 0 {
            return Err(AppError::NotFound {
                entity: "Grocery item",
                id: item.id,
            });
        }
        ctx.ledger
            .track_add_or_update(EntityPayload::Grocery(item.clone()));
        Ok(())
    }
}
