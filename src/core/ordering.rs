//! Manual ordering shared by groceries and expenses.

/// Move `id` to `position` (0-based, clamped) within `ids`, which must be
/// in display order. Returns `None` when `id` is not in the list.
pub fn move_to_position(mut ids: Vec<i64>, id: i64, position: usize) -> Option<Vec<i64>> {
    let from = ids.iter().position(|x| *x == id)?;
    ids.remove(from);
    let to = position.min(ids.len());
    ids.insert(to, id);
    Some(ids)
}

/// Next free order value after `max`.
pub fn next_order(max: Option<i64>) -> i64 {
    max.map(|m| m + 1).unwrap_or(0)
}

