use rhousekeep::core::expenses::ExpenseLogic;
use rhousekeep::core::groceries::GroceryLogic;
use rhousekeep::core::ordering::{move_to_position, next_order};
use rhousekeep::core::people::PeopleLogic;
use rhousekeep::errors::AppError;
use rhousekeep::models::change::{ChangeType, EntityType};
use rhousekeep::models::expense::{Expense, ExpensePatch};
use rhousekeep::models::grocery::{GroceryItem, GroceryPatch};

mod common;
use common::test_ctx;

fn grocery_names(items: &[GroceryItem]) -> Vec<&str> {
    items.iter().map(|g| g.name.as_str()).collect()
}

fn expense_names(items: &[Expense]) -> Vec<&str> {
    items.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn move_to_position_clamps_and_rejects_unknown_ids() {
    assert_eq!(move_to_position(vec![1, 2, 3], 3, 0), Some(vec![3, 1, 2]));
    assert_eq!(move_to_position(vec![1, 2, 3], 1, 99), Some(vec![2, 3, 1]));
    assert_eq!(move_to_position(vec![1, 2, 3], 4, 0), None);
    assert_eq!(next_order(None), 0);
    assert_eq!(next_order(Some(7)), 8);
}

#[test]
fn groceries_append_in_order_and_split_by_checked() {
    let (mut ctx, _clock) = test_ctx();
    let milk = GroceryLogic::add(&mut ctx, "Milk", Some("2 l"), Some("Dairy")).expect("added");
    let bread = GroceryLogic::add(&mut ctx, "Bread", None, Some("  ")).expect("added");
    GroceryLogic::add(&mut ctx, "Eggs", Some("12"), None).expect("added");

    assert!(bread.order > milk.order);
    assert!(bread.category.is_none());

    GroceryLogic::toggle(&mut ctx, bread.id).expect("toggled");
    let (unchecked, checked) = GroceryLogic::list(&ctx).expect("list");

    assert_eq!(grocery_names(&unchecked), vec!["Milk", "Eggs"]);
    assert_eq!(grocery_names(&checked), vec!["Bread"]);
}

#[test]
fn grocery_move_stays_within_its_partition() {
    let (mut ctx, _clock) = test_ctx();
    GroceryLogic::add(&mut ctx, "Apples", None, None).expect("added");
    let b = GroceryLogic::add(&mut ctx, "Butter", None, None).expect("added");
    GroceryLogic::add(&mut ctx, "Coffee", None, None).expect("added");
    let d = GroceryLogic::add(&mut ctx, "Dates", None, None).expect("added");
    GroceryLogic::toggle(&mut ctx, b.id).expect("toggled");

    GroceryLogic::move_to(&mut ctx, d.id, 0).expect("moved");

    let (unchecked, checked) = GroceryLogic::list(&ctx).expect("list");
    assert_eq!(grocery_names(&unchecked), vec!["Dates", "Apples", "Coffee"]);
    assert_eq!(grocery_names(&checked), vec!["Butter"]);

    assert!(matches!(
        GroceryLogic::move_to(&mut ctx, 999, 0),
        Err(AppError::NotFound { .. })
    ));
}

#[test]
fn clear_checked_and_uncheck_all() {
    let (mut ctx, _clock) = test_ctx();
    let ids: Vec<i64> = ["Rice", "Salt", "Tea"]
        .iter()
        .map(|n| GroceryLogic::add(&mut ctx, n, None, None).expect("added").id)
        .collect();
    ctx.ledger.clear();

    GroceryLogic::toggle(&mut ctx, ids[0]).expect("toggled");
    GroceryLogic::toggle(&mut ctx, ids[1]).expect("toggled");
    assert_eq!(GroceryLogic::uncheck_all(&mut ctx).expect("unchecked"), 2);

    GroceryLogic::toggle(&mut ctx, ids[2]).expect("toggled");
    assert_eq!(GroceryLogic::clear_checked(&mut ctx).expect("cleared"), 1);

    let (unchecked, checked) = GroceryLogic::list(&ctx).expect("list");
    assert_eq!(unchecked.len(), 2);
    assert!(checked.is_empty());
    assert_eq!(
        ctx.ledger.get(EntityType::Grocery, ids[2]).map(|c| c.change_type),
        Some(ChangeType::Delete)
    );
    assert_eq!(
        ctx.ledger.get(EntityType::Grocery, ids[0]).map(|c| c.change_type),
        Some(ChangeType::Update)
    );
}

#[test]
fn grocery_edit_clears_optional_fields_with_empty_strings() {
    let (mut ctx, _clock) = test_ctx();
    let item = GroceryLogic::add(&mut ctx, "Cheese", Some("200 g"), Some("Dairy")).expect("added");

    let patch = GroceryPatch {
        quantity: Some(String::new()),
        category: Some("Deli".into()),
        ..Default::default()
    };
    let edited = GroceryLogic::update(&mut ctx, item.id, &patch).expect("edited");

    assert_eq!(edited.name, "Cheese");
    assert!(edited.quantity.is_none());
    assert_eq!(edited.category.as_deref(), Some("Deli"));
}

#[test]
fn paying_an_expense_moves_the_budget_once() {
    let (mut ctx, _clock) = test_ctx();
    PeopleLogic::set_budget(&mut ctx, 500.0).expect("budget");
    let e = ExpenseLogic::add(&mut ctx, "New tyres", Some("winter"), 320.0).expect("added");

    ExpenseLogic::set_completed(&mut ctx, e.id, true).expect("paid");
    ExpenseLogic::set_completed(&mut ctx, e.id, true).expect("already paid");
    assert_eq!(ctx.config.budget, 180.0);

    ExpenseLogic::set_completed(&mut ctx, e.id, false).expect("reopened");
    ExpenseLogic::set_completed(&mut ctx, e.id, false).expect("already open");
    assert_eq!(ctx.config.budget, 500.0);
}

#[test]
fn open_total_and_list_order() {
    let (mut ctx, _clock) = test_ctx();
    let rent = ExpenseLogic::add(&mut ctx, "Rent", None, 900.0).expect("added");
    ExpenseLogic::add(&mut ctx, "Gym", None, 35.5).expect("added");
    ExpenseLogic::add(&mut ctx, "Books", None, 20.0).expect("added");

    ExpenseLogic::set_completed(&mut ctx, rent.id, true).expect("paid");

    assert_eq!(ExpenseLogic::open_total(&ctx).expect("total"), 55.5);
    let list = ExpenseLogic::list(&ctx).expect("list");
    assert_eq!(expense_names(&list), vec!["Gym", "Books", "Rent"]);
}

#[test]
fn expense_move_reorders_open_expenses() {
    let (mut ctx, _clock) = test_ctx();
    ExpenseLogic::add(&mut ctx, "A", None, 1.0).expect("added");
    ExpenseLogic::add(&mut ctx, "B", None, 2.0).expect("added");
    let c = ExpenseLogic::add(&mut ctx, "C", None, 3.0).expect("added");

    ExpenseLogic::move_to(&mut ctx, c.id, 1).expect("moved");

    let list = ExpenseLogic::list(&ctx).expect("list");
    assert_eq!(expense_names(&list), vec!["A", "C", "B"]);
}

#[test]
fn negative_costs_are_rejected() {
    let (mut ctx, _clock) = test_ctx();

    assert!(matches!(
        ExpenseLogic::add(&mut ctx, "Refund", None, -10.0),
        Err(AppError::InvalidAmount(_))
    ));

    let e = ExpenseLogic::add(&mut ctx, "Lamp", None, 40.0).expect("added");
    let patch = ExpensePatch {
        cost: Some(f64::INFINITY),
        ..Default::default()
    };
    assert!(ExpenseLogic::update(&mut ctx, e.id, &patch).is_err());
    assert_eq!(ExpenseLogic::get(&ctx, e.id).expect("stored").cost, 40.0);
}

#[test]
fn deleted_expense_is_gone() {
    let (mut ctx, _clock) = test_ctx();
    let e = ExpenseLogic::add(&mut ctx, "Lamp", None, 40.0).expect("added");

    ExpenseLogic::delete(&mut ctx, e.id).expect("deleted");

    assert!(ExpenseLogic::list(&ctx).expect("list").is_empty());
    assert!(!ctx.ledger.has_changes());
}

#[test]
fn people_can_be_added_selected_and_removed() {
    let (mut ctx, _clock) = test_ctx();
    assert_eq!(PeopleLogic::list(&ctx).len(), 2);
    assert_eq!(PeopleLogic::selected(&ctx).map(|p| p.id.as_str()), Some("person1"));

    let id = PeopleLogic::add(&mut ctx, "Alex", Some("🏃")).expect("added");
    assert!(id.starts_with("person_"));
    PeopleLogic::select(&mut ctx, &id).expect("selected");
    assert_eq!(PeopleLogic::selected(&ctx).map(|p| p.name.as_str()), Some("Alex"));

    PeopleLogic::delete(&mut ctx, &id).expect("deleted");
    assert_eq!(PeopleLogic::selected(&ctx).map(|p| p.id.as_str()), Some("person1"));

    PeopleLogic::delete(&mut ctx, "person2").expect("deleted");
    assert!(matches!(
        PeopleLogic::delete(&mut ctx, "person1"),
        Err(AppError::Config(_))
    ));
    assert!(PeopleLogic::select(&mut ctx, "nobody").is_err());
}

#[test]
fn currency_is_normalised() {
    let (mut ctx, _clock) = test_ctx();

    PeopleLogic::set_currency(&mut ctx, " eur ").expect("currency");

    assert_eq!(ctx.config.currency, "EUR");
    assert!(PeopleLogic::set_currency(&mut ctx, "").is_err());
}
