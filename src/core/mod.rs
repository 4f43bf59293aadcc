pub mod clock;
pub mod config;
pub mod expenses;
pub mod groceries;
pub mod ledger;
pub mod log;
pub mod ordering;
pub mod people;
pub mod recurrence;
pub mod snapshot;
pub mod status;
pub mod sync;
pub mod trackables;
