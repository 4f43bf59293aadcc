pub mod change;
pub mod completion;
pub mod expense;
pub mod grocery;
pub mod person;
pub mod snapshot;
pub mod status;
pub mod trackable;
