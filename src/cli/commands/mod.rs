pub mod config;
pub mod db;
pub mod expense;
pub mod grocery;
pub mod init;
pub mod log;
pub mod person;
pub mod sync;
pub mod time;
pub mod trackable;
