//! Remote snapshot store: one JSON blob per remote object id.

pub mod gist;
pub mod memory;

use crate::errors::AppResult;
use crate::models::snapshot::Snapshot;

pub use gist::GistStore;
pub use memory::MemoryRemote;

pub trait RemoteStore {
    /// Current snapshot stored under `id`. Either version is accepted.
    fn fetch(&mut self, id: &str) -> AppResult<Snapshot>;

    /// Store a new object and return its id.
    fn create(&mut self, snapshot: &Snapshot) -> AppResult<String>;

    /// Replace the object stored under `id`.
    fn update(&mut self, id: &str, snapshot: &Snapshot) -> AppResult<()>;
}
