use super::RemoteStore;
use crate::errors::{AppError, AppResult};
use crate::models::snapshot::Snapshot;
use std::collections::BTreeMap;

/// In-process remote store. Objects are kept as serialized JSON so every
/// read goes through the same decoding as a real fetch.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    objects: BTreeMap<String, String>,
    next_id: u64,
    pub fetches: usize,
    pub writes: usize,
    /// Makes every call fail, as an unreachable server would.
    pub offline: bool,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw JSON under `id`, bypassing serialization.
    pub fn put_raw(&mut self, id: &str, json: &str) {
        self.objects.insert(id.to_string(), json.to_string());
    }

    pub fn get(&self, id: &str) -> Option<Snapshot> {
        self.objects
            .get(id)
            .and_then(|raw| serde_json::from_str(raw).ok())
    }

    fn check_online(&self) -> AppResult<()> {
        if self.offline {
            return Err(AppError::Remote("remote store is unreachable".into()));
        }
        Ok(())
    }
}

impl RemoteStore for MemoryRemote {
    fn fetch(&mut self, id: &str) -> AppResult<Snapshot> {
        self.check_online()?;
        self.fetches += 1;
        let raw = self
            .objects
            .get(id)
            .ok_or_else(|| AppError::Remote(format!("remote object {} not found", id)))?;
        crate::core::snapshot::parse_snapshot(raw)
    }

    fn create(&mut self, snapshot: &Snapshot) -> AppResult<String> {
        self.check_online()?;
        self.next_id += 1;
        let id = format!("mem-{}", self.next_id);
        self.objects
            .insert(id.clone(), serde_json::to_string(snapshot)?);
        self.writes += 1;
        Ok(id)
    }

    fn update(&mut self, id: &str, snapshot: &Snapshot) -> AppResult<()> {
        self.check_online()?;
        if !self.objects.contains_key(id) {
            return Err(AppError::Remote(format!("remote object {} not found", id)));
        }
        self.objects
            .insert(id.to_string(), serde_json::to_string(snapshot)?);
        self.writes += 1;
        Ok(())
    }
}
