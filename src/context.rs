//! Application context
//!
//! Services built once at startup and handed to every logic unit: the
//! entity store, the change ledger, the clock and the configuration.

use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::core::ledger::ChangeLedger;
use crate::db::initialize::init_db;
use crate::db::log::hklog_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::storage::{FileStorage, LocalStorage};
use crate::ui::messages::warning;
use chrono::{DateTime, Utc};
use std::rc::Rc;

pub struct AppContext {
    pub pool: DbPool,
    pub ledger: ChangeLedger,
    pub clock: Rc<dyn Clock>,
    pub config: Config,
    /// False in `--test` mode: configuration changes stay in memory.
    pub persist_config: bool,
}

impl AppContext {
    /// Open the configured database (running pending migrations) and load
    /// the ledger stored beside it.
    pub fn open(config: Config, persist_config: bool) -> AppResult<Self> {
        let pool = DbPool::new(&config.database)?;
        init_db(&pool.conn)?;

        let system = SystemClock::with_offset_minutes(config.time_offset_minutes)
            .unwrap_or_else(|e| {
                warning(format!("{}; using the real clock (`time --reset` clears it)", e));
                SystemClock::new()
            });
        let clock: Rc<dyn Clock> = Rc::new(system);
        let storage = FileStorage::beside_database(&config.database);
        let ledger = ChangeLedger::load(Box::new(storage), clock.clone());

        Ok(Self {
            pool,
            ledger,
            clock,
            config,
            persist_config,
        })
    }

    /// Assemble a context from parts. The pool must already be initialised.
    pub fn from_parts(
        pool: DbPool,
        storage: Box<dyn LocalStorage>,
        clock: Rc<dyn Clock>,
        config: Config,
    ) -> Self {
        let ledger = ChangeLedger::load(storage, clock.clone());
        Self {
            pool,
            ledger,
            clock,
            config,
            persist_config: false,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Persist the configuration unless running in test mode.
    pub fn save_config(&self) -> AppResult<()> {
        if self.persist_config {
            self.config.save()?;
        }
        Ok(())
    }

    /// Append a line to the internal log table (never fails the caller).
    pub fn log(&self, operation: &str, target: &str, message: &str) {
        hklog_quiet(&self.pool.conn, operation, target, message);
    }
}
