use clap::{Parser, Subcommand};

/// Command-line interface definition for rHousekeep
#[derive(Parser)]
#[command(
    name = "rhousekeep",
    version = env!("CARGO_PKG_VERSION"),
    about = "A local-first household tracker: recurring chores, exercise quotas, groceries and expenses, synced through a gist",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file read or update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file
    Config {
        /// Print the current configuration file to stdout
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        /// Edit the configuration file with your preferred editor
        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        /// Specify the editor to use (overrides $EDITOR/$VISUAL).
        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,

        #[arg(long = "check", help = "List keys missing from the configuration file")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing keys with their default values")]
        migrate: bool,

        #[arg(long = "set-currency", value_name = "CODE")]
        set_currency: Option<String>,

        #[arg(long = "set-budget", value_name = "AMOUNT", allow_negative_numbers = true)]
        set_budget: Option<f64>,

        #[arg(long = "set-gist-id", value_name = "ID", help = "Remote gist id (empty to unset)")]
        set_gist_id: Option<String>,

        #[arg(long = "set-gist-token", value_name = "TOKEN")]
        set_gist_token: Option<String>,
    },

    /// Manage the database
    Db {
        #[arg(long = "migrate", help = "Run pending schema migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "last", value_name = "N", help = "Only the newest N rows")]
        last: Option<usize>,
    },

    /// Recurring and one-time chores
    Chore {
        #[command(subcommand)]
        action: TrackableAction,
    },

    /// Exercises with per-period quotas
    Exercise {
        #[command(subcommand)]
        action: TrackableAction,
    },

    /// Shopping list
    Grocery {
        #[command(subcommand)]
        action: GroceryAction,
    },

    /// Planned expenses and the budget
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// People who own exercises
    Person {
        #[command(subcommand)]
        action: PersonAction,
    },

    /// Merge local changes with the remote snapshot
    Sync,

    /// Remote snapshot management
    Remote {
        #[command(subcommand)]
        action: RemoteAction,
    },

    /// Development time offset
    Time {
        #[arg(long = "show", help = "Show the effective current time")]
        show: bool,

        #[arg(
            long = "set",
            value_name = "DATETIME",
            help = "Pretend it is DATETIME (RFC 3339 or YYYY-MM-DD)"
        )]
        set: Option<String>,

        #[arg(long = "advance-days", value_name = "N", allow_negative_numbers = true)]
        advance_days: Option<i64>,

        #[arg(long = "advance-hours", value_name = "N", allow_negative_numbers = true)]
        advance_hours: Option<i64>,

        #[arg(long = "reset", help = "Go back to the real clock")]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum TrackableAction {
    /// Add a new item
    Add {
        name: String,

        /// Recurrence such as 3d, 2w or 1m
        #[arg(long = "every", short = 'e', default_value = "1w")]
        every: String,

        #[arg(long = "desc")]
        description: Option<String>,

        /// Units required per period (exercises)
        #[arg(long = "target")]
        target: Option<f64>,

        /// reps, km, steps, minutes or sets (exercises)
        #[arg(long = "unit")]
        unit: Option<String>,

        /// Owner id (exercises; defaults to the selected person)
        #[arg(long = "person")]
        person: Option<String>,

        /// Reschedule after each completion (chores)
        #[arg(long = "repeating")]
        repeating: bool,

        /// First due date in N days (chores)
        #[arg(long = "due-in", value_name = "DAYS")]
        due_in: Option<i64>,
    },

    /// List items with their due state
    List {
        #[arg(long = "archived", help = "Include archived items")]
        archived: bool,

        /// Exercises of this person (default: the selected one)
        #[arg(long = "person")]
        person: Option<String>,

        #[arg(long = "everyone", help = "Exercises of every person")]
        everyone: bool,
    },

    /// Record a completion now
    Done {
        id: i64,

        #[arg(long = "amount", short = 'a')]
        amount: Option<f64>,

        #[arg(long = "notes", short = 'n')]
        notes: Option<String>,
    },

    /// Record a completion on a past day
    Past {
        id: i64,

        #[arg(long = "days-ago", short = 'd', default_value_t = 1)]
        days_ago: u32,

        #[arg(long = "amount", short = 'a')]
        amount: Option<f64>,
    },

    /// Remove today's completion
    Undo { id: i64 },

    /// Show completion history
    History { id: i64 },

    /// Delete one history entry
    RemoveEntry { completion_id: i64 },

    /// Edit an item
    Edit {
        id: i64,

        #[arg(long = "name")]
        name: Option<String>,

        #[arg(long = "desc")]
        description: Option<String>,

        #[arg(long = "every", short = 'e')]
        every: Option<String>,

        #[arg(long = "target")]
        target: Option<f64>,

        #[arg(long = "unit")]
        unit: Option<String>,

        #[arg(long = "person")]
        person: Option<String>,

        #[arg(long = "repeating", value_name = "BOOL")]
        repeating: Option<bool>,
    },

    /// Set the next due date
    Reschedule {
        id: i64,

        /// RFC 3339 or YYYY-MM-DD
        date: String,
    },

    Archive { id: i64 },

    Unarchive { id: i64 },

    /// Delete an item and its history
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum GroceryAction {
    Add {
        name: String,

        #[arg(long = "qty", short = 'q')]
        quantity: Option<String>,

        #[arg(long = "category", short = 'c')]
        category: Option<String>,
    },

    List,

    /// Check or uncheck an item
    Toggle { id: i64 },

    Edit {
        id: i64,

        #[arg(long = "name")]
        name: Option<String>,

        #[arg(long = "qty", short = 'q')]
        quantity: Option<String>,

        #[arg(long = "category", short = 'c')]
        category: Option<String>,
    },

    Delete { id: i64 },

    /// Delete every checked item
    ClearChecked,

    /// Uncheck every item
    UncheckAll,

    /// Move an item to a 1-based position in its list
    Move { id: i64, position: usize },
}

#[derive(Subcommand)]
pub enum ExpenseAction {
    Add {
        name: String,

        cost: f64,

        #[arg(long = "desc")]
        description: Option<String>,
    },

    List,

    /// Mark as paid (deducts the cost from the budget)
    Done { id: i64 },

    /// Mark as unpaid (refunds the cost)
    Reopen { id: i64 },

    Edit {
        id: i64,

        #[arg(long = "name")]
        name: Option<String>,

        #[arg(long = "cost")]
        cost: Option<f64>,

        #[arg(long = "desc")]
        description: Option<String>,
    },

    Delete { id: i64 },

    /// Move an expense to a 1-based position in its list
    Move { id: i64, position: usize },
}

#[derive(Subcommand)]
pub enum PersonAction {
    Add {
        name: String,

        #[arg(long = "emoji")]
        emoji: Option<String>,
    },

    List,

    Edit {
        id: String,

        #[arg(long = "name")]
        name: Option<String>,

        #[arg(long = "emoji")]
        emoji: Option<String>,
    },

    Delete { id: String },

    /// Make this person the default owner of new exercises
    Select { id: String },
}

#[derive(Subcommand)]
pub enum RemoteAction {
    /// Push the whole local state, creating the gist if needed
    Publish,

    /// Replace local state with the remote snapshot
    Pull {
        #[arg(long = "discard", help = "Drop pending local changes")]
        discard: bool,
    },

    /// Show the remote id, pending changes and last sync
    Status,

    /// List pending local changes
    Changes,
}
