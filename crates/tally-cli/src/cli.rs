//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI arguments.
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track spending, income and savings goals
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted personal finance tracker and goal engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TALLY_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// User ID that record, goal and report commands act on
    #[arg(short, long, env = "TALLY_USER", global = true)]
    pub user: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status (encryption, record counts)
    Status,

    /// Manage users (add, list, budget)
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage expenses (add, list, delete, suggest)
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// Manage incomes (add, list, delete)
    Income {
        #[command(subcommand)]
        action: IncomeAction,
    },

    /// Manage savings goals
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Generate analytics reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Export data to CSV
    Export {
        #[command(subcommand)]
        export_type: ExportType,
    },

    /// Start the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, requests need a bearer key from TALLY_API_KEYS.
        #[arg(long)]
        no_auth: bool,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address (unique)
        #[arg(short, long)]
        email: String,

        /// Monthly spending budget
        #[arg(short, long, default_value = "0")]
        budget: f64,

        /// Currency code
        #[arg(long)]
        currency: Option<String>,
    },

    /// List users
    List,

    /// Set the monthly budget for the selected user
    Budget {
        /// New monthly budget (0 clears it)
        amount: f64,
    },
}

#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Record an expense
    Add {
        /// Amount spent
        amount: f64,

        /// What the money was spent on
        description: String,

        /// Category (suggested from the description when omitted)
        #[arg(short, long)]
        category: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Payment method: cash, card, upi, bank-transfer, wallet, other
        #[arg(long, default_value = "cash")]
        method: String,

        /// Tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Recurrence frequency: daily, weekly, monthly, quarterly, yearly
        #[arg(long)]
        recurring: Option<String>,
    },

    /// List expenses, newest first
    List {
        /// Maximum number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Search description and notes
        #[arg(short, long)]
        search: Option<String>,

        /// Restrict to the current week, month or year
        #[arg(long)]
        period: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },

    /// Suggest a category for a description
    Suggest {
        /// Expense description
        description: String,
    },
}

#[derive(Subcommand)]
pub enum IncomeAction {
    /// Record an income
    Add {
        /// Amount received
        amount: f64,

        /// Source: allowance, stipend, scholarship, job, freelance, internship, family, gift, investment, side-hustle, other
        #[arg(short, long, default_value = "job")]
        source: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Recurrence frequency: daily, weekly, monthly, quarterly, yearly
        #[arg(long)]
        recurring: Option<String>,
    },

    /// List incomes, newest first
    List {
        /// Maximum number of incomes to show
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Filter by source
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Delete an income
    Delete {
        /// Income ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a savings goal
    Add {
        /// Goal title
        title: String,

        /// Amount to save
        #[arg(short, long)]
        target: f64,

        /// Target date (YYYY-MM-DD, must be in the future)
        #[arg(short, long)]
        by: String,

        /// Category: emergency-fund, education, travel, gadget, vehicle, housing, investment, debt-payoff, other
        #[arg(short, long, default_value = "other")]
        category: String,

        /// Priority: low, medium, high, urgent
        #[arg(short, long, default_value = "medium")]
        priority: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Auto-save amount per period
        #[arg(long)]
        auto_save: Option<f64>,

        /// Auto-save frequency: daily, weekly, monthly
        #[arg(long, default_value = "monthly")]
        auto_save_frequency: String,
    },

    /// List goals with progress
    List {
        /// Filter by status: active, completed, paused, cancelled
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show one goal with milestones and contributions
    Show {
        /// Goal ID
        id: i64,
    },

    /// Add a contribution to a goal
    Contribute {
        /// Goal ID
        id: i64,

        /// Amount to add
        amount: f64,

        /// Note for the contribution
        #[arg(short, long)]
        note: Option<String>,

        /// Source: manual, bonus, other
        #[arg(short, long, default_value = "manual")]
        source: String,
    },

    /// Run auto-save for one goal, or every due goal when no ID is given
    AutoSave {
        /// Goal ID
        id: Option<i64>,
    },

    /// Edit goal fields
    Edit {
        /// Goal ID
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        target: Option<f64>,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        by: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        /// Status: active, completed, paused, cancelled
        #[arg(long)]
        status: Option<String>,

        /// Enable or disable auto-save
        #[arg(long)]
        auto_save_enabled: Option<bool>,

        #[arg(long)]
        auto_save_amount: Option<f64>,

        #[arg(long)]
        auto_save_frequency: Option<String>,
    },

    /// Delete a goal and its history
    Delete {
        /// Goal ID
        id: i64,
    },

    /// List active goals past their target date
    Overdue,

    /// List active goals by priority, then target date
    Prioritized,

    /// Count and total goals per status
    Summary,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Totals for the current period against the previous one
    Summary {
        /// Period: week, month, year
        #[arg(long, default_value = "month")]
        period: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Totals per expense category or income source
    Categories {
        /// Period: week, month, year
        #[arg(long, default_value = "month")]
        period: String,

        /// Custom start date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        from: Option<String>,

        /// Custom end date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        to: Option<String>,

        /// Ledger side: expense or income
        #[arg(long, default_value = "expense")]
        kind: String,
    },

    /// Monthly totals over recent months
    Trends {
        /// Number of months back
        #[arg(long, default_value = "6")]
        months: u32,

        /// Ledger side: expense or income
        #[arg(long, default_value = "expense")]
        kind: String,
    },

    /// Spending per day of week
    Weekly {
        /// Period: week, month, year
        #[arg(long, default_value = "month")]
        period: String,
    },

    /// Spending per payment method
    PaymentMethods {
        /// Period: week, month, year
        #[arg(long, default_value = "month")]
        period: String,
    },

    /// Expense size distribution per category
    Sizes {
        /// Period: week, month, year
        #[arg(long, default_value = "month")]
        period: String,
    },

    /// Budget projection for the current month
    Budget {
        /// Also show suggested category budgets
        #[arg(long)]
        suggest: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Financial health score
    Health {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ExportType {
    /// Export expenses to CSV
    Expenses {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,
    },
}
