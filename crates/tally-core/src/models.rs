//! Domain models for Tally

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A user of the ledger. The analytics core only reads the budget fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Monthly budget; 0 means "unset"
    pub monthly_budget: f64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// A user to be created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub monthly_budget: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Expense categories (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Entertainment,
    Education,
    Shopping,
    Utilities,
    Healthcare,
    Housing,
    Personal,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 10] = [
        Self::Food,
        Self::Transport,
        Self::Entertainment,
        Self::Education,
        Self::Shopping,
        Self::Utilities,
        Self::Healthcare,
        Self::Housing,
        Self::Personal,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Entertainment => "entertainment",
            Self::Education => "education",
            Self::Shopping => "shopping",
            Self::Utilities => "utilities",
            Self::Healthcare => "healthcare",
            Self::Housing => "housing",
            Self::Personal => "personal",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown expense category: {}", s))
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment method used for an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Upi,
    BankTransfer,
    Wallet,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Upi => "upi",
            Self::BankTransfer => "bank-transfer",
            Self::Wallet => "wallet",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "card" | "credit-card" | "debit-card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            "bank-transfer" | "bank_transfer" => Ok(Self::BankTransfer),
            "wallet" => Ok(Self::Wallet),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recurrence frequency for recurring expenses and incomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// The next occurrence after `date`. Month arithmetic clamps to the end
    /// of shorter months (Jan 31 + 1 month = Feb 28/29).
    pub fn next_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => date.checked_add_signed(Duration::days(1)),
            Self::Weekly => date.checked_add_signed(Duration::days(7)),
            Self::Monthly => date.checked_add_months(Months::new(1)),
            Self::Quarterly => date.checked_add_months(Months::new(3)),
            Self::Yearly => date.checked_add_months(Months::new(12)),
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" | "annual" => Ok(Self::Yearly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub description: String,
    pub category: ExpenseCategory,
    pub subcategory: Option<String>,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub is_recurring: bool,
    pub recurring_frequency: Option<Frequency>,
    /// Category was inferred by the keyword suggester rather than supplied
    pub ai_generated: bool,
    pub ai_confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// An expense to be recorded (before DB insertion)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub description: String,
    /// When absent the category is suggested from the description
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_frequency: Option<Frequency>,
}

/// Income sources (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IncomeSource {
    Allowance,
    Stipend,
    Scholarship,
    Job,
    Freelance,
    Internship,
    Family,
    Gift,
    Investment,
    SideHustle,
    #[default]
    Other,
}

impl IncomeSource {
    pub const ALL: [IncomeSource; 11] = [
        Self::Allowance,
        Self::Stipend,
        Self::Scholarship,
        Self::Job,
        Self::Freelance,
        Self::Internship,
        Self::Family,
        Self::Gift,
        Self::Investment,
        Self::SideHustle,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allowance => "allowance",
            Self::Stipend => "stipend",
            Self::Scholarship => "scholarship",
            Self::Job => "job",
            Self::Freelance => "freelance",
            Self::Internship => "internship",
            Self::Family => "family",
            Self::Gift => "gift",
            Self::Investment => "investment",
            Self::SideHustle => "side-hustle",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for IncomeSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|src| src.as_str() == normalized)
            .ok_or_else(|| format!("Unknown income source: {}", s))
    }
}

impl std::fmt::Display for IncomeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded income event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub source: IncomeSource,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub recurring_frequency: Option<Frequency>,
    /// Derived once at creation for recurring income
    pub next_expected_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// An income event to be recorded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewIncome {
    pub amount: f64,
    #[serde(default)]
    pub source: IncomeSource,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_frequency: Option<Frequency>,
    #[serde(default)]
    pub next_expected_date: Option<NaiveDate>,
}

impl NewIncome {
    /// Fill `next_expected_date` from `date` + frequency when the income is
    /// recurring and no date was supplied. Daily recurrence is not an income
    /// frequency and yields no expected date.
    pub fn derive_next_expected_date(&mut self) {
        if !self.is_recurring || self.next_expected_date.is_some() {
            return;
        }
        self.next_expected_date = match self.recurring_frequency {
            Some(Frequency::Daily) | None => None,
            Some(freq) => freq.next_after(self.date),
        };
    }
}

// ========== Goal Models ==========

/// Goal categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GoalCategory {
    EmergencyFund,
    Education,
    Travel,
    Gadget,
    Vehicle,
    Housing,
    Investment,
    DebtPayoff,
    #[default]
    Other,
}

impl GoalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmergencyFund => "emergency-fund",
            Self::Education => "education",
            Self::Travel => "travel",
            Self::Gadget => "gadget",
            Self::Vehicle => "vehicle",
            Self::Housing => "housing",
            Self::Investment => "investment",
            Self::DebtPayoff => "debt-payoff",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for GoalCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "emergency-fund" => Ok(Self::EmergencyFund),
            "education" => Ok(Self::Education),
            "travel" => Ok(Self::Travel),
            "gadget" => Ok(Self::Gadget),
            "vehicle" => Ok(Self::Vehicle),
            "housing" => Ok(Self::Housing),
            "investment" => Ok(Self::Investment),
            "debt-payoff" => Ok(Self::DebtPayoff),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown goal category: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Goal priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl GoalPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Sort rank, most pressing first
    pub fn rank(&self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl std::str::FromStr for GoalPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(format!("Unknown goal priority: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Goal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
    Cancelled,
}

impl GoalStatus {
    pub const ALL: [GoalStatus; 4] = [
        Self::Active,
        Self::Completed,
        Self::Paused,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "paused" => Ok(Self::Paused),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How often an auto-save contribution runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AutoSaveFrequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl AutoSaveFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Period between runs. Monthly is a fixed 30 days, not calendar aware.
    pub fn period(&self) -> Duration {
        match self {
            Self::Daily => Duration::days(1),
            Self::Weekly => Duration::days(7),
            Self::Monthly => Duration::days(30),
        }
    }
}

impl std::str::FromStr for AutoSaveFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!(
                "Unknown auto-save frequency: {} (valid: daily, weekly, monthly)",
                s
            )),
        }
    }
}

/// Auto-save settings embedded in a goal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoSave {
    pub enabled: bool,
    pub amount: f64,
    pub frequency: AutoSaveFrequency,
    pub last_auto_save: Option<DateTime<Utc>>,
}

/// A progress checkpoint on a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub percentage: u8,
    pub amount: f64,
    pub achieved: bool,
    pub achieved_date: Option<DateTime<Utc>>,
}

/// Where a contribution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ContributionSource {
    #[default]
    Manual,
    AutoSave,
    Bonus,
    Other,
}

impl ContributionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::AutoSave => "auto-save",
            Self::Bonus => "bonus",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for ContributionSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "manual" => Ok(Self::Manual),
            "auto-save" | "autosave" => Ok(Self::AutoSave),
            "bonus" => Ok(Self::Bonus),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown contribution source: {}", s)),
        }
    }
}

/// A single deposit towards a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub note: Option<String>,
    pub source: ContributionSource,
}

/// A savings goal with its contribution ledger and milestones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    pub category: GoalCategory,
    pub priority: GoalPriority,
    pub target_date: NaiveDate,
    pub status: GoalStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub auto_save: AutoSave,
    pub milestones: Vec<Milestone>,
    pub contributions: Vec<Contribution>,
    pub tags: Vec<String>,
    /// Bumped on every persisted write; used for optimistic concurrency
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A goal to be created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub target_amount: f64,
    #[serde(default)]
    pub category: GoalCategory,
    #[serde(default)]
    pub priority: GoalPriority,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub auto_save: Option<AutoSave>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Field edits on an existing goal; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<f64>,
    pub category: Option<GoalCategory>,
    pub priority: Option<GoalPriority>,
    pub target_date: Option<NaiveDate>,
    pub status: Option<GoalStatus>,
    pub tags: Option<Vec<String>>,
    pub auto_save_enabled: Option<bool>,
    pub auto_save_amount: Option<f64>,
    pub auto_save_frequency: Option<AutoSaveFrequency>,
}

/// Derived, non-stored view of a goal's pace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    pub progress_percentage: f64,
    pub days_remaining: i64,
    pub required_daily_savings: f64,
    pub remaining_amount: f64,
    pub on_track: bool,
}

/// A goal together with its derived progress fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalWithProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: GoalProgress,
}

/// Count and sums for goals in one status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalStatusSummary {
    pub status: String,
    pub count: i64,
    pub total_target: f64,
    pub total_current: f64,
}

/// One auto-save applied by a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSaveApplied {
    pub goal_id: i64,
    pub title: String,
    pub amount: f64,
    /// The contribution completed the goal
    pub completed: bool,
}

/// Result of sweeping an owner's goals for due auto-saves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoSaveSweep {
    pub applied: Vec<AutoSaveApplied>,
    pub not_due: usize,
    /// Goals skipped because a concurrent write won the race
    pub conflicts: usize,
}

impl AutoSaveSweep {
    pub fn total_saved(&self) -> f64 {
        self.applied.iter().map(|a| a.amount).sum()
    }
}

// ========== Ledger Query Models ==========

/// Which record table a ledger query runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    pub(crate) fn table(&self) -> &'static str {
        match self {
            Self::Expense => "expenses",
            Self::Income => "incomes",
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" | "expenses" => Ok(Self::Expense),
            "income" | "incomes" => Ok(Self::Income),
            _ => Err(format!("Unknown entry kind: {} (valid: expense, income)", s)),
        }
    }
}

/// Column a ledger group-by query partitions on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupKey {
    /// Expense category
    Category,
    /// Income source
    Source,
    /// Expense payment method
    PaymentMethod,
}

impl GroupKey {
    pub(crate) fn column(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Source => "source",
            Self::PaymentMethod => "payment_method",
        }
    }

    /// Whether the key exists on the given table
    pub fn applies_to(&self, kind: EntryKind) -> bool {
        matches!(
            (self, kind),
            (Self::Category, EntryKind::Expense)
                | (Self::PaymentMethod, EntryKind::Expense)
                | (Self::Source, EntryKind::Income)
        )
    }
}

/// Sum and count of matching records
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub total: f64,
    pub count: i64,
}

/// One bucket of a group-by query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub key: String,
    pub total_amount: f64,
    pub count: i64,
    pub avg_amount: f64,
}

/// One calendar month of a time-bucketed query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub total_amount: f64,
    pub count: i64,
}

/// Spending on one day of the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayBucket {
    /// 0 = Sunday .. 6 = Saturday
    pub day_index: u32,
    pub day_name: String,
    pub total_amount: f64,
    pub count: i64,
    pub avg_amount: f64,
}

/// Amount distribution for one expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountStats {
    pub category: String,
    pub total_amount: f64,
    pub avg_amount: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    pub count: i64,
}

/// Name of a weekday index where 0 is Sunday
pub fn weekday_name(index: u32) -> &'static str {
    match index {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        _ => "Saturday",
    }
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .map(|next| (next - first).num_days() as u32)
        .unwrap_or(31)
}
