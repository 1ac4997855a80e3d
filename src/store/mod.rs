//! Persistence seam. Handlers and services only see `dyn Store`; production wires in
//! [`PgStore`], tests can use [`MemoryStore`].

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    AdminExpenseView, Category, CategoryTotal, ExpenseChanges, ExpenseView, NewExpense, NewUser,
    User,
};

#[derive(Debug)]
pub enum StoreError {
    UniqueViolation(String),
    ForeignKeyViolation(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::UniqueViolation(msg) => write!(f, "Unique violation: {msg}"),
            StoreError::ForeignKeyViolation(msg) => write!(f, "Foreign key violation: {msg}"),
            StoreError::Database(err) => write!(f, "Database error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

/// Half-open date interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// First day of the calendar month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Summed amount for the calendar month starting at `month`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct MonthlyTotal {
    pub month: NaiveDate,
    pub total: Decimal,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, new: NewUser<'_>) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// Newest first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn count_users(&self) -> Result<i64, StoreError>;

    /// Ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
    async fn count_categories(&self) -> Result<i64, StoreError>;
    async fn find_category_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError>;
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, StoreError>;
    async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
        owner_user_id: Option<Uuid>,
    ) -> Result<Category, StoreError>;
    async fn insert_category_if_absent(&self, name: &str) -> Result<bool, StoreError>;
    async fn category_usage_count(&self, id: Uuid) -> Result<i64, StoreError>;
    async fn delete_category(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn create_expense(&self, new: NewExpense) -> Result<ExpenseView, StoreError>;
    /// Newest date first, ties by id descending.
    async fn list_expenses(&self, owner_user_id: Uuid) -> Result<Vec<ExpenseView>, StoreError>;
    async fn recent_expenses(
        &self,
        owner_user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ExpenseView>, StoreError>;
    async fn find_expense(
        &self,
        id: Uuid,
        owner_user_id: Uuid,
    ) -> Result<Option<ExpenseView>, StoreError>;
    async fn update_expense(
        &self,
        id: Uuid,
        owner_user_id: Uuid,
        changes: &ExpenseChanges,
    ) -> Result<Option<ExpenseView>, StoreError>;
    async fn delete_expense(&self, id: Uuid, owner_user_id: Uuid) -> Result<bool, StoreError>;
    async fn list_all_expenses(&self) -> Result<Vec<AdminExpenseView>, StoreError>;
    async fn count_expenses(&self) -> Result<i64, StoreError>;

    async fn expense_total(
        &self,
        owner_user_id: Option<Uuid>,
        range: Option<DateRange>,
    ) -> Result<Decimal, StoreError>;
    async fn category_totals(
        &self,
        owner_user_id: Option<Uuid>,
    ) -> Result<Vec<CategoryTotal>, StoreError>;
    /// Only months that have expenses, ascending.
    async fn monthly_totals(
        &self,
        owner_user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<MonthlyTotal>, StoreError>;
}
