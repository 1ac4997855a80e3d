use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An expense row joined with the name of its category.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseView {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub category_id: Uuid,
    #[serde(with = "crate::models::money")]
    pub amount: Decimal,
    pub description: Option<String>,
    #[sqlx(rename = "expense_date")]
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub category_name: Option<String>,
}

/// Expense as seen from the admin console, with the owner's name and email.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminExpenseView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub expense: ExpenseView,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub owner_user_id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// A partial update. `None` leaves the column untouched; `description: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ExpenseChanges {
    pub category_id: Option<Uuid>,
    pub amount: Option<Decimal>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}
