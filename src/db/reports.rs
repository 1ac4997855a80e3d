use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::CategoryTotal;
use crate::store::{DateRange, MonthlyTotal};

/// Sum of expense amounts, optionally scoped to one owner and a half-open date range.
pub async fn total(
    pool: &PgPool,
    owner_user_id: Option<Uuid>,
    range: Option<DateRange>,
) -> Result<Decimal, sqlx::Error> {
    sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(SUM(amount), 0) FROM expenses
         WHERE ($1::uuid IS NULL OR owner_user_id = $1)
           AND ($2::date IS NULL OR expense_date >= $2)
           AND ($3::date IS NULL OR expense_date < $3)",
    )
    .bind(owner_user_id)
    .bind(range.map(|r| r.start))
    .bind(range.map(|r| r.end))
    .fetch_one(pool)
    .await
}

/// Every category with its summed amount; the owner filter sits in the join so empty
/// categories survive with a zero total.
pub async fn category_totals(
    pool: &PgPool,
    owner_user_id: Option<Uuid>,
) -> Result<Vec<CategoryTotal>, sqlx::Error> {
    sqlx::query_as::<_, CategoryTotal>(
        "SELECT c.id, c.name, COALESCE(SUM(e.amount), 0) AS total
         FROM categories c
         LEFT JOIN expenses e
           ON e.category_id = c.id AND ($1::uuid IS NULL OR e.owner_user_id = $1)
         GROUP BY c.id, c.name
         ORDER BY total DESC, c.name ASC",
    )
    .bind(owner_user_id)
    .fetch_all(pool)
    .await
}

pub async fn monthly_totals(
    pool: &PgPool,
    owner_user_id: Uuid,
    range: DateRange,
) -> Result<Vec<MonthlyTotal>, sqlx::Error> {
    sqlx::query_as::<_, MonthlyTotal>(
        "SELECT date_trunc('month', expense_date)::date AS month, SUM(amount) AS total
         FROM expenses
         WHERE owner_user_id = $1 AND expense_date >= $2 AND expense_date < $3
         GROUP BY 1
         ORDER BY 1 ASC",
    )
    .bind(owner_user_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(pool)
    .await
}
