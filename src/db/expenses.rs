use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AdminExpenseView, ExpenseChanges, ExpenseView, NewExpense};

const VIEW_COLUMNS: &str = "e.id, e.owner_user_id, e.category_id, e.amount, e.description,
     e.expense_date, e.created_at, c.name AS category_name";

pub async fn create(pool: &PgPool, new: &NewExpense) -> Result<ExpenseView, sqlx::Error> {
    sqlx::query_as::<_, ExpenseView>(&format!(
        "WITH e AS (
             INSERT INTO expenses (id, owner_user_id, category_id, amount, description, expense_date)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *
         )
         SELECT {VIEW_COLUMNS} FROM e LEFT JOIN categories c ON c.id = e.category_id"
    ))
    .bind(Uuid::now_v7())
    .bind(new.owner_user_id)
    .bind(new.category_id)
    .bind(new.amount)
    .bind(new.description.as_deref())
    .bind(new.date)
    .fetch_one(pool)
    .await
}

pub async fn list_by_owner(pool: &PgPool, owner_user_id: Uuid) -> Result<Vec<ExpenseView>, sqlx::Error> {
    sqlx::query_as::<_, ExpenseView>(&format!(
        "SELECT {VIEW_COLUMNS} FROM expenses e
         LEFT JOIN categories c ON c.id = e.category_id
         WHERE e.owner_user_id = $1
         ORDER BY e.expense_date DESC, e.id DESC"
    ))
    .bind(owner_user_id)
    .fetch_all(pool)
    .await
}

pub async fn recent_by_owner(
    pool: &PgPool,
    owner_user_id: Uuid,
    limit: i64,
) -> Result<Vec<ExpenseView>, sqlx::Error> {
    sqlx::query_as::<_, ExpenseView>(&format!(
        "SELECT {VIEW_COLUMNS} FROM expenses e
         LEFT JOIN categories c ON c.id = e.category_id
         WHERE e.owner_user_id = $1
         ORDER BY e.expense_date DESC, e.id DESC
         LIMIT $2"
    ))
    .bind(owner_user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
    owner_user_id: Uuid,
) -> Result<Option<ExpenseView>, sqlx::Error> {
    sqlx::query_as::<_, ExpenseView>(&format!(
        "SELECT {VIEW_COLUMNS} FROM expenses e
         LEFT JOIN categories c ON c.id = e.category_id
         WHERE e.id = $1 AND e.owner_user_id = $2"
    ))
    .bind(id)
    .bind(owner_user_id)
    .fetch_optional(pool)
    .await
}

/// Apply only the supplied columns. Returns `None` when no owned row matched.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    owner_user_id: Uuid,
    changes: &ExpenseChanges,
) -> Result<Option<ExpenseView>, sqlx::Error> {
    let (set_description, description) = match &changes.description {
        Some(value) => (true, value.as_deref()),
        None => (false, None),
    };

    sqlx::query_as::<_, ExpenseView>(&format!(
        "WITH e AS (
             UPDATE expenses SET
                 category_id = COALESCE($3, category_id),
                 amount = COALESCE($4, amount),
                 expense_date = COALESCE($5, expense_date),
                 description = CASE WHEN $6 THEN $7 ELSE description END
             WHERE id = $1 AND owner_user_id = $2
             RETURNING *
         )
         SELECT {VIEW_COLUMNS} FROM e LEFT JOIN categories c ON c.id = e.category_id"
    ))
    .bind(id)
    .bind(owner_user_id)
    .bind(changes.category_id)
    .bind(changes.amount)
    .bind(changes.date)
    .bind(set_description)
    .bind(description)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid, owner_user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND owner_user_id = $2")
        .bind(id)
        .bind(owner_user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<AdminExpenseView>, sqlx::Error> {
    sqlx::query_as::<_, AdminExpenseView>(&format!(
        "SELECT {VIEW_COLUMNS}, u.name AS user_name, u.email AS user_email
         FROM expenses e
         LEFT JOIN users u ON u.id = e.owner_user_id
         LEFT JOIN categories c ON c.id = e.category_id
         ORDER BY e.expense_date DESC, e.id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM expenses")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
