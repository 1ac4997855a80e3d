use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{ExpenseChanges, ExpenseView, NewExpense};
use crate::store::{Store, StoreError};

/// Body of create and update requests. Every field is optional here; create enforces
/// the required ones, update applies whichever are present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    pub category_id: Option<Uuid>,
    #[serde(default, deserialize_with = "crate::models::money::option::deserialize")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(alias = "expenseDate")]
    pub date: Option<NaiveDate>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn not_found() -> AppError {
    AppError::NotFound("Expense not found".to_string())
}

/// Exclusive upper bound of a `NUMERIC(12, 2)` column.
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

fn validate_amount(amount: Decimal) -> Result<Decimal, AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("Amount must be greater than 0".to_string()));
    }
    if amount >= AMOUNT_LIMIT {
        return Err(AppError::BadRequest(
            "Amount must be less than 10000000000".to_string(),
        ));
    }
    let amount = amount.normalize();
    if amount.scale() > 2 {
        return Err(AppError::BadRequest(
            "Amount can have at most 2 decimal places".to_string(),
        ));
    }
    Ok(amount)
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

async fn ensure_category(store: &dyn Store, category_id: Uuid) -> Result<(), AppError> {
    match store.find_category_by_id(category_id).await? {
        Some(_) => Ok(()),
        None => Err(invalid_category()),
    }
}

fn invalid_category() -> AppError {
    AppError::BadRequest("Invalid category".to_string())
}

fn map_store_error(err: StoreError) -> AppError {
    match err {
        StoreError::ForeignKeyViolation(_) => invalid_category(),
        other => other.into(),
    }
}

pub async fn create(
    store: &dyn Store,
    owner_user_id: Uuid,
    payload: ExpensePayload,
) -> Result<ExpenseView, AppError> {
    let (Some(category_id), Some(amount), Some(date)) =
        (payload.category_id, payload.amount, payload.date)
    else {
        return Err(AppError::BadRequest(
            "categoryId, amount and date are required".to_string(),
        ));
    };
    let amount = validate_amount(amount)?;
    ensure_category(store, category_id).await?;

    store
        .create_expense(NewExpense {
            owner_user_id,
            category_id,
            amount,
            description: clean_description(payload.description.flatten()),
            date,
        })
        .await
        .map_err(map_store_error)
}

pub async fn list(store: &dyn Store, owner_user_id: Uuid) -> Result<Vec<ExpenseView>, AppError> {
    Ok(store.list_expenses(owner_user_id).await?)
}

/// Someone else's expense is reported exactly like a missing one.
pub async fn get(
    store: &dyn Store,
    owner_user_id: Uuid,
    id: Uuid,
) -> Result<ExpenseView, AppError> {
    store
        .find_expense(id, owner_user_id)
        .await?
        .ok_or_else(not_found)
}

pub async fn update(
    store: &dyn Store,
    owner_user_id: Uuid,
    id: Uuid,
    payload: ExpensePayload,
) -> Result<ExpenseView, AppError> {
    let existing = get(store, owner_user_id, id).await?;

    let changes = ExpenseChanges {
        category_id: payload.category_id,
        amount: payload.amount.map(validate_amount).transpose()?,
        description: payload.description.map(clean_description),
        date: payload.date,
    };
    if changes.is_empty() {
        return Ok(existing);
    }
    if let Some(category_id) = changes.category_id {
        ensure_category(store, category_id).await?;
    }

    store
        .update_expense(id, owner_user_id, &changes)
        .await
        .map_err(map_store_error)?
        .ok_or_else(not_found)
}

pub async fn delete(store: &dyn Store, owner_user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    if store.delete_expense(id, owner_user_id).await? {
        Ok(())
    } else {
        Err(not_found())
    }
}
