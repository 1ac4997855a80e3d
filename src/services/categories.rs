use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::Category;
use crate::store::{Store, StoreError};

pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Food",
    "Transportation",
    "Entertainment",
    "Shopping",
    "Bills",
    "Healthcare",
    "Education",
    "Others",
];

/// Insert the default global categories when the table is empty. Each insert is
/// skipped if the name already exists, so concurrent first runs cannot duplicate rows.
pub async fn seed_defaults(store: &dyn Store) -> Result<usize, AppError> {
    if store.count_categories().await? > 0 {
        return Ok(0);
    }

    let mut inserted = 0;
    for name in DEFAULT_CATEGORIES {
        if store.insert_category_if_absent(name).await? {
            inserted += 1;
        }
    }
    if inserted > 0 {
        tracing::info!(count = inserted, "Seeded default categories");
    }
    Ok(inserted)
}

pub async fn list(store: &dyn Store) -> Result<Vec<Category>, AppError> {
    seed_defaults(store).await?;
    Ok(store.list_categories().await?)
}

pub async fn create(
    store: &dyn Store,
    owner: &AuthUser,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Category, AppError> {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::BadRequest("Category name is required".to_string()));
    }
    let description = description.map(str::trim).filter(|d| !d.is_empty());

    if store.find_category_by_name(name).await?.is_some() {
        return Err(AppError::Conflict("Category already exists".to_string()));
    }

    store
        .create_category(name, description, Some(owner.user_id))
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation(_) => {
                AppError::Conflict("Category already exists".to_string())
            }
            other => other.into(),
        })
}

fn in_use(count: i64) -> AppError {
    AppError::BadRequest(format!(
        "Cannot delete category. It is being used by {count} expense(s)."
    ))
}

/// Delete an unused category. A category owned by someone else needs an admin.
pub async fn delete(store: &dyn Store, caller: &AuthUser, id: Uuid) -> Result<(), AppError> {
    let category = store
        .find_category_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    if let Some(owner) = category.owner_user_id {
        if owner != caller.user_id && !caller.is_admin() {
            return Err(AppError::Forbidden(
                "Only the category owner can delete it".to_string(),
            ));
        }
    }

    let usage = store.category_usage_count(id).await?;
    if usage > 0 {
        return Err(in_use(usage));
    }

    match store.delete_category(id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::NotFound("Category not found".to_string())),
        // An expense was attached between the count and the delete.
        Err(StoreError::ForeignKeyViolation(_)) => {
            let usage = store.category_usage_count(id).await?;
            Err(in_use(usage.max(1)))
        }
        Err(e) => Err(e.into()),
    }
}
