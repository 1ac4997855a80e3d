use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{DateRange, MonthlyTotal, Store, StoreError};
use crate::db;
use crate::models::{
    AdminExpenseView, Category, CategoryTotal, ExpenseChanges, ExpenseView, NewExpense, NewUser,
    User,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new: NewUser<'_>) -> Result<User, StoreError> {
        Ok(db::users::create(&self.pool, &new).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(db::users::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(db::users::find_by_id(&self.pool, id).await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(db::users::list_all(&self.pool).await?)
    }

    async fn count_users(&self) -> Result<i64, StoreError> {
        Ok(db::users::count_all(&self.pool).await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(db::categories::list(&self.pool).await?)
    }

    async fn count_categories(&self) -> Result<i64, StoreError> {
        Ok(db::categories::count_all(&self.pool).await?)
    }

    async fn find_category_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        Ok(db::categories::find_by_id(&self.pool, id).await?)
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, StoreError> {
        Ok(db::categories::find_by_name(&self.pool, name).await?)
    }

    async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
        owner_user_id: Option<Uuid>,
    ) -> Result<Category, StoreError> {
        Ok(db::categories::create(&self.pool, name, description, owner_user_id).await?)
    }

    async fn insert_category_if_absent(&self, name: &str) -> Result<bool, StoreError> {
        Ok(db::categories::insert_if_absent(&self.pool, name).await?)
    }

    async fn category_usage_count(&self, id: Uuid) -> Result<i64, StoreError> {
        Ok(db::categories::usage_count(&self.pool, id).await?)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(db::categories::delete(&self.pool, id).await?)
    }

    async fn create_expense(&self, new: NewExpense) -> Result<ExpenseView, StoreError> {
        Ok(db::expenses::create(&self.pool, &new).await?)
    }

    async fn list_expenses(&self, owner_user_id: Uuid) -> Result<Vec<ExpenseView>, StoreError> {
        Ok(db::expenses::list_by_owner(&self.pool, owner_user_id).await?)
    }

    async fn recent_expenses(
        &self,
        owner_user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ExpenseView>, StoreError> {
        Ok(db::expenses::recent_by_owner(&self.pool, owner_user_id, limit).await?)
    }

    async fn find_expense(
        &self,
        id: Uuid,
        owner_user_id: Uuid,
    ) -> Result<Option<ExpenseView>, StoreError> {
        Ok(db::expenses::find_by_id(&self.pool, id, owner_user_id).await?)
    }

    async fn update_expense(
        &self,
        id: Uuid,
        owner_user_id: Uuid,
        changes: &ExpenseChanges,
    ) -> Result<Option<ExpenseView>, StoreError> {
        Ok(db::expenses::update(&self.pool, id, owner_user_id, changes).await?)
    }

    async fn delete_expense(&self, id: Uuid, owner_user_id: Uuid) -> Result<bool, StoreError> {
        Ok(db::expenses::delete(&self.pool, id, owner_user_id).await?)
    }

    async fn list_all_expenses(&self) -> Result<Vec<AdminExpenseView>, StoreError> {
        Ok(db::expenses::list_all(&self.pool).await?)
    }

    async fn count_expenses(&self) -> Result<i64, StoreError> {
        Ok(db::expenses::count_all(&self.pool).await?)
    }

    async fn expense_total(
        &self,
        owner_user_id: Option<Uuid>,
        range: Option<DateRange>,
    ) -> Result<Decimal, StoreError> {
        Ok(db::reports::total(&self.pool, owner_user_id, range).await?)
    }

    async fn category_totals(
        &self,
        owner_user_id: Option<Uuid>,
    ) -> Result<Vec<CategoryTotal>, StoreError> {
        Ok(db::reports::category_totals(&self.pool, owner_user_id).await?)
    }

    async fn monthly_totals(
        &self,
        owner_user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<MonthlyTotal>, StoreError> {
        Ok(db::reports::monthly_totals(&self.pool, owner_user_id, range).await?)
    }
}
