use std::cmp::Reverse;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{DateRange, MonthlyTotal, Store, StoreError, month_start};
use crate::models::{
    AdminExpenseView, Category, CategoryTotal, ExpenseChanges, ExpenseView, NewExpense, NewUser,
    User,
};

#[derive(Debug, Clone)]
struct ExpenseRow {
    id: Uuid,
    owner_user_id: Uuid,
    category_id: Uuid,
    amount: Decimal,
    description: Option<String>,
    date: chrono::NaiveDate,
    created_at: chrono::DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    expenses: Vec<ExpenseRow>,
}

impl Tables {
    fn view(&self, row: &ExpenseRow) -> ExpenseView {
        ExpenseView {
            id: row.id,
            owner_user_id: row.owner_user_id,
            category_id: row.category_id,
            amount: row.amount,
            description: row.description.clone(),
            date: row.date,
            created_at: row.created_at,
            category_name: self
                .categories
                .iter()
                .find(|c| c.id == row.category_id)
                .map(|c| c.name.clone()),
        }
    }

    fn owned_views(&self, owner_user_id: Uuid) -> Vec<ExpenseView> {
        let mut views: Vec<ExpenseView> = self
            .expenses
            .iter()
            .filter(|e| e.owner_user_id == owner_user_id)
            .map(|e| self.view(e))
            .collect();
        views.sort_by_key(|e| Reverse((e.date, e.id)));
        views
    }

    fn category_exists(&self, id: Uuid) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }
}

/// In-process store with the same constraint behaviour as the Postgres schema
/// (unique email, unique category name, restricted category deletes).
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new: NewUser<'_>) -> Result<User, StoreError> {
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }
        let user = User {
            id: Uuid::now_v7(),
            name: new.name.to_string(),
            email: new.email.to_string(),
            password_hash: new.password_hash.to_string(),
            role: new.role,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users = self.lock().users.clone();
        users.sort_by_key(|u| Reverse((u.created_at, u.id)));
        Ok(users)
    }

    async fn count_users(&self) -> Result<i64, StoreError> {
        Ok(self.lock().users.len() as i64)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories = self.lock().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn count_categories(&self) -> Result<i64, StoreError> {
        Ok(self.lock().categories.len() as i64)
    }

    async fn find_category_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        Ok(self.lock().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, StoreError> {
        Ok(self.lock().categories.iter().find(|c| c.name == name).cloned())
    }

    async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
        owner_user_id: Option<Uuid>,
    ) -> Result<Category, StoreError> {
        let mut tables = self.lock();
        if tables.categories.iter().any(|c| c.name == name) {
            return Err(StoreError::UniqueViolation("categories_name_key".to_string()));
        }
        let category = Category {
            id: Uuid::now_v7(),
            name: name.to_string(),
            description: description.map(str::to_string),
            owner_user_id,
            created_at: Utc::now(),
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn insert_category_if_absent(&self, name: &str) -> Result<bool, StoreError> {
        match self.create_category(name, None, None).await {
            Ok(_) => Ok(true),
            Err(StoreError::UniqueViolation(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn category_usage_count(&self, id: Uuid) -> Result<i64, StoreError> {
        Ok(self
            .lock()
            .expenses
            .iter()
            .filter(|e| e.category_id == id)
            .count() as i64)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        if tables.expenses.iter().any(|e| e.category_id == id) {
            return Err(StoreError::ForeignKeyViolation(
                "expenses_category_id_fkey".to_string(),
            ));
        }
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        Ok(tables.categories.len() < before)
    }

    async fn create_expense(&self, new: NewExpense) -> Result<ExpenseView, StoreError> {
        let mut tables = self.lock();
        if !tables.category_exists(new.category_id) {
            return Err(StoreError::ForeignKeyViolation(
                "expenses_category_id_fkey".to_string(),
            ));
        }
        let row = ExpenseRow {
            id: Uuid::now_v7(),
            owner_user_id: new.owner_user_id,
            category_id: new.category_id,
            amount: new.amount,
            description: new.description,
            date: new.date,
            created_at: Utc::now(),
        };
        let view = tables.view(&row);
        tables.expenses.push(row);
        Ok(view)
    }

    async fn list_expenses(&self, owner_user_id: Uuid) -> Result<Vec<ExpenseView>, StoreError> {
        Ok(self.lock().owned_views(owner_user_id))
    }

    async fn recent_expenses(
        &self,
        owner_user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ExpenseView>, StoreError> {
        let mut views = self.lock().owned_views(owner_user_id);
        views.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(views)
    }

    async fn find_expense(
        &self,
        id: Uuid,
        owner_user_id: Uuid,
    ) -> Result<Option<ExpenseView>, StoreError> {
        let tables = self.lock();
        Ok(tables
            .expenses
            .iter()
            .find(|e| e.id == id && e.owner_user_id == owner_user_id)
            .map(|e| tables.view(e)))
    }

    async fn update_expense(
        &self,
        id: Uuid,
        owner_user_id: Uuid,
        changes: &ExpenseChanges,
    ) -> Result<Option<ExpenseView>, StoreError> {
        let mut tables = self.lock();
        if let Some(category_id) = changes.category_id {
            if !tables.category_exists(category_id) {
                return Err(StoreError::ForeignKeyViolation(
                    "expenses_category_id_fkey".to_string(),
                ));
            }
        }
        let Some(row) = tables
            .expenses
            .iter_mut()
            .find(|e| e.id == id && e.owner_user_id == owner_user_id)
        else {
            return Ok(None);
        };

        if let Some(category_id) = changes.category_id {
            row.category_id = category_id;
        }
        if let Some(amount) = changes.amount {
            row.amount = amount;
        }
        if let Some(description) = &changes.description {
            row.description = description.clone();
        }
        if let Some(date) = changes.date {
            row.date = date;
        }

        let row = row.clone();
        Ok(Some(tables.view(&row)))
    }

    async fn delete_expense(&self, id: Uuid, owner_user_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        let before = tables.expenses.len();
        tables
            .expenses
            .retain(|e| !(e.id == id && e.owner_user_id == owner_user_id));
        Ok(tables.expenses.len() < before)
    }

    async fn list_all_expenses(&self) -> Result<Vec<AdminExpenseView>, StoreError> {
        let tables = self.lock();
        let mut views: Vec<AdminExpenseView> = tables
            .expenses
            .iter()
            .map(|e| {
                let owner = tables.users.iter().find(|u| u.id == e.owner_user_id);
                AdminExpenseView {
                    expense: tables.view(e),
                    user_name: owner.map(|u| u.name.clone()),
                    user_email: owner.map(|u| u.email.clone()),
                }
            })
            .collect();
        views.sort_by_key(|v| Reverse((v.expense.date, v.expense.id)));
        Ok(views)
    }

    async fn count_expenses(&self) -> Result<i64, StoreError> {
        Ok(self.lock().expenses.len() as i64)
    }

    async fn expense_total(
        &self,
        owner_user_id: Option<Uuid>,
        range: Option<DateRange>,
    ) -> Result<Decimal, StoreError> {
        Ok(self
            .lock()
            .expenses
            .iter()
            .filter(|e| owner_user_id.is_none_or(|owner| e.owner_user_id == owner))
            .filter(|e| range.is_none_or(|r| r.contains(e.date)))
            .map(|e| e.amount)
            .sum())
    }

    async fn category_totals(
        &self,
        owner_user_id: Option<Uuid>,
    ) -> Result<Vec<CategoryTotal>, StoreError> {
        let tables = self.lock();
        let mut totals: Vec<CategoryTotal> = tables
            .categories
            .iter()
            .map(|c| CategoryTotal {
                id: c.id,
                name: c.name.clone(),
                total: tables
                    .expenses
                    .iter()
                    .filter(|e| e.category_id == c.id)
                    .filter(|e| owner_user_id.is_none_or(|owner| e.owner_user_id == owner))
                    .map(|e| e.amount)
                    .sum(),
            })
            .collect();
        totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
        Ok(totals)
    }

    async fn monthly_totals(
        &self,
        owner_user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<MonthlyTotal>, StoreError> {
        let tables = self.lock();
        let mut months: Vec<MonthlyTotal> = Vec::new();
        for expense in tables
            .expenses
            .iter()
            .filter(|e| e.owner_user_id == owner_user_id && range.contains(e.date))
        {
            let month = month_start(expense.date);
            match months.iter_mut().find(|m| m.month == month) {
                Some(entry) => entry.total += expense.amount,
                None => months.push(MonthlyTotal {
                    month,
                    total: expense.amount,
                }),
            }
        }
        months.sort_by_key(|m| m.month);
        Ok(months)
    }
}
