use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CategoryTotal, ExpenseView};
use crate::store::{DateRange, Store, month_start};

const RECENT_LIMIT: i64 = 5;
const TREND_MONTHS: u32 = 6;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(with = "crate::models::money")]
    pub total_expense: Decimal,
    #[serde(with = "crate::models::money")]
    pub monthly_expense: Decimal,
    pub category_breakdown: Vec<CategoryTotal>,
    pub recent_expenses: Vec<ExpenseView>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MonthPoint {
    /// `YYYY-MM-01`, sorts lexically.
    pub month: String,
    /// e.g. `Mar 2024`.
    pub label: String,
    #[serde(with = "crate::models::money")]
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MonthlyTrend {
    pub months: Vec<MonthPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub total_users: i64,
    #[serde(with = "crate::models::money")]
    pub total_expenses: Decimal,
    pub total_transactions: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryBreakdown {
    pub categories: Vec<CategoryTotal>,
}

fn month_range(first_month: NaiveDate, months: u32) -> Result<DateRange, AppError> {
    let end = first_month
        .checked_add_months(Months::new(months))
        .ok_or_else(|| AppError::Internal(format!("date overflow after {first_month}")))?;
    Ok(DateRange {
        start: first_month,
        end,
    })
}

/// Stable ordering for breakdowns: largest total first, then by name.
fn sort_breakdown(totals: &mut [CategoryTotal]) {
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
}

pub async fn user_summary(
    store: &dyn Store,
    owner_user_id: Uuid,
    today: NaiveDate,
) -> Result<UserSummary, AppError> {
    let current_month = month_range(month_start(today), 1)?;

    let total_expense = store.expense_total(Some(owner_user_id), None).await?;
    let monthly_expense = store
        .expense_total(Some(owner_user_id), Some(current_month))
        .await?;
    let mut category_breakdown = store.category_totals(Some(owner_user_id)).await?;
    sort_breakdown(&mut category_breakdown);
    let recent_expenses = store.recent_expenses(owner_user_id, RECENT_LIMIT).await?;

    Ok(UserSummary {
        total_expense,
        monthly_expense,
        category_breakdown,
        recent_expenses,
    })
}

/// The trailing six calendar months ending with the current one, empty months included.
pub async fn user_monthly(
    store: &dyn Store,
    owner_user_id: Uuid,
    today: NaiveDate,
) -> Result<MonthlyTrend, AppError> {
    let first = month_start(today)
        .checked_sub_months(Months::new(TREND_MONTHS - 1))
        .ok_or_else(|| AppError::Internal(format!("date underflow before {today}")))?;
    let range = month_range(first, TREND_MONTHS)?;

    let totals = store.monthly_totals(owner_user_id, range).await?;

    let mut months = Vec::with_capacity(TREND_MONTHS as usize);
    let mut month = first;
    while month < range.end {
        let total = totals
            .iter()
            .find(|t| t.month == month)
            .map(|t| t.total)
            .unwrap_or(Decimal::ZERO);
        months.push(MonthPoint {
            month: month.format("%Y-%m-01").to_string(),
            label: month.format("%b %Y").to_string(),
            total,
        });
        month = month_range(month, 1)?.end;
    }

    Ok(MonthlyTrend { months })
}

pub async fn admin_summary(store: &dyn Store) -> Result<AdminSummary, AppError> {
    Ok(AdminSummary {
        total_users: store.count_users().await?,
        total_expenses: store.expense_total(None, None).await?,
        total_transactions: store.count_expenses().await?,
    })
}

pub async fn admin_categories(store: &dyn Store) -> Result<CategoryBreakdown, AppError> {
    let mut categories = store.category_totals(None).await?;
    sort_breakdown(&mut categories);
    Ok(CategoryBreakdown { categories })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::models::{NewExpense, NewUser, Role};
    use crate::store::MemoryStore;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn spend(store: &MemoryStore, owner: Uuid, category: Uuid, amount: &str, date: NaiveDate) {
        store
            .create_expense(NewExpense {
                owner_user_id: owner,
                category_id: category,
                amount: dec(amount),
                description: None,
                date,
            })
            .await
            .unwrap();
    }

    async fn user(store: &MemoryStore, email: &str) -> Uuid {
        store
            .create_user(NewUser {
                name: "Test",
                email,
                password_hash: "x",
                role: Role::User,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn summary_totals_and_breakdown_agree() {
        let store = MemoryStore::new();
        let food = store.create_category("Food", None, None).await.unwrap().id;
        let bills = store.create_category("Bills", None, None).await.unwrap().id;
        let _travel = store.create_category("Travel", None, None).await.unwrap().id;
        let ann = user(&store, "ann@x.com").await;
        let bob = user(&store, "bob@x.com").await;

        spend(&store, ann, food, "12.50", day(2024, 3, 1)).await;
        spend(&store, ann, food, "7.25", day(2024, 3, 20)).await;
        spend(&store, ann, bills, "100.00", day(2024, 1, 5)).await;
        spend(&store, bob, food, "999.99", day(2024, 3, 2)).await;

        let summary = user_summary(&store, ann, day(2024, 3, 25)).await.unwrap();
        assert_eq!(summary.total_expense, dec("119.75"));
        assert_eq!(summary.monthly_expense, dec("19.75"));

        let names: Vec<&str> = summary
            .category_breakdown
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bills", "Food", "Travel"]);
        assert_eq!(summary.category_breakdown[2].total, Decimal::ZERO);

        let breakdown_sum: Decimal = summary.category_breakdown.iter().map(|c| c.total).sum();
        assert_eq!(breakdown_sum, summary.total_expense);

        assert_eq!(summary.recent_expenses.len(), 3);
        assert_eq!(summary.recent_expenses[0].date, day(2024, 3, 20));
    }

    #[tokio::test]
    async fn zero_totals_sort_by_name() {
        let store = MemoryStore::new();
        for name in ["Zoo", "Apples", "Music"] {
            store.create_category(name, None, None).await.unwrap();
        }
        let breakdown = admin_categories(&store).await.unwrap();
        let names: Vec<&str> = breakdown.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Apples", "Music", "Zoo"]);
    }

    #[tokio::test]
    async fn recent_keeps_five_newest() {
        let store = MemoryStore::new();
        let food = store.create_category("Food", None, None).await.unwrap().id;
        let ann = user(&store, "ann@x.com").await;
        for d in 1..=7 {
            spend(&store, ann, food, "1", day(2024, 2, d)).await;
        }
        // Same date as the newest: the later insert wins the tie.
        spend(&store, ann, food, "2", day(2024, 2, 7)).await;

        let summary = user_summary(&store, ann, day(2024, 2, 28)).await.unwrap();
        assert_eq!(summary.recent_expenses.len(), 5);
        assert_eq!(summary.recent_expenses[0].amount, dec("2"));
        assert_eq!(summary.recent_expenses[4].date, day(2024, 2, 4));
    }

    #[tokio::test]
    async fn monthly_trend_fills_six_months() {
        let store = MemoryStore::new();
        let food = store.create_category("Food", None, None).await.unwrap().id;
        let ann = user(&store, "ann@x.com").await;

        spend(&store, ann, food, "10", day(2023, 9, 30)).await; // too old
        spend(&store, ann, food, "5.50", day(2023, 10, 1)).await;
        spend(&store, ann, food, "4.50", day(2023, 10, 31)).await;
        spend(&store, ann, food, "12.50", day(2024, 3, 1)).await;
        spend(&store, ann, food, "99", day(2024, 4, 1)).await; // future

        let trend = user_monthly(&store, ann, day(2024, 3, 15)).await.unwrap();
        let keys: Vec<&str> = trend.months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "2023-10-01",
                "2023-11-01",
                "2023-12-01",
                "2024-01-01",
                "2024-02-01",
                "2024-03-01"
            ]
        );
        assert_eq!(trend.months[0].label, "Oct 2023");
        assert_eq!(trend.months[0].total, dec("10.00"));
        assert_eq!(trend.months[1].total, Decimal::ZERO);
        assert_eq!(trend.months[5].total, dec("12.50"));
    }

    #[tokio::test]
    async fn admin_summary_counts_everything() {
        let store = MemoryStore::new();
        let food = store.create_category("Food", None, None).await.unwrap().id;
        let ann = user(&store, "ann@x.com").await;
        let bob = user(&store, "bob@x.com").await;
        spend(&store, ann, food, "1.25", day(2024, 1, 1)).await;
        spend(&store, bob, food, "2.50", day(2024, 1, 2)).await;

        let summary = admin_summary(&store).await.unwrap();
        assert_eq!(summary.total_users, 2);
        assert_eq!(summary.total_expenses, dec("3.75"));
        assert_eq!(summary.total_transactions, 2);

        let breakdown = admin_categories(&store).await.unwrap();
        assert_eq!(breakdown.categories[0].total, dec("3.75"));
    }
}
