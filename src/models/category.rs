use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Summed expense amount for one category. Categories without expenses carry a zero total.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "crate::models::money")]
    pub total: Decimal,
}
