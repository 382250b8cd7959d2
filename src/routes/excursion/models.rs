use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::schemas::ExcursionData;
use crate::schemas::Status;

#[derive(Debug, FromRow)]
pub struct ExcursionModel {
    pub id: i64,
    pub destination_id: i64,
    pub destination_name: String,
    pub title: String,
    pub description: String,
    pub price: BigDecimal,
    pub capacity: i32,
    pub duration_hours: Option<i32>,
    pub is_active: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExcursionModel {
    pub fn into_schema(self) -> ExcursionData {
        ExcursionData {
            id: self.id,
            destination_id: self.destination_id,
            destination_name: self.destination_name,
            title: self.title,
            description: self.description,
            price: self.price,
            capacity: self.capacity,
            duration_hours: self.duration_hours,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Price basis loaded at checkout time.
#[derive(Debug, FromRow)]
pub struct BookableExcursionModel {
    pub id: i64,
    pub price: BigDecimal,
}
