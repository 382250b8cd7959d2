use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::schemas::DestinationData;
use crate::schemas::Status;

#[derive(Debug, FromRow)]
pub struct DestinationModel {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub description: String,
    pub image_url: Option<String>,
    pub is_active: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DestinationModel {
    pub fn into_schema(self) -> DestinationData {
        DestinationData {
            id: self.id,
            name: self.name,
            country: self.country,
            description: self.description,
            image_url: self.image_url,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
