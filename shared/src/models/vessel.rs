//! Fishing vessel models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A fishing vessel operated by the business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vessel {
    pub id: Uuid,
    pub name: String,
    pub registration_no: Option<String>,
    pub capacity: Option<i32>,
    pub home_island: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
