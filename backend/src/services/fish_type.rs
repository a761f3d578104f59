//! Fish type and rate management service

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    effective_rate, proper_fish_fallback_rate, FishType, FishTypeRate, PROPER_FISH_NAME,
};

/// Fish type service handling the rate history and date resolution
#[derive(Clone)]
pub struct FishTypeService {
    db: PgPool,
}

/// Database row for a fish type
#[derive(Debug, sqlx::FromRow)]
struct FishTypeRow {
    id: Uuid,
    name: String,
    default_rate_per_kilo: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FishTypeRow> for FishType {
    fn from(row: FishTypeRow) -> Self {
        FishType {
            id: row.id,
            name: row.name,
            default_rate_per_kilo: row.default_rate_per_kilo,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for a rate record
#[derive(Debug, sqlx::FromRow)]
struct FishTypeRateRow {
    id: Uuid,
    fish_type_id: Uuid,
    rate_per_kilo: Decimal,
    rate_effective_from: Option<NaiveDate>,
    rate_effective_to: Option<NaiveDate>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<FishTypeRateRow> for FishTypeRate {
    fn from(row: FishTypeRateRow) -> Self {
        FishTypeRate {
            id: row.id,
            fish_type_id: row.fish_type_id,
            rate_per_kilo: row.rate_per_kilo,
            rate_effective_from: row.rate_effective_from,
            rate_effective_to: row.rate_effective_to,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

/// Input for creating a fish type
#[derive(Debug, Deserialize)]
pub struct CreateFishTypeInput {
    pub name: String,
    pub default_rate_per_kilo: Decimal,
}

/// Input for updating a fish type
#[derive(Debug, Deserialize)]
pub struct UpdateFishTypeInput {
    pub name: Option<String>,
    pub default_rate_per_kilo: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Input for adding a dated rate record
#[derive(Debug, Deserialize)]
pub struct AddRateInput {
    pub rate_per_kilo: Decimal,
    pub rate_effective_from: Option<NaiveDate>,
    pub rate_effective_to: Option<NaiveDate>,
}

impl FishTypeService {
    /// Create a new FishTypeService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a fish type
    pub async fn create_fish_type(&self, input: CreateFishTypeInput) -> AppResult<FishType> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Fish type name is required".to_string(),
            });
        }
        if input.default_rate_per_kilo < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "default_rate_per_kilo".to_string(),
                message: "Default rate cannot be negative".to_string(),
            });
        }

        let row = sqlx::query_as::<_, FishTypeRow>(
            r#"
            INSERT INTO fish_types (name, default_rate_per_kilo, is_active)
            VALUES ($1, $2, TRUE)
            RETURNING id, name, default_rate_per_kilo, is_active, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.default_rate_per_kilo)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get fish type by ID
    pub async fn get_fish_type(&self, fish_type_id: Uuid) -> AppResult<FishType> {
        let row = sqlx::query_as::<_, FishTypeRow>(
            r#"
            SELECT id, name, default_rate_per_kilo, is_active, created_at, updated_at
            FROM fish_types
            WHERE id = $1
            "#,
        )
        .bind(fish_type_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Fish type".to_string()))?;

        Ok(row.into())
    }

    /// List all fish types
    pub async fn list_fish_types(&self) -> AppResult<Vec<FishType>> {
        let rows = sqlx::query_as::<_, FishTypeRow>(
            r#"
            SELECT id, name, default_rate_per_kilo, is_active, created_at, updated_at
            FROM fish_types
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Update a fish type
    pub async fn update_fish_type(
        &self,
        fish_type_id: Uuid,
        input: UpdateFishTypeInput,
    ) -> AppResult<FishType> {
        self.get_fish_type(fish_type_id).await?;

        if let Some(rate) = input.default_rate_per_kilo {
            if rate < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "default_rate_per_kilo".to_string(),
                    message: "Default rate cannot be negative".to_string(),
                });
            }
        }

        let row = sqlx::query_as::<_, FishTypeRow>(
            r#"
            UPDATE fish_types
            SET name = COALESCE($2, name),
                default_rate_per_kilo = COALESCE($3, default_rate_per_kilo),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, default_rate_per_kilo, is_active, created_at, updated_at
            "#,
        )
        .bind(fish_type_id)
        .bind(&input.name)
        .bind(input.default_rate_per_kilo)
        .bind(input.is_active)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Add a dated rate record for a fish type
    pub async fn add_rate(&self, fish_type_id: Uuid, input: AddRateInput) -> AppResult<FishTypeRate> {
        self.get_fish_type(fish_type_id).await?;

        if input.rate_per_kilo < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "rate_per_kilo".to_string(),
                message: "Rate cannot be negative".to_string(),
            });
        }
        if let (Some(from), Some(to)) = (input.rate_effective_from, input.rate_effective_to) {
            if to < from {
                return Err(AppError::Validation {
                    field: "rate_effective_to".to_string(),
                    message: "Effective-to date cannot precede effective-from".to_string(),
                });
            }
        }

        let row = sqlx::query_as::<_, FishTypeRateRow>(
            r#"
            INSERT INTO fish_type_rates (fish_type_id, rate_per_kilo, rate_effective_from,
                                         rate_effective_to, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING id, fish_type_id, rate_per_kilo, rate_effective_from, rate_effective_to,
                      is_active, created_at
            "#,
        )
        .bind(fish_type_id)
        .bind(input.rate_per_kilo)
        .bind(input.rate_effective_from)
        .bind(input.rate_effective_to)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// List the rate history of a fish type
    pub async fn list_rates(&self, fish_type_id: Uuid) -> AppResult<Vec<FishTypeRate>> {
        let rows = sqlx::query_as::<_, FishTypeRateRow>(
            r#"
            SELECT id, fish_type_id, rate_per_kilo, rate_effective_from, rate_effective_to,
                   is_active, created_at
            FROM fish_type_rates
            WHERE fish_type_id = $1
            ORDER BY rate_effective_from DESC NULLS LAST, created_at DESC
            "#,
        )
        .bind(fish_type_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Resolve the effective per-kilo rate of a fish type on a date
    pub async fn current_rate(&self, fish_type_id: Uuid, date: NaiveDate) -> AppResult<Decimal> {
        let fish_type = self.get_fish_type(fish_type_id).await?;
        let rates = self.list_rates(fish_type_id).await?;

        Ok(effective_rate(
            fish_type.default_rate_per_kilo,
            &rates,
            date,
        ))
    }

    /// Rate used to value crew baseline kilos on a trip date.
    ///
    /// Falls back to 16.00 when the proper fish type is not configured.
    pub async fn proper_fish_rate(&self, date: NaiveDate) -> AppResult<Decimal> {
        let fish_type = sqlx::query_as::<_, FishTypeRow>(
            r#"
            SELECT id, name, default_rate_per_kilo, is_active, created_at, updated_at
            FROM fish_types
            WHERE name = $1
            "#,
        )
        .bind(PROPER_FISH_NAME)
        .fetch_optional(&self.db)
        .await?;

        match fish_type {
            Some(fish_type) => {
                let rates = self.list_rates(fish_type.id).await?;
                Ok(effective_rate(
                    fish_type.default_rate_per_kilo,
                    &rates,
                    date,
                ))
            }
            None => Ok(proper_fish_fallback_rate()),
        }
    }
}
