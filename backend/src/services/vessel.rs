//! Vessel management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::Vessel;

/// Vessel service for managing the fleet
#[derive(Clone)]
pub struct VesselService {
    db: PgPool,
}

/// Database row for a vessel
#[derive(Debug, sqlx::FromRow)]
struct VesselRow {
    id: Uuid,
    name: String,
    registration_no: Option<String>,
    capacity: Option<i32>,
    home_island: Option<String>,
    notes: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VesselRow> for Vessel {
    fn from(row: VesselRow) -> Self {
        Vessel {
            id: row.id,
            name: row.name,
            registration_no: row.registration_no,
            capacity: row.capacity,
            home_island: row.home_island,
            notes: row.notes,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for registering a vessel
#[derive(Debug, Deserialize)]
pub struct CreateVesselInput {
    pub name: String,
    pub registration_no: Option<String>,
    pub capacity: Option<i32>,
    pub home_island: Option<String>,
    pub notes: Option<String>,
}

/// Input for updating a vessel
#[derive(Debug, Deserialize)]
pub struct UpdateVesselInput {
    pub name: Option<String>,
    pub registration_no: Option<String>,
    pub capacity: Option<i32>,
    pub home_island: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

impl VesselService {
    /// Create a new VesselService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a new vessel
    pub async fn create_vessel(&self, input: CreateVesselInput) -> AppResult<Vessel> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Vessel name is required".to_string(),
            });
        }

        let row = sqlx::query_as::<_, VesselRow>(
            r#"
            INSERT INTO vessels (name, registration_no, capacity, home_island, notes, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING id, name, registration_no, capacity, home_island, notes, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.registration_no)
        .bind(input.capacity)
        .bind(&input.home_island)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get vessel by ID
    pub async fn get_vessel(&self, vessel_id: Uuid) -> AppResult<Vessel> {
        let row = sqlx::query_as::<_, VesselRow>(
            r#"
            SELECT id, name, registration_no, capacity, home_island, notes, is_active,
                   created_at, updated_at
            FROM vessels
            WHERE id = $1
            "#,
        )
        .bind(vessel_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Vessel".to_string()))?;

        Ok(row.into())
    }

    /// List vessels, optionally restricted to active ones or matching a
    /// name search
    pub async fn list_vessels(
        &self,
        active_only: bool,
        search: Option<String>,
    ) -> AppResult<Vec<Vessel>> {
        let rows = sqlx::query_as::<_, VesselRow>(
            r#"
            SELECT id, name, registration_no, capacity, home_island, notes, is_active,
                   created_at, updated_at
            FROM vessels
            WHERE ($1 = FALSE OR is_active = TRUE)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
            ORDER BY name
            "#,
        )
        .bind(active_only)
        .bind(search)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Update a vessel
    pub async fn update_vessel(&self, vessel_id: Uuid, input: UpdateVesselInput) -> AppResult<Vessel> {
        // Ensure the vessel exists first
        self.get_vessel(vessel_id).await?;

        let row = sqlx::query_as::<_, VesselRow>(
            r#"
            UPDATE vessels
            SET name = COALESCE($2, name),
                registration_no = COALESCE($3, registration_no),
                capacity = COALESCE($4, capacity),
                home_island = COALESCE($5, home_island),
                notes = COALESCE($6, notes),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, registration_no, capacity, home_island, notes, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(vessel_id)
        .bind(&input.name)
        .bind(&input.registration_no)
        .bind(input.capacity)
        .bind(&input.home_island)
        .bind(&input.notes)
        .bind(input.is_active)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Deactivate a vessel (soft removal; trips keep referencing it)
    pub async fn deactivate_vessel(&self, vessel_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE vessels SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(vessel_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vessel".to_string()));
        }

        Ok(())
    }
}
