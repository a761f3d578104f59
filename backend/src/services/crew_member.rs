//! Crew member management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::CrewMember;

/// Crew member service
#[derive(Clone)]
pub struct CrewMemberService {
    db: PgPool,
}

/// Database row for a crew member
#[derive(Debug, sqlx::FromRow)]
struct CrewMemberRow {
    id: Uuid,
    name: String,
    local_name: Option<String>,
    phone: Option<String>,
    id_card_no: Option<String>,
    bank_name: Option<String>,
    bank_account_number: Option<String>,
    bank_account_holder: Option<String>,
    notes: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CrewMemberRow> for CrewMember {
    fn from(row: CrewMemberRow) -> Self {
        CrewMember {
            id: row.id,
            name: row.name,
            local_name: row.local_name,
            phone: row.phone,
            id_card_no: row.id_card_no,
            bank_name: row.bank_name,
            bank_account_number: row.bank_account_number,
            bank_account_holder: row.bank_account_holder,
            notes: row.notes,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CREW_MEMBER_COLUMNS: &str = "id, name, local_name, phone, id_card_no, bank_name, \
     bank_account_number, bank_account_holder, notes, active, created_at, updated_at";

/// Input for registering a crew member
#[derive(Debug, Deserialize)]
pub struct CreateCrewMemberInput {
    pub name: String,
    pub local_name: Option<String>,
    pub phone: Option<String>,
    pub id_card_no: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_account_holder: Option<String>,
    pub notes: Option<String>,
}

/// Input for updating a crew member
#[derive(Debug, Deserialize)]
pub struct UpdateCrewMemberInput {
    pub name: Option<String>,
    pub local_name: Option<String>,
    pub phone: Option<String>,
    pub id_card_no: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_account_holder: Option<String>,
    pub notes: Option<String>,
    pub active: Option<bool>,
}

impl CrewMemberService {
    /// Create a new CrewMemberService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a new crew member
    pub async fn create_crew_member(&self, input: CreateCrewMemberInput) -> AppResult<CrewMember> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Crew member name is required".to_string(),
            });
        }

        let row = sqlx::query_as::<_, CrewMemberRow>(&format!(
            r#"
            INSERT INTO crew_members (name, local_name, phone, id_card_no, bank_name,
                                      bank_account_number, bank_account_holder, notes, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
            RETURNING {CREW_MEMBER_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.local_name)
        .bind(&input.phone)
        .bind(&input.id_card_no)
        .bind(&input.bank_name)
        .bind(&input.bank_account_number)
        .bind(&input.bank_account_holder)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get crew member by ID
    pub async fn get_crew_member(&self, crew_member_id: Uuid) -> AppResult<CrewMember> {
        let row = sqlx::query_as::<_, CrewMemberRow>(&format!(
            "SELECT {CREW_MEMBER_COLUMNS} FROM crew_members WHERE id = $1"
        ))
        .bind(crew_member_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Crew member".to_string()))?;

        Ok(row.into())
    }

    /// List crew members, optionally restricted to active ones
    pub async fn list_crew_members(&self, active_only: bool) -> AppResult<Vec<CrewMember>> {
        let rows = sqlx::query_as::<_, CrewMemberRow>(&format!(
            r#"
            SELECT {CREW_MEMBER_COLUMNS}
            FROM crew_members
            WHERE ($1 = FALSE OR active = TRUE)
            ORDER BY name
            "#
        ))
        .bind(active_only)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Update a crew member
    pub async fn update_crew_member(
        &self,
        crew_member_id: Uuid,
        input: UpdateCrewMemberInput,
    ) -> AppResult<CrewMember> {
        self.get_crew_member(crew_member_id).await?;

        let row = sqlx::query_as::<_, CrewMemberRow>(&format!(
            r#"
            UPDATE crew_members
            SET name = COALESCE($2, name),
                local_name = COALESCE($3, local_name),
                phone = COALESCE($4, phone),
                id_card_no = COALESCE($5, id_card_no),
                bank_name = COALESCE($6, bank_name),
                bank_account_number = COALESCE($7, bank_account_number),
                bank_account_holder = COALESCE($8, bank_account_holder),
                notes = COALESCE($9, notes),
                active = COALESCE($10, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CREW_MEMBER_COLUMNS}
            "#
        ))
        .bind(crew_member_id)
        .bind(&input.name)
        .bind(&input.local_name)
        .bind(&input.phone)
        .bind(&input.id_card_no)
        .bind(&input.bank_name)
        .bind(&input.bank_account_number)
        .bind(&input.bank_account_holder)
        .bind(&input.notes)
        .bind(input.active)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Deactivate a crew member; past assignments and payouts remain
    pub async fn deactivate_crew_member(&self, crew_member_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE crew_members SET active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(crew_member_id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Crew member".to_string()));
        }

        Ok(())
    }
}
