use crate::analysis::AnalysisOutcome;
use crate::errors::AppError;
use crate::models::{AnalysisStatus, Lead, LeadCreate, LeadStats};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Persistence capability for leads.
///
/// Handlers and the analysis pipeline receive this as an injected
/// capability rather than reaching for a global pool, so tests can swap
/// in an in-memory fake. Every operation is a single-row read or write;
/// nothing holds a transaction across an LLM call.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Persists a freshly created lead.
    async fn insert(&self, lead: &Lead) -> Result<(), AppError>;

    /// Point lookup by id.
    async fn get(&self, id: Uuid) -> Result<Option<Lead>, AppError>;

    /// Full scan ordered by creation time, newest first, capped at `limit`.
    async fn list(&self, limit: i64) -> Result<Vec<Lead>, AppError>;

    /// Replaces the descriptive fields and refreshes `updated_at`.
    ///
    /// Enrichment fields and status are left untouched. Returns the
    /// updated lead, or `None` when the id is unknown.
    async fn update_profile(
        &self,
        id: Uuid,
        profile: &LeadCreate,
    ) -> Result<Option<Lead>, AppError>;

    /// Deletes the lead permanently. Returns whether a row existed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Writes a new analysis status and refreshes `updated_at`.
    async fn set_status(&self, id: Uuid, status: AnalysisStatus) -> Result<(), AppError>;

    /// Writes the full analysis outcome in one update and marks the lead
    /// `completed`.
    async fn apply_analysis(&self, id: Uuid, outcome: &AnalysisOutcome) -> Result<(), AppError>;

    /// Live counts over the whole collection, bucketed by total score.
    async fn stats(&self) -> Result<LeadStats, AppError>;
}

/// Postgres-backed lead store.
pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn insert(&self, lead: &Lead) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO leads (
                id, company_name, industry, company_size,
                decision_maker_name, decision_maker_title, linkedin_url,
                pain_points, recent_activity_summary, coldness_score,
                total_lead_score, best_outreach_angle, contact_info_quality,
                analysis_status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(lead.id)
        .bind(&lead.company_name)
        .bind(&lead.industry)
        .bind(&lead.company_size)
        .bind(&lead.decision_maker_name)
        .bind(&lead.decision_maker_title)
        .bind(&lead.linkedin_url)
        .bind(&lead.pain_points)
        .bind(&lead.recent_activity_summary)
        .bind(lead.coldness_score)
        .bind(lead.total_lead_score)
        .bind(&lead.best_outreach_angle)
        .bind(lead.contact_info_quality)
        .bind(&lead.analysis_status)
        .bind(lead.created_at)
        .bind(lead.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Inserted lead {}", lead.id);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(lead)
    }

    async fn list(&self, limit: i64) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(leads)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        profile: &LeadCreate,
    ) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads
            SET company_name = $2,
                industry = $3,
                company_size = $4,
                decision_maker_name = $5,
                decision_maker_title = $6,
                linkedin_url = $7,
                updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&profile.company_name)
        .bind(&profile.industry)
        .bind(&profile.company_size)
        .bind(&profile.decision_maker_name)
        .bind(&profile.decision_maker_title)
        .bind(&profile.linkedin_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(lead)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_status(&self, id: Uuid, status: AnalysisStatus) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE leads SET analysis_status = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!("No lead found to mark as {}: {}", status, id);
        }

        Ok(())
    }

    async fn apply_analysis(&self, id: Uuid, outcome: &AnalysisOutcome) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE leads
            SET pain_points = $2,
                coldness_score = $3,
                total_lead_score = $4,
                best_outreach_angle = $5,
                recent_activity_summary = $6,
                analysis_status = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(&outcome.pain_points))
        .bind(outcome.coldness_score)
        .bind(outcome.total_lead_score)
        .bind(&outcome.best_outreach_angle)
        .bind(&outcome.recent_activity_summary)
        .bind(AnalysisStatus::Completed.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!("No lead found to apply analysis results: {}", id);
        }

        Ok(())
    }

    async fn stats(&self) -> Result<LeadStats, AppError> {
        let total_leads = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leads")
            .fetch_one(&self.pool)
            .await?;

        let hot_leads = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leads WHERE total_lead_score >= 8",
        )
        .fetch_one(&self.pool)
        .await?;

        let warm_leads = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leads WHERE total_lead_score >= 5 AND total_lead_score < 8",
        )
        .fetch_one(&self.pool)
        .await?;

        // NULL scores fall out of every bucket, including cold
        let cold_leads = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leads WHERE total_lead_score < 5",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(LeadStats {
            total_leads,
            hot_leads,
            warm_leads,
            cold_leads,
        })
    }
}
