use sqlx::{postgres::PgPoolOptions, PgPool};

/// Schema bootstrap: a single document-style table, pain points inlined
/// as JSONB on the owning row.
const LEADS_TABLE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS leads (
    id UUID PRIMARY KEY,
    company_name TEXT NOT NULL,
    industry TEXT,
    company_size TEXT,
    decision_maker_name TEXT,
    decision_maker_title TEXT,
    linkedin_url TEXT,
    pain_points JSONB NOT NULL DEFAULT '[]'::jsonb,
    recent_activity_summary TEXT,
    coldness_score INTEGER,
    total_lead_score DOUBLE PRECISION,
    best_outreach_angle TEXT,
    contact_info_quality INTEGER,
    analysis_status TEXT NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)
"#;

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        // Bootstrap the leads table if this is a fresh database
        sqlx::query(LEADS_TABLE_DDL).execute(&pool).await?;

        Ok(Self { pool })
    }
}
