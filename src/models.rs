use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

// ============ Database Models ============

/// A business pain point attributed to a lead.
///
/// Value object owned by its parent `Lead`; stored inside the lead's
/// JSONB column and has no independent lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainPoint {
    /// Free-text description of the problem.
    pub description: String,
    /// Urgency on a 1-5 scale.
    pub urgency: i32,
    /// Informal category label (operational, financial, technological,
    /// strategic, compliance, general).
    pub category: String,
}

/// Represents a sales lead being evaluated for outreach.
///
/// This is the central entity. Descriptive fields come from the caller;
/// enrichment fields are written exclusively by the analysis pipeline.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Lead {
    /// Unique identifier, generated at creation.
    pub id: Uuid,
    /// Company name (required, non-empty).
    pub company_name: String,
    /// Industry sector.
    pub industry: Option<String>,
    /// Size of the company.
    pub company_size: Option<String>,
    /// Name of the decision maker.
    pub decision_maker_name: Option<String>,
    /// Title of the decision maker.
    pub decision_maker_title: Option<String>,
    /// LinkedIn profile URL.
    pub linkedin_url: Option<String>,
    /// Pain points extracted by the analysis pipeline.
    pub pain_points: Json<Vec<PainPoint>>,
    /// Summary of recent activity, taken from the analysis coldness factors.
    pub recent_activity_summary: Option<String>,
    /// Coldness rating, 1 (very active) to 10 (very cold).
    pub coldness_score: Option<i32>,
    /// Weighted composite score; hot >= 8, warm 5-7.99, cold < 5.
    pub total_lead_score: Option<f64>,
    /// Recommended initial outreach angle.
    pub best_outreach_angle: Option<String>,
    /// Contact information quality, 1-5. Never derived by the pipeline;
    /// scoring substitutes a constant instead.
    pub contact_info_quality: Option<i32>,
    /// Analysis state: pending, analyzing, completed, failed.
    pub analysis_status: String,
    /// Timestamp of creation, set once.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last mutation.
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Builds a fresh lead from a creation request.
    ///
    /// Enrichment fields start empty and the lead starts in `pending`.
    pub fn new(payload: &LeadCreate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            company_name: payload.company_name.clone(),
            industry: payload.industry.clone(),
            company_size: payload.company_size.clone(),
            decision_maker_name: payload.decision_maker_name.clone(),
            decision_maker_title: payload.decision_maker_title.clone(),
            linkedin_url: payload.linkedin_url.clone(),
            pain_points: Json(Vec::new()),
            recent_activity_summary: None,
            coldness_score: None,
            total_lead_score: None,
            best_outreach_angle: None,
            contact_info_quality: None,
            analysis_status: AnalysisStatus::Pending.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Analysis state machine: pending -> analyzing -> {completed, failed}.
///
/// Transitions are driven only by the pipeline and never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Analyzing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Analyzing => "analyzing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ API Request/Response Models ============

/// Request payload for creating or replacing a lead.
///
/// `PUT /leads/:id` reuses this shape; `manual_content` is only acted on
/// at creation time.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadCreate {
    /// Company name (required).
    pub company_name: String,
    /// Industry sector.
    pub industry: Option<String>,
    /// Size of the company.
    pub company_size: Option<String>,
    /// Name of the decision maker.
    pub decision_maker_name: Option<String>,
    /// Title of the decision maker.
    pub decision_maker_title: Option<String>,
    /// LinkedIn profile URL.
    pub linkedin_url: Option<String>,
    /// Free-text content to analyze; non-empty content schedules analysis.
    pub manual_content: Option<String>,
}

/// Query parameters for the manual analysis trigger.
#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    /// Free-text content to analyze.
    pub content: String,
}

/// Aggregate lead counts by score bucket.
///
/// Leads without a total score belong to no bucket, so the three buckets
/// partition only the scored subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadStats {
    pub total_leads: i64,
    pub hot_leads: i64,
    pub warm_leads: i64,
    pub cold_leads: i64,
}
