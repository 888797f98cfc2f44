use crate::analysis::spawn_analysis;
use crate::errors::{AppError, ResultExt};
use crate::llm_client::ChatModel;
use crate::models::{AnalyzeParams, Lead, LeadCreate, LeadStats};
use crate::store::LeadStore;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Leads returned by a full listing, matching the store-side scan cap.
const LIST_LIMIT: i64 = 1000;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Lead persistence capability.
    pub store: Arc<dyn LeadStore>,
    /// Chat model used by the analysis pipeline (absent when no
    /// credential is configured; analysis then fails per lead).
    pub chat_model: Option<Arc<dyn ChatModel>>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-leadgen-api",
            "version": "0.1.0"
        })),
    )
}

/// GET /api/
///
/// Service info for API consumers.
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Lead Generation System API",
        "version": "1.0"
    }))
}

/// POST /api/leads
///
/// Creates a new lead. When `manual_content` is non-empty, the analysis
/// pipeline is scheduled in the background and the created lead is
/// returned immediately, still `pending`.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - The lead data to create.
///
/// # Returns
///
/// * `Result<Json<Lead>, AppError>` - The created lead or an error.
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LeadCreate>,
) -> Result<Json<Lead>, AppError> {
    tracing::info!("POST /leads - company: {}", payload.company_name);

    if payload.company_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "company_name cannot be empty".to_string(),
        ));
    }

    let lead = Lead::new(&payload);
    state
        .store
        .insert(&lead)
        .await
        .context("Failed to store new lead")?;

    if let Some(content) = payload.manual_content.as_deref().filter(|c| !c.is_empty()) {
        // Fire-and-forget; the caller polls the lead status for progress
        spawn_analysis(
            state.store.clone(),
            state.chat_model.clone(),
            lead.clone(),
            content.to_string(),
        );
    }

    Ok(Json(lead))
}

/// GET /api/leads
///
/// Lists leads, newest first, capped at 1000 records.
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Lead>>, AppError> {
    let leads = state.store.list(LIST_LIMIT).await?;
    Ok(Json(leads))
}

/// GET /api/leads/:id
///
/// Fetches a single lead.
///
/// # Returns
///
/// * `Result<Json<Lead>, AppError>` - The lead, or 404 when unknown.
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Lead>, AppError> {
    let lead = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lead not found".to_string()))?;

    Ok(Json(lead))
}

/// PUT /api/leads/:id
///
/// Replaces the lead's descriptive fields. Enrichment fields and the
/// analysis status are untouched; no analysis is scheduled even when the
/// payload carries `manual_content`.
pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeadCreate>,
) -> Result<Json<Lead>, AppError> {
    tracing::info!("PUT /leads/{}", id);

    if payload.company_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "company_name cannot be empty".to_string(),
        ));
    }

    let lead = state
        .store
        .update_profile(id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Lead not found".to_string()))?;

    Ok(Json(lead))
}

/// DELETE /api/leads/:id
///
/// Removes the lead permanently. Deleting an unknown id reports 404, not
/// success.
pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!("DELETE /leads/{}", id);

    let deleted = state.store.delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Lead not found".to_string()));
    }

    Ok(Json(json!({ "message": "Lead deleted successfully" })))
}

/// POST /api/leads/:id/analyze?content=...
///
/// Manually triggers analysis for an existing lead with caller-supplied
/// content. Responds immediately; completion is observed by polling.
/// Content is not validated non-empty.
pub async fn trigger_analysis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<AnalyzeParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!("POST /leads/{}/analyze", id);

    let lead = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lead not found".to_string()))?;

    spawn_analysis(
        state.store.clone(),
        state.chat_model.clone(),
        lead,
        params.content,
    );

    Ok(Json(json!({ "message": "Analysis started" })))
}

/// GET /api/leads/stats/summary
///
/// Live lead counts bucketed by total score: hot >= 8, warm 5-7.99,
/// cold < 5. Unscored leads count only toward the total.
pub async fn lead_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LeadStats>, AppError> {
    let stats = state.store.stats().await?;
    Ok(Json(stats))
}
