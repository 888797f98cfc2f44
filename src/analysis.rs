/// Lead analysis pipeline.
///
/// Orchestrates the enrichment of a single lead from free-text content:
/// 1. Mark the lead `analyzing`
/// 2. Build the prompt and call the chat model
/// 3. Extract the JSON analysis object (with fallbacks for sloppy output)
/// 4. Map pain points and compute the total score
/// 5. Write everything back in one update, marking `completed`
///
/// Any unhandled error after step 1 leaves the lead at `failed` with no
/// partial enrichment writes.
use crate::errors::AppError;
use crate::llm_client::ChatModel;
use crate::models::{AnalysisStatus, Lead, PainPoint};
use crate::prompts::{build_analysis_prompt, LEAD_ANALYST_SYSTEM};
use crate::scoring::{
    calculate_lead_score, COMPANY_FIT_BASELINE, CONTACT_QUALITY_BASELINE,
};
use crate::store::LeadStore;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Outcome of a JSON extraction attempt over raw model output.
///
/// "Malformed but present" and "absent" are distinct cases; both degrade
/// to fixed fallback analyses rather than failing the pipeline, but the
/// fallback texts differ so the two shapes stay distinguishable.
#[derive(Debug)]
pub enum ExtractedAnalysis {
    /// A `{...}` span was found and parsed as JSON.
    Parsed(Value),
    /// A `{...}` span was found but is not valid JSON.
    MalformedJson(String),
    /// The response contains no `{...}` span at all.
    NoJsonFound(String),
}

/// Structured result of interpreting an analysis object.
///
/// This is exactly what gets written back to the lead on success.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub pain_points: Vec<PainPoint>,
    pub coldness_score: i32,
    pub total_lead_score: f64,
    pub best_outreach_angle: String,
    pub recent_activity_summary: String,
}

/// Searches raw model output for the analysis JSON object.
///
/// The span is the greedy match from the first `{` to the last `}`, which
/// tolerates prose or code fences around the object but not interleaved
/// text inside it.
pub fn extract_json_object(raw: &str) -> ExtractedAnalysis {
    let brace_span = Regex::new(r"(?s)\{.*\}").unwrap();

    match brace_span.find(raw) {
        Some(m) => match serde_json::from_str::<Value>(m.as_str()) {
            Ok(value) => ExtractedAnalysis::Parsed(value),
            Err(_) => ExtractedAnalysis::MalformedJson(raw.to_string()),
        },
        None => ExtractedAnalysis::NoJsonFound(raw.to_string()),
    }
}

/// Fallback analysis for a response whose JSON span failed to parse.
///
/// The outreach angle carries a truncated echo of the raw response so a
/// human reviewing the lead can still see what came back.
fn fallback_for_malformed(raw: &str) -> Value {
    let preview: String = raw.chars().take(200).collect();
    json!({
        "pain_points": [{
            "description": "Analysis completed but formatting issue occurred",
            "urgency": 3,
            "category": "general"
        }],
        "coldness_factors": { "recent_activity": "Unable to parse activity data" },
        "coldness_score": 5,
        "best_outreach_angle": format!("{}...", preview),
        "lead_quality_assessment": "Analysis completed with formatting issues",
        "recommended_action": "nurture_campaign"
    })
}

/// Fallback analysis for a response with no JSON object at all.
fn fallback_for_missing(_raw: &str) -> Value {
    json!({
        "pain_points": [{
            "description": "Business challenges identified in content analysis",
            "urgency": 3,
            "category": "general"
        }],
        "coldness_factors": { "recent_activity": "Content analysis completed" },
        "coldness_score": 5,
        "best_outreach_angle": "Follow up based on content analysis",
        "lead_quality_assessment": "Moderate lead potential",
        "recommended_action": "nurture_campaign"
    })
}

/// Maps the `pain_points` array into owned values.
///
/// A missing key yields an empty list; a present-but-wrong shape (not an
/// array, malformed entry, urgency outside 1-5) is an error that fails
/// the whole analysis.
fn collect_pain_points(analysis: &Value) -> Result<Vec<PainPoint>, AppError> {
    let entries = match analysis.get("pain_points") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(AppError::ExternalApiError(format!(
                "pain_points is not an array: {}",
                other
            )))
        }
    };

    let mut pain_points = Vec::with_capacity(entries.len());
    for entry in entries {
        let point: PainPoint = serde_json::from_value(entry.clone()).map_err(|e| {
            AppError::ExternalApiError(format!("Malformed pain point entry: {}", e))
        })?;
        if !(1..=5).contains(&point.urgency) {
            return Err(AppError::ExternalApiError(format!(
                "Pain point urgency {} outside the 1-5 scale",
                point.urgency
            )));
        }
        pain_points.push(point);
    }

    Ok(pain_points)
}

/// Interprets a parsed (or fallback) analysis object into write-ready form.
///
/// Average urgency defaults to 3 for an empty pain-point list, coldness
/// defaults to 5 when absent, and the score uses the fixed company-fit
/// and contact-quality baselines.
pub fn interpret_analysis(analysis: &Value) -> Result<AnalysisOutcome, AppError> {
    let pain_points = collect_pain_points(analysis)?;

    let avg_urgency = if pain_points.is_empty() {
        3.0
    } else {
        pain_points.iter().map(|p| f64::from(p.urgency)).sum::<f64>() / pain_points.len() as f64
    };

    let coldness_score = match analysis.get("coldness_score") {
        None | Some(Value::Null) => 5,
        Some(value) => value
            .as_i64()
            .map(|n| n as i32)
            .ok_or_else(|| {
                AppError::ExternalApiError(format!(
                    "coldness_score is not an integer: {}",
                    value
                ))
            })?,
    };

    let total_lead_score = calculate_lead_score(
        avg_urgency,
        coldness_score,
        COMPANY_FIT_BASELINE,
        CONTACT_QUALITY_BASELINE,
    );

    let best_outreach_angle = analysis
        .get("best_outreach_angle")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let recent_activity_summary = analysis
        .get("coldness_factors")
        .and_then(|factors| factors.get("recent_activity"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Ok(AnalysisOutcome {
        pain_points,
        coldness_score,
        total_lead_score,
        best_outreach_angle,
        recent_activity_summary,
    })
}

/// Spawns the analysis pipeline as a background task (non-blocking).
///
/// HTTP callers drop the returned handle and observe progress by polling
/// the lead's status; tests can await it to synchronize.
pub fn spawn_analysis(
    store: Arc<dyn LeadStore>,
    chat_model: Option<Arc<dyn ChatModel>>,
    lead: Lead,
    content: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let lead_id = lead.id;
        tracing::info!("Starting background analysis for lead {}", lead_id);

        match run_analysis(store.as_ref(), chat_model.as_deref(), &lead, &content).await {
            Ok(()) => {
                tracing::info!("Analysis completed for lead {}", lead_id);
            }
            Err(e) => {
                tracing::error!("Analysis failed for lead {}: {}", lead_id, e);
                if let Err(e) = store.set_status(lead_id, AnalysisStatus::Failed).await {
                    tracing::error!("Failed to mark lead {} as failed: {}", lead_id, e);
                }
            }
        }
    })
}

/// Runs one analysis pass for a lead.
///
/// The `analyzing` status write happens before the model call so pollers
/// can see the lead is in flight. Errors propagate to the caller, which
/// records the `failed` status; staged results are simply dropped.
async fn run_analysis(
    store: &dyn LeadStore,
    chat_model: Option<&dyn ChatModel>,
    lead: &Lead,
    content: &str,
) -> Result<(), AppError> {
    store.set_status(lead.id, AnalysisStatus::Analyzing).await?;

    let model = chat_model.ok_or_else(|| {
        AppError::ExternalApiError("OpenAI API key not configured".to_string())
    })?;

    let prompt = build_analysis_prompt(lead, content);
    let raw = model.complete(LEAD_ANALYST_SYSTEM, &prompt).await?;

    let analysis = match extract_json_object(&raw) {
        ExtractedAnalysis::Parsed(value) => value,
        ExtractedAnalysis::MalformedJson(raw) => {
            tracing::warn!(
                "Lead {}: response contained malformed JSON, using fallback analysis",
                lead.id
            );
            fallback_for_malformed(&raw)
        }
        ExtractedAnalysis::NoJsonFound(raw) => {
            tracing::warn!(
                "Lead {}: response contained no JSON object, using fallback analysis",
                lead.id
            );
            fallback_for_missing(&raw)
        }
    };

    let outcome = interpret_analysis(&analysis)?;

    tracing::info!(
        "Lead {}: {} pain point(s), coldness {}, total score {}",
        lead.id,
        outcome.pain_points.len(),
        outcome.coldness_score,
        outcome.total_lead_score
    );

    store.apply_analysis(lead.id, &outcome).await?;

    Ok(())
}
