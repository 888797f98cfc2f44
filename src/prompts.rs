//! LLM prompt constants and builders for lead analysis.

use crate::models::Lead;

/// System instruction framing the model as a lead-qualification expert.
pub const LEAD_ANALYST_SYSTEM: &str = "You are a B2B lead qualification expert. Your job is to analyze company information and identify business pain points, then provide actionable insights for sales outreach.

Your analysis should focus on:
1. Identifying specific business challenges and pain points
2. Ranking pain points by urgency (1-5 scale)
3. Categorizing pain points (operational, financial, technological, strategic, compliance)
4. Determining outreach strategies
5. Assessing lead quality

Be specific and actionable in your analysis.";

/// Builds the per-lead analysis prompt.
///
/// Absent descriptive fields are substituted with the literal `Unknown`,
/// and the free-text content block is embedded verbatim. The response
/// contract is an exact JSON object; parsing still tolerates deviation
/// (see `analysis::extract_json_object`).
pub fn build_analysis_prompt(lead: &Lead, content: &str) -> String {
    format!(
        r#"
Analyze the following lead information and provide a comprehensive assessment:

COMPANY: {company}
INDUSTRY: {industry}
COMPANY SIZE: {size}
DECISION MAKER: {dm_name} - {dm_title}

CONTENT TO ANALYZE:
{content}

Please provide your analysis in this exact JSON format:
{{
    "pain_points": [
        {{
            "description": "Specific pain point description",
            "urgency": 4,
            "category": "operational"
        }}
    ],
    "coldness_factors": {{
        "recent_activity": "Description of recent activity indicating engagement level",
        "business_challenges": "Current challenges mentioned",
        "growth_indicators": "Signs of growth or change"
    }},
    "coldness_score": 6,
    "best_outreach_angle": "Specific recommendation for initial outreach",
    "lead_quality_assessment": "Overall assessment of lead potential",
    "recommended_action": "immediate_outreach | nurture_campaign | long_term_nurture | skip"
}}

Focus on finding specific, actionable pain points that a B2B solution could address.
"#,
        company = lead.company_name,
        industry = lead.industry.as_deref().unwrap_or("Unknown"),
        size = lead.company_size.as_deref().unwrap_or("Unknown"),
        dm_name = lead.decision_maker_name.as_deref().unwrap_or("Unknown"),
        dm_title = lead.decision_maker_title.as_deref().unwrap_or("Unknown"),
        content = content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lead, LeadCreate};

    fn lead_with(industry: Option<&str>) -> Lead {
        Lead::new(&LeadCreate {
            company_name: "Acme Corp".to_string(),
            industry: industry.map(str::to_string),
            company_size: None,
            decision_maker_name: Some("Jane Doe".to_string()),
            decision_maker_title: None,
            linkedin_url: None,
            manual_content: None,
        })
    }

    #[test]
    fn embeds_known_fields_and_content() {
        let lead = lead_with(Some("Logistics"));
        let prompt = build_analysis_prompt(&lead, "Hiring spree for ops managers");

        assert!(prompt.contains("COMPANY: Acme Corp"));
        assert!(prompt.contains("INDUSTRY: Logistics"));
        assert!(prompt.contains("DECISION MAKER: Jane Doe - Unknown"));
        assert!(prompt.contains("Hiring spree for ops managers"));
    }

    #[test]
    fn absent_fields_fall_back_to_unknown() {
        let lead = lead_with(None);
        let prompt = build_analysis_prompt(&lead, "content");

        assert!(prompt.contains("INDUSTRY: Unknown"));
        assert!(prompt.contains("COMPANY SIZE: Unknown"));
    }

    #[test]
    fn response_contract_lists_the_action_vocabulary() {
        let lead = lead_with(None);
        let prompt = build_analysis_prompt(&lead, "content");

        assert!(prompt
            .contains("immediate_outreach | nurture_campaign | long_term_nurture | skip"));
        assert!(prompt.contains("\"coldness_score\": 6"));
    }
}
