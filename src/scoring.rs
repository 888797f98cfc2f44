/// Lead scoring.
///
/// Combines pain-point severity, recent-activity signal, and two static
/// placeholders into a single composite used to rank leads. Weights are
/// fixed: 40% pain, 30% activity, 20% company fit, 10% contact quality.

/// Company-fit placeholder; not derived from real data in this version.
pub const COMPANY_FIT_BASELINE: f64 = 7.0;

/// Contact-quality placeholder. `contact_info_quality` exists on the lead
/// but is never populated, so this constant is always substituted.
pub const CONTACT_QUALITY_BASELINE: f64 = 5.0;

/// Computes the total lead score, rounded to two decimal places.
///
/// `avg_urgency` is on the 1-5 pain-point scale; `coldness_score` on the
/// 1-10 coldness scale (1 = very active). The coldness rating is inverted
/// so that recent activity raises the score.
pub fn calculate_lead_score(
    avg_urgency: f64,
    coldness_score: i32,
    company_fit: f64,
    contact_quality: f64,
) -> f64 {
    // Rescale 1-5 urgency to a 0-10 scale
    let pain_point_score = (avg_urgency / 5.0) * 10.0;

    // Invert coldness (lower coldness = more recent activity = better)
    let activity_score = f64::from(11 - coldness_score);

    let total = pain_point_score * 0.4
        + activity_score * 0.3
        + company_fit * 0.2
        + contact_quality * 0.1;

    (total * 100.0).round() / 100.0
}
