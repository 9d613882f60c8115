use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::ai_gateway::extract::parse_analysis;
use crate::analysis::prompt_builder::build_messages;
use crate::auth::AuthUser;
use crate::cvs::store;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::state::AppState;

/// `cvId` stays a string here so a malformed id reaches `validate` and gets
/// the uniform error envelope instead of the extractor's rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub cv_id: Option<String>,
    pub job_description: Option<String>,
}

impl AnalyzeRequest {
    /// Both fields are required; this runs before any outbound call.
    pub fn validate(&self) -> Result<(Uuid, &str), AppError> {
        let cv_id = self
            .cv_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());
        let jd = self
            .job_description
            .as_deref()
            .map(str::trim)
            .filter(|jd| !jd.is_empty());
        let (cv_id, jd) = match (cv_id, jd) {
            (Some(cv_id), Some(jd)) => (cv_id, jd),
            _ => {
                return Err(AppError::Validation(
                    "CV ID and job description are required".into(),
                ))
            }
        };
        // A malformed id cannot match any row; report it exactly like one.
        let cv_id = Uuid::parse_str(cv_id).map_err(|_| AppError::AccessDenied)?;
        Ok((cv_id, jd))
    }
}

/// POST /api/v1/analyze
///
/// Linear, single-shot pipeline, terminal on first error:
/// authenticate → validate → load → prompt → call → extract → persist → respond.
/// The history append is the single best-effort step; everything else fails loudly.
pub async fn handle_analyze(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let (cv_id, job_description) = req.validate()?;
    info!(
        user_id = %user.id,
        %cv_id,
        jd_len = job_description.len(),
        "Analysis requested"
    );

    // Single predicate on (id, user_id): a missing row and a foreign row are
    // indistinguishable, so existence cannot be probed by status code.
    let cv = store::fetch_cv(&state.db, cv_id, user.id)
        .await?
        .ok_or(AppError::AccessDenied)?;
    info!(cv_title = %cv.title, "CV loaded");

    let (system, prompt) = build_messages(&cv, job_description);
    info!(prompt_len = prompt.len(), "Prompt prepared, calling AI gateway");

    let reply = state.ai.complete(&system, &prompt).await?;
    info!(reply_len = reply.len(), "AI response received");

    let result = parse_analysis(&reply)?;
    info!(score = result.compatibility_score, "Analysis complete");

    let payload = serde_json::to_value(&result)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing analysis: {e}")))?;

    // A new run overwrites the previous result on the row (last write wins).
    store::store_analysis(&state.db, cv_id, user.id, result.compatibility_score, &payload).await?;

    // Fire-and-forget audit trail: a failing history write must not withhold
    // the analysis the caller already paid for.
    if let Err(e) =
        store::append_history(&state.db, cv_id, user.id, result.compatibility_score, &payload)
            .await
    {
        error!(%cv_id, "Analysis history append failed: {e}");
    }

    Ok(Json(result))
}
