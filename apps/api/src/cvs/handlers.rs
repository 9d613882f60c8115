use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::cvs::store::{self, CvContent};
use crate::errors::AppError;
use crate::models::analysis::AnalysisHistoryRow;
use crate::models::cv::{
    CvRow, EducationEntry, ExperienceEntry, LanguageEntry, PersonalInfo, SkillEntry,
};
use crate::state::AppState;

/// Editable fields of a CV. Sections default to empty so a freshly created
/// document needs nothing but a title.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvPayload {
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
    #[serde(default = "default_template")]
    pub template_id: String,
}

fn default_template() -> String {
    "modern".to_string()
}

impl CvPayload {
    fn validate(self) -> Result<CvContent, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".into()));
        }
        Ok(CvContent {
            title: self.title,
            summary: self.summary,
            personal_info: self.personal_info,
            experience: self.experience,
            education: self.education,
            skills: self.skills,
            languages: self.languages,
            template_id: self.template_id,
        })
    }
}

/// GET /api/v1/cvs
pub async fn handle_list_cvs(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CvRow>>, AppError> {
    let cvs = store::list_cvs(&state.db, user.id).await?;
    Ok(Json(cvs))
}

/// POST /api/v1/cvs
pub async fn handle_create_cv(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CvPayload>,
) -> Result<(StatusCode, Json<CvRow>), AppError> {
    let content = payload.validate()?;
    let cv = store::create_cv(&state.db, user.id, &content).await?;
    Ok((StatusCode::CREATED, Json(cv)))
}

/// GET /api/v1/cvs/:id
pub async fn handle_get_cv(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CvRow>, AppError> {
    let cv = store::fetch_cv(&state.db, id, user.id)
        .await?
        .ok_or(AppError::AccessDenied)?;
    Ok(Json(cv))
}

/// PUT /api/v1/cvs/:id
pub async fn handle_update_cv(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CvPayload>,
) -> Result<Json<CvRow>, AppError> {
    let content = payload.validate()?;
    let cv = store::update_cv(&state.db, id, user.id, &content)
        .await?
        .ok_or(AppError::AccessDenied)?;
    Ok(Json(cv))
}

/// DELETE /api/v1/cvs/:id
pub async fn handle_delete_cv(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if store::delete_cv(&state.db, id, user.id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::AccessDenied)
    }
}

#[derive(Debug, Serialize)]
pub struct DownloadsResponse {
    pub downloads_count: i32,
}

/// POST /api/v1/cvs/:id/downloads
/// The dashboard bumps this counter each time the client exports a PDF.
pub async fn handle_increment_downloads(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DownloadsResponse>, AppError> {
    let downloads_count = store::increment_downloads(&state.db, id, user.id)
        .await?
        .ok_or(AppError::AccessDenied)?;
    Ok(Json(DownloadsResponse { downloads_count }))
}

/// GET /api/v1/cvs/:id/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AnalysisHistoryRow>>, AppError> {
    // Scoped fetch first so history for foreign CVs reads as not-found.
    store::fetch_cv(&state.db, id, user.id)
        .await?
        .ok_or(AppError::AccessDenied)?;
    let history = store::list_history(&state.db, id, user.id).await?;
    Ok(Json(history))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_with_blank_title_is_rejected() {
        let payload: CvPayload = serde_json::from_str(r#"{"title": "  "}"#).unwrap();
        assert!(matches!(
            payload.validate().unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_minimal_payload_fills_defaults() {
        let payload: CvPayload = serde_json::from_str(r#"{"title": "My CV"}"#).unwrap();
        let content = payload.validate().unwrap();
        assert_eq!(content.template_id, "modern");
        assert!(content.experience.is_empty());
        assert!(content.summary.is_none());
    }

    #[test]
    fn test_payload_sections_deserialize_camel_case() {
        let payload: CvPayload = serde_json::from_str(
            r#"{
                "title": "My CV",
                "templateId": "classic",
                "skills": [{"name": "Rust", "level": 120}],
                "experience": [{"title": "Dev", "company": "Acme", "startDate": "2020", "current": true}]
            }"#,
        )
        .unwrap();
        let content = payload.validate().unwrap();
        assert_eq!(content.template_id, "classic");
        // Clamping applies on the way in, not at analysis time.
        assert_eq!(content.skills[0].level, 100);
        assert!(content.experience[0].current);
    }
}
