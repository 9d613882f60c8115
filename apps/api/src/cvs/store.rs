//! Storage queries for CV rows and the analysis history.

use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::analysis::AnalysisHistoryRow;
use crate::models::cv::{
    CvRow, EducationEntry, ExperienceEntry, LanguageEntry, PersonalInfo, SkillEntry,
};

#[derive(Debug)]
pub struct CvContent {
    pub title: String,
    pub summary: Option<String>,
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillEntry>,
    pub languages: Vec<LanguageEntry>,
    pub template_id: String,
}

pub async fn list_cvs(db: &PgPool, user_id: Uuid) -> Result<Vec<CvRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cvs WHERE user_id = $1 ORDER BY updated_at DESC")
        .bind(user_id)
        .fetch_all(db)
        .await
}

/// Ownership is folded into the predicate on purpose: a row that exists but
/// belongs to someone else behaves exactly like a row that does not exist.
pub async fn fetch_cv(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<CvRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM cvs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
}

pub async fn create_cv(
    db: &PgPool,
    user_id: Uuid,
    content: &CvContent,
) -> Result<CvRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO cvs
            (user_id, title, summary, personal_info, experience, education,
             skills, languages, template_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&content.title)
    .bind(&content.summary)
    .bind(Json(&content.personal_info))
    .bind(Json(&content.experience))
    .bind(Json(&content.education))
    .bind(Json(&content.skills))
    .bind(Json(&content.languages))
    .bind(&content.template_id)
    .fetch_one(db)
    .await
}

/// Full replace of the editable fields. Last write wins — the editor saves
/// incrementally with no partial-save transaction semantics.
pub async fn update_cv(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    content: &CvContent,
) -> Result<Option<CvRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE cvs
        SET title = $3, summary = $4, personal_info = $5, experience = $6,
            education = $7, skills = $8, languages = $9, template_id = $10,
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&content.title)
    .bind(&content.summary)
    .bind(Json(&content.personal_info))
    .bind(Json(&content.experience))
    .bind(Json(&content.education))
    .bind(Json(&content.skills))
    .bind(Json(&content.languages))
    .bind(&content.template_id)
    .fetch_optional(db)
    .await
}

pub async fn delete_cv(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cvs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn increment_downloads(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<i32>, sqlx::Error> {
    let count: Option<(i32,)> = sqlx::query_as(
        r#"
        UPDATE cvs
        SET downloads_count = downloads_count + 1
        WHERE id = $1 AND user_id = $2
        RETURNING downloads_count
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(count.map(|c| c.0))
}

/// Overwrites the row's latest analysis (score + full payload).
pub async fn store_analysis(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    score: i32,
    payload: &Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE cvs
        SET last_score = $3, last_analysis = $4, updated_at = now()
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(score)
    .bind(payload)
    .execute(db)
    .await?;
    Ok(())
}

/// Append-only: earlier rows are never mutated or deleted by a new run.
pub async fn append_history(
    db: &PgPool,
    cv_id: Uuid,
    user_id: Uuid,
    score: i32,
    payload: &Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO analysis_history (cv_id, user_id, score, payload) VALUES ($1, $2, $3, $4)",
    )
    .bind(cv_id)
    .bind(user_id)
    .bind(score)
    .bind(payload)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn list_history(
    db: &PgPool,
    cv_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<AnalysisHistoryRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM analysis_history
        WHERE cv_id = $1 AND user_id = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(cv_id)
    .bind(user_id)
    .fetch_all(db)
    .await
}
