use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One CV document. Owned by its creating user; every query that touches a
/// row is scoped by `user_id` as well as `id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub personal_info: Json<PersonalInfo>,
    pub experience: Json<Vec<ExperienceEntry>>,
    pub education: Json<Vec<EducationEntry>>,
    pub skills: Json<Vec<SkillEntry>>,
    pub languages: Json<Vec<LanguageEntry>>,
    pub template_id: String,
    pub last_score: Option<i32>,
    pub last_analysis: Option<Value>,
    pub downloads_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact block. All fields optional — the editor saves incrementally as
/// the user types, so any subset may be populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    /// Ignored when `current` is set.
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub degree: String,
    pub school: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillEntry {
    pub name: String,
    /// 0–100. Out-of-range input clamps rather than failing the request.
    #[serde(deserialize_with = "clamp_level")]
    pub level: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageEntry {
    pub name: String,
    /// Free-text proficiency label, e.g. "native", "fluent".
    pub level: String,
}

fn clamp_level<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, 100) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_level_in_range_is_kept() {
        let skill: SkillEntry = serde_json::from_str(r#"{"name": "Rust", "level": 85}"#).unwrap();
        assert_eq!(skill.level, 85);
    }

    #[test]
    fn test_skill_level_clamps_above_100() {
        let skill: SkillEntry = serde_json::from_str(r#"{"name": "Rust", "level": 250}"#).unwrap();
        assert_eq!(skill.level, 100);
    }

    #[test]
    fn test_skill_level_clamps_below_zero() {
        let skill: SkillEntry = serde_json::from_str(r#"{"name": "Rust", "level": -5}"#).unwrap();
        assert_eq!(skill.level, 0);
    }

    #[test]
    fn test_experience_entry_uses_camel_case_keys() {
        let entry: ExperienceEntry = serde_json::from_str(
            r#"{
                "title": "Backend Engineer",
                "company": "Acme",
                "startDate": "2021-01",
                "endDate": "",
                "current": true,
                "description": "APIs"
            }"#,
        )
        .unwrap();
        assert_eq!(entry.start_date, "2021-01");
        assert!(entry.current);
        // Missing "location" falls back to the default empty string.
        assert!(entry.location.is_empty());
    }
}
