//! Prompt Builder — renders a CV row into the flat text block the model sees.
//!
//! Total function: it never fails, whatever the row contains. Blank fields
//! and empty sections render the `N/A` placeholder instead of being dropped,
//! so the model always sees the same shape.

use crate::analysis::prompts::{ANALYZE_PROMPT_TEMPLATE, ANALYZE_SYSTEM};
use crate::models::cv::CvRow;

const PLACEHOLDER: &str = "N/A";

/// Builds the (system, user) message pair for one analysis request.
pub fn build_messages(cv: &CvRow, job_description: &str) -> (String, String) {
    let user = ANALYZE_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{cv_text}", &build_cv_text(cv));
    (ANALYZE_SYSTEM.to_string(), user)
}

/// Serializes every CV section into labeled plain-text lines.
pub fn build_cv_text(cv: &CvRow) -> String {
    let info = &cv.personal_info.0;

    let experience = section(cv.experience.0.iter().map(|exp| {
        let end = if exp.current { "Present" } else { na(&exp.end_date) };
        format!(
            "- {} at {} ({} - {}): {}",
            na(&exp.title),
            na(&exp.company),
            na(&exp.start_date),
            end,
            na(&exp.description),
        )
    }));

    let education = section(cv.education.0.iter().map(|edu| {
        format!(
            "- {} at {} ({} - {})",
            na(&edu.degree),
            na(&edu.school),
            na(&edu.start_date),
            na(&edu.end_date),
        )
    }));

    let skills = section(
        cv.skills
            .0
            .iter()
            .map(|skill| format!("- {} ({})", na(&skill.name), skill.level)),
    );

    let languages = section(
        cv.languages
            .0
            .iter()
            .map(|lang| format!("- {} ({})", na(&lang.name), na(&lang.level))),
    );

    format!(
        "CV Title: {}\n\
         Summary: {}\n\
         \n\
         Personal Information:\n\
         - Name: {}\n\
         - Email: {}\n\
         - Phone: {}\n\
         - Location: {}\n\
         \n\
         Experience:\n{}\n\
         \n\
         Education:\n{}\n\
         \n\
         Skills:\n{}\n\
         \n\
         Languages:\n{}",
        na(&cv.title),
        na(cv.summary.as_deref().unwrap_or("")),
        opt(&info.full_name),
        opt(&info.email),
        opt(&info.phone),
        opt(&info.location),
        experience,
        education,
        skills,
        languages,
    )
}

fn na(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        PLACEHOLDER
    } else {
        trimmed
    }
}

fn opt(value: &Option<String>) -> &str {
    na(value.as_deref().unwrap_or(""))
}

fn section(lines: impl Iterator<Item = String>) -> String {
    let joined = lines.collect::<Vec<_>>().join("\n");
    if joined.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::{ExperienceEntry, PersonalInfo, SkillEntry};
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn empty_cv() -> CvRow {
        CvRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: String::new(),
            summary: None,
            personal_info: Json(PersonalInfo::default()),
            experience: Json(vec![]),
            education: Json(vec![]),
            skills: Json(vec![]),
            languages: Json(vec![]),
            template_id: "modern".to_string(),
            last_score: None,
            last_analysis: None,
            downloads_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_cv_renders_placeholder_for_every_field() {
        let text = build_cv_text(&empty_cv());
        // No section is silently dropped.
        for label in [
            "CV Title:",
            "Summary:",
            "Personal Information:",
            "- Name:",
            "- Email:",
            "- Phone:",
            "- Location:",
            "Experience:",
            "Education:",
            "Skills:",
            "Languages:",
        ] {
            assert!(text.contains(label), "missing label {label}");
        }
        // 6 scalar fields plus 4 empty sections.
        assert_eq!(text.matches(PLACEHOLDER).count(), 10);
    }

    #[test]
    fn test_build_messages_is_total_and_nonempty() {
        let (system, user) = build_messages(&empty_cv(), "");
        assert!(!system.is_empty());
        assert!(!user.is_empty());
        assert!(user.contains("=== JOB OFFER ==="));
        assert!(user.contains("=== CV ==="));
    }

    #[test]
    fn test_job_description_is_embedded_verbatim() {
        let jd = "Seeking backend engineer with Go experience";
        let (_, user) = build_messages(&empty_cv(), jd);
        assert!(user.contains(jd));
    }

    #[test]
    fn test_current_experience_renders_present() {
        let mut cv = empty_cv();
        cv.experience = Json(vec![ExperienceEntry {
            title: "Backend Engineer".into(),
            company: "Acme".into(),
            location: "Paris".into(),
            start_date: "2021-01".into(),
            end_date: "2023-05".into(),
            current: true,
            description: "Built APIs".into(),
        }]);
        let text = build_cv_text(&cv);
        assert!(text.contains("- Backend Engineer at Acme (2021-01 - Present): Built APIs"));
        // The stale end date is ignored once `current` is set.
        assert!(!text.contains("2023-05"));
    }

    #[test]
    fn test_populated_sections_render_one_line_per_entry() {
        let mut cv = empty_cv();
        cv.title = "My CV".into();
        cv.summary = Some("Backend engineer".into());
        cv.skills = Json(vec![
            SkillEntry {
                name: "Rust".into(),
                level: 90,
            },
            SkillEntry {
                name: "SQL".into(),
                level: 70,
            },
        ]);
        let text = build_cv_text(&cv);
        assert!(text.contains("CV Title: My CV"));
        assert!(text.contains("Summary: Backend engineer"));
        assert!(text.contains("- Rust (90)"));
        assert!(text.contains("- SQL (70)"));
    }
}
