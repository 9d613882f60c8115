//! Response Extractor — locates and validates the JSON payload inside a model reply.
//!
//! Models frequently wrap JSON in markdown code fences despite instructions
//! not to. Candidate selection precedence: first ```json-tagged fence, then
//! first plain fence, then the whole reply. Only the first matching fence is
//! considered when several are present.

use thiserror::Error;

use crate::models::analysis::AnalysisResult;

/// Raised when the model reply cannot be turned into a valid `AnalysisResult`.
/// Carries the original reply text for diagnostics; defaults are never
/// substituted on failure.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("reply is not valid JSON: {source}")]
    Json {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("reply does not match the analysis schema: {reason}")]
    Schema { raw: String, reason: String },
}

impl ExtractError {
    /// The original model reply, kept for diagnostics.
    pub fn raw(&self) -> &str {
        match self {
            ExtractError::Json { raw, .. } | ExtractError::Schema { raw, .. } => raw,
        }
    }
}

/// Parses and validates a model reply into a typed `AnalysisResult`.
/// Field presence and array element types are enforced by deserialization;
/// the score range is checked explicitly before the value is trusted.
pub fn parse_analysis(reply: &str) -> Result<AnalysisResult, ExtractError> {
    let candidate = select_json_candidate(reply);

    let result: AnalysisResult =
        serde_json::from_str(candidate).map_err(|source| ExtractError::Json {
            raw: reply.to_string(),
            source,
        })?;

    result.validate().map_err(|reason| ExtractError::Schema {
        raw: reply.to_string(),
        reason,
    })?;

    Ok(result)
}

/// Selects the substring most likely to hold the JSON payload.
pub fn select_json_candidate(reply: &str) -> &str {
    fenced(reply, "```json")
        .or_else(|| fenced(reply, "```"))
        .unwrap_or_else(|| reply.trim())
}

/// Returns the content of the first complete fence opened by `opener`.
/// An unclosed fence yields `None` so the caller falls through to raw text.
fn fenced<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_PAYLOAD: &str = r#"{
        "compatibility_score": 72,
        "keywords": {"matched": ["backend"], "missing": ["Go"]},
        "strengths": ["Relevant summary"],
        "improvements": ["Add Go"],
        "recommendations": ["Mention Go projects"]
    }"#;

    #[test]
    fn test_select_json_tagged_fence() {
        let reply = format!("Here is the analysis:\n```json\n{VALID_PAYLOAD}\n```\nDone.");
        assert_eq!(select_json_candidate(&reply), VALID_PAYLOAD.trim());
    }

    #[test]
    fn test_select_plain_fence() {
        let reply = format!("```\n{VALID_PAYLOAD}\n```");
        assert_eq!(select_json_candidate(&reply), VALID_PAYLOAD.trim());
    }

    #[test]
    fn test_select_whole_text_without_fences() {
        assert_eq!(select_json_candidate(VALID_PAYLOAD), VALID_PAYLOAD.trim());
    }

    #[test]
    fn test_first_fence_wins_when_multiple_present() {
        let reply = "```json\n{\"a\": 1}\n```\nand also\n```json\n{\"b\": 2}\n```";
        assert_eq!(select_json_candidate(reply), "{\"a\": 1}");
    }

    #[test]
    fn test_unclosed_fence_falls_back_to_whole_text() {
        let reply = "```json\n{\"a\": 1}";
        assert_eq!(select_json_candidate(reply), reply.trim());
    }

    #[test]
    fn test_parse_analysis_from_fenced_reply() {
        let reply = format!("```json\n{VALID_PAYLOAD}\n```");
        let result = parse_analysis(&reply).unwrap();
        assert_eq!(result.compatibility_score, 72);
        assert_eq!(result.keywords.matched, vec!["backend"]);
        assert_eq!(result.keywords.missing, vec!["Go"]);
        assert_eq!(result.recommendations, vec!["Mention Go projects"]);
    }

    #[test]
    fn test_parse_analysis_from_bare_reply() {
        let result = parse_analysis(VALID_PAYLOAD).unwrap();
        assert_eq!(result.compatibility_score, 72);
    }

    #[test]
    fn test_malformed_json_raises_parse_error_with_raw_text() {
        let reply = "Sorry, I cannot help with that.";
        let err = parse_analysis(reply).unwrap_err();
        assert!(matches!(err, ExtractError::Json { .. }));
        assert_eq!(err.raw(), reply);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        // No "recommendations" key.
        let reply = r#"{
            "compatibility_score": 50,
            "keywords": {"matched": [], "missing": []},
            "strengths": [],
            "improvements": []
        }"#;
        let err = parse_analysis(reply).unwrap_err();
        assert!(matches!(err, ExtractError::Json { .. }));
    }

    #[test]
    fn test_out_of_range_score_is_rejected() {
        let reply = r#"{
            "compatibility_score": 130,
            "keywords": {"matched": [], "missing": []},
            "strengths": [],
            "improvements": [],
            "recommendations": []
        }"#;
        let err = parse_analysis(reply).unwrap_err();
        assert!(matches!(err, ExtractError::Schema { .. }));
        assert_eq!(err.raw(), reply);
    }

    #[test]
    fn test_wrong_array_element_type_is_rejected() {
        let reply = r#"{
            "compatibility_score": 50,
            "keywords": {"matched": [1, 2], "missing": []},
            "strengths": [],
            "improvements": [],
            "recommendations": []
        }"#;
        assert!(matches!(
            parse_analysis(reply).unwrap_err(),
            ExtractError::Json { .. }
        ));
    }
}
