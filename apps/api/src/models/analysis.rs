use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Typed result of one compatibility analysis, as required from the model.
/// Deserialization enforces field presence and array element types; the
/// score range is checked separately by `validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub compatibility_score: i32,
    pub keywords: AnalysisKeywords,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisKeywords {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl AnalysisResult {
    /// Rejects shapes that deserialize but violate the contract.
    pub fn validate(&self) -> Result<(), String> {
        if !(0..=100).contains(&self.compatibility_score) {
            return Err(format!(
                "compatibility_score {} is outside 0-100",
                self.compatibility_score
            ));
        }
        Ok(())
    }
}

/// One append-only row of the analysis history. A new analysis run never
/// mutates or deletes earlier rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisHistoryRow {
    pub id: Uuid,
    pub cv_id: Uuid,
    pub user_id: Uuid,
    pub score: i32,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}
