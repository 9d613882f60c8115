// All prompt constants for the analysis pipeline.

/// System prompt — fixes the output schema the extractor expects.
pub const ANALYZE_SYSTEM: &str = r#"You are an expert recruiter and CV analyst. You analyse a CV against a job offer and provide a detailed evaluation.

You must return your answer as JSON with the following structure:
{
  "compatibility_score": <number between 0 and 100>,
  "keywords": {
    "matched": [<CV keywords matching the offer>],
    "missing": [<keywords missing from the CV>]
  },
  "strengths": [<the candidate's strong points>],
  "improvements": [<suggested improvements>],
  "recommendations": [<personalised recommendations>]
}

Be precise, constructive and considerate in your analysis."#;

/// User prompt template. Replace `{job_description}` and `{cv_text}` before sending.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Analyse this CV against the following job offer:

=== JOB OFFER ===
{job_description}

=== CV ===
{cv_text}

Provide your analysis as JSON."#;
