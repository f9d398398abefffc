//! Turns raw resume and job description text into structured records.

use chrono::NaiveDate;

use crate::analysis::models::{CandidateProfile, JobRequirements};
use crate::analysis::prompts::{JD_EXTRACT, RESUME_EXTRACT};
use crate::errors::AppError;
use crate::llm_client::{invoke_structured, StructuredModel};

/// Date format handed to the model for computing role durations, e.g. `2024-Mar-05`.
pub fn format_current_date(date: NaiveDate) -> String {
    date.format("%Y-%b-%d").to_string()
}

/// Extracts a `CandidateProfile` from resume text. `today` lets the model turn
/// "2019 – present" into a year count.
pub async fn extract_candidate_profile(
    resume_text: &str,
    today: NaiveDate,
    model: &dyn StructuredModel,
) -> Result<CandidateProfile, AppError> {
    let current_date = format_current_date(today);
    invoke_structured(
        model,
        &RESUME_EXTRACT,
        &[
            ("current_date", current_date.as_str()),
            ("resume_text", resume_text),
        ],
    )
    .await
    .map_err(|e| AppError::from_llm("Resume extraction", e))
}

/// Extracts `JobRequirements` from a job description.
pub async fn extract_job_requirements(
    jd_text: &str,
    model: &dyn StructuredModel,
) -> Result<JobRequirements, AppError> {
    invoke_structured(model, &JD_EXTRACT, &[("jd_text", jd_text)])
        .await
        .map_err(|e| AppError::from_llm("Job description extraction", e))
}
