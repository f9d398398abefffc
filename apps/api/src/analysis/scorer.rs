//! Category scoring and recommendations, one model call each.
//!
//! Inputs are serialized to JSON before substitution so the model sees the same
//! structure it produced during extraction.

use serde::Serialize;

use crate::analysis::models::{
    Education, EducationScore, Experience, ExperienceScore, OtherScore, OtherSkills,
    Recommendations, SkillScore,
};
use crate::analysis::prompts::{
    EDUCATION_SCORE, EXPERIENCE_SCORE, OTHER_SCORE, RECOMMENDATIONS, SKILLS_SCORE,
};
use crate::errors::AppError;
use crate::llm_client::{invoke_structured, StructuredModel};

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {what}: {e}")))
}

/// Compares the raw skill lists (not sub-records) and reports matches and gaps.
pub async fn score_skills(
    resume_skills: &[String],
    required_skills: &[String],
    model: &dyn StructuredModel,
) -> Result<SkillScore, AppError> {
    let resume_skills = to_json(resume_skills, "resume skills")?;
    let required_skills = to_json(required_skills, "required skills")?;

    invoke_structured(
        model,
        &SKILLS_SCORE,
        &[
            ("resume_skills", resume_skills.as_str()),
            ("required_skills", required_skills.as_str()),
        ],
    )
    .await
    .map_err(|e| AppError::from_llm("Skills scoring", e))
}

pub async fn score_experience(
    resume_exp: &Experience,
    required_exp: &Experience,
    model: &dyn StructuredModel,
) -> Result<ExperienceScore, AppError> {
    let resume_exp = to_json(resume_exp, "candidate experience")?;
    let required_exp = to_json(required_exp, "required experience")?;

    invoke_structured(
        model,
        &EXPERIENCE_SCORE,
        &[
            ("resume_exp", resume_exp.as_str()),
            ("required_exp", required_exp.as_str()),
        ],
    )
    .await
    .map_err(|e| AppError::from_llm("Experience scoring", e))
}

pub async fn score_education(
    resume_edu: &Education,
    required_edu: &Education,
    model: &dyn StructuredModel,
) -> Result<EducationScore, AppError> {
    let resume_edu = to_json(resume_edu, "candidate education")?;
    let required_edu = to_json(required_edu, "required education")?;

    invoke_structured(
        model,
        &EDUCATION_SCORE,
        &[
            ("resume_edu", resume_edu.as_str()),
            ("required_edu", required_edu.as_str()),
        ],
    )
    .await
    .map_err(|e| AppError::from_llm("Education scoring", e))
}

pub async fn score_other(
    resume_other: &OtherSkills,
    required_other: &OtherSkills,
    model: &dyn StructuredModel,
) -> Result<OtherScore, AppError> {
    let resume_other = to_json(resume_other, "candidate other factors")?;
    let required_other = to_json(required_other, "required other factors")?;

    invoke_structured(
        model,
        &OTHER_SCORE,
        &[
            ("resume_other", resume_other.as_str()),
            ("required_other", required_other.as_str()),
        ],
    )
    .await
    .map_err(|e| AppError::from_llm("Other factors scoring", e))
}

/// Generates markdown advice. Consumes the skills score, so it must run after it.
pub async fn generate_recommendations(
    skills: &SkillScore,
    candidate_experience: &Experience,
    required_experience: &Experience,
    jd_text: &str,
    model: &dyn StructuredModel,
) -> Result<Recommendations, AppError> {
    let matching_skills = to_json(&skills.matching_skills, "matching skills")?;
    let missing_skills = to_json(&skills.missing_skills, "missing skills")?;
    let candidate_experience = to_json(candidate_experience, "candidate experience")?;
    let required_experience = to_json(required_experience, "required experience")?;

    invoke_structured(
        model,
        &RECOMMENDATIONS,
        &[
            ("jd_text", jd_text),
            ("matching_skills", matching_skills.as_str()),
            ("missing_skills", missing_skills.as_str()),
            ("candidate_experience", candidate_experience.as_str()),
            ("required_experience", required_experience.as_str()),
        ],
    )
    .await
    .map_err(|e| AppError::from_llm("Recommendation generation", e))
}
