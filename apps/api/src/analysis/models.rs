//! Output schemas for every model call in the analysis pipeline.
//!
//! Doc comments on these types are not just documentation: `schemars` copies them into the
//! JSON Schema sent with each request, so they steer what the model extracts. Edit with care.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Shared sub-records (used by both resume and job extraction)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExperiencePerRole {
    /// Role
    pub role: String,
    /// Years of experience
    pub years: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Experience {
    /// Years of experience for each role
    pub years_per_role: Vec<ExperiencePerRole>,
    /// List of specific domains or areas of expertise the candidate worked in
    pub domains: Vec<String>,
    /// List of experience levels (e.g., Junior, Senior, Lead)
    pub levels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Education {
    /// List of required educational degrees
    pub degrees: Vec<String>,
    /// List of required professional certifications
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OtherSkills {
    /// List of required soft skills and interpersonal abilities
    pub soft_skills: Vec<String>,
    /// List of languages
    pub languages: Vec<String>,
    /// Location requirements or work arrangement (e.g., Remote, Hybrid, On-site)
    pub location: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction outputs
// ────────────────────────────────────────────────────────────────────────────

/// Candidate Profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CandidateProfile {
    /// Name of the Candidate
    pub name: String,
    /// List of technical skills acquired by the candidate
    pub skills: Vec<String>,
    /// Details about work experience of the candidate
    pub experience: Experience,
    /// Educational and certification of the candidate
    pub education: Education,
    /// Additional skills including soft skills and logistics
    pub other_skills: OtherSkills,
    /// A brief summary of the resume covering all aspects
    pub brief_description: String,
}

/// Job requirements specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobRequirements {
    /// List of technical skills required for the position
    pub required_skills: Vec<String>,
    /// Details about required work experience
    pub required_experience: Experience,
    /// Educational and certification requirements
    pub required_education: Education,
    /// Additional requirements including soft skills and logistics
    pub other_requirements: OtherSkills,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring outputs
// ────────────────────────────────────────────────────────────────────────────

/// Skills match between a resume and a job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SkillScore {
    /// A score between 0 to 100 based on how close the job description skills are to the given candidate skills
    #[schemars(range(min = 0, max = 100))]
    pub score: i64,
    /// List of key matching skills from comparing the Job Description and Candidate Resume
    pub matching_skills: Vec<String>,
    /// List of skills that the candidate is missing which the Job Description states
    pub missing_skills: Vec<String>,
    /// Reasoning of why this particular score is assigned
    #[serde(default)]
    pub reason: String,
}

/// Experience match between a resume and a job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExperienceScore {
    /// A score between 0 to 100 based on how close the job description experience are to the given relevant candidate experience
    #[schemars(range(min = 0, max = 100))]
    pub score: i64,
    /// Reasoning of why this particular score is assigned
    #[serde(default)]
    pub reason: String,
}

/// Education match between a resume and a job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EducationScore {
    /// A score between 0 to 100 based on how close the job description education qualifications/certifications are to the given candidate education qualifications / certifications
    #[schemars(range(min = 0, max = 100))]
    pub score: i64,
    /// Reasoning of why this particular score is assigned
    #[serde(default)]
    pub reason: String,
}

/// Match of other factors (soft skills, languages, location) between a resume and a job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OtherScore {
    /// A score between 0 to 100 based on how close the other relevant skills are
    #[schemars(range(min = 0, max = 100))]
    pub score: i64,
    /// Reasoning of why this particular score is assigned
    #[serde(default)]
    pub reason: String,
}

/// Improvement advice for the candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Recommendations {
    /// Recommendations for the candidate to improve in Markdown format
    pub recommendations: String,
}
