//! Resume analysis: orchestrates the scoring pipeline for one or many resumes.
//!
//! Flow per resume: extract resume → extract job → score skills / experience /
//! education / other (concurrently) → weight and sum → recommendations → assemble.
//!
//! Every step is all-or-nothing: any failure aborts that resume's analysis and no
//! partial `AnalysisResult` is ever produced.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::extractor::{extract_candidate_profile, extract_job_requirements};
use crate::analysis::models::{CandidateProfile, Education, Experience, JobRequirements, OtherSkills};
use crate::analysis::scorer::{
    generate_recommendations, score_education, score_experience, score_other, score_skills,
};
use crate::analysis::weights::{clamp_raw_score, Category, ScoringWeights};
use crate::errors::AppError;
use crate::llm_client::StructuredModel;

// ────────────────────────────────────────────────────────────────────────────
// Result records
// ────────────────────────────────────────────────────────────────────────────

/// One category's contribution: the weight-adjusted score and the model's rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub score: f64,
    pub reason: String,
}

impl ComponentScore {
    /// Undoes the weighting to get back the 0–100 sub-score.
    pub fn raw_score(&self, weight: f64) -> f64 {
        if weight == 0.0 {
            0.0
        } else {
            self.score / weight
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub skills: ComponentScore,
    pub experience: ComponentScore,
    pub education: ComponentScore,
    pub other: ComponentScore,
}

impl ComponentScores {
    pub fn get(&self, category: Category) -> &ComponentScore {
        match category {
            Category::Skills => &self.skills,
            Category::Experience => &self.experience,
            Category::Education => &self.education,
            Category::Other => &self.other,
        }
    }

    pub fn total(&self) -> f64 {
        self.skills.score + self.experience.score + self.education.score + self.other.score
    }
}

/// Copy of what was extracted from the resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    /// Every skill extracted from the resume.
    pub matching_skills: Vec<String>,
    pub experience_summary: Experience,
    pub education_summary: Education,
    pub other_factors: OtherSkills,
}

/// Final, read-only output of analyzing one resume against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub name: String,
    pub total_score: f64,
    pub component_scores: ComponentScores,
    pub analysis: AnalysisDetails,
    /// Markdown. May contain literal escape sequences; see `recommendations_markdown`.
    pub recommendations: String,
}

/// Flat row for ranking tables: weighted scores only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub name: String,
    pub total_score: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub other: f64,
}

impl AnalysisResult {
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            name: self.name.clone(),
            total_score: self.total_score,
            skills: self.component_scores.skills.score,
            experience: self.component_scores.experience.score,
            education: self.component_scores.education.score,
            other: self.component_scores.other.score,
        }
    }

    /// Recommendations with literal escape sequences (`\n`, `\t`, `\r`, `\"`, `\\`,
    /// `\uXXXX`) turned into the characters they stand for.
    pub fn recommendations_markdown(&self) -> String {
        unescape_literal_sequences(&self.recommendations)
    }
}

fn unescape_literal_sequences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (decoded, consumed) = match after.chars().next() {
            Some('n') => (Some('\n'), 1),
            Some('t') => (Some('\t'), 1),
            Some('r') => (Some('\r'), 1),
            Some('"') => (Some('"'), 1),
            Some('\\') => (Some('\\'), 1),
            Some('u') => match decode_unicode_escape(&after[1..]) {
                Some((ch, len)) => (Some(ch), 1 + len),
                None => (None, 0),
            },
            _ => (None, 0),
        };

        // unknown or malformed sequences keep their backslash
        out.push(decoded.unwrap_or('\\'));
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

/// Decodes the `XXXX` following `\u`, joining a `\uD8xx\uDCxx` surrogate pair.
/// Returns the character and the number of bytes consumed.
fn decode_unicode_escape(text: &str) -> Option<(char, usize)> {
    let high = parse_hex4(text)?;
    if let Some(ch) = char::from_u32(high) {
        return Some((ch, 4));
    }

    let low = text.get(4..)?.strip_prefix("\\u").and_then(parse_hex4)?;
    if (0xD800..0xDC00).contains(&high) && (0xDC00..0xE000).contains(&low) {
        let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        return char::from_u32(combined).map(|ch| (ch, 10));
    }
    None
}

fn parse_hex4(text: &str) -> Option<u32> {
    let digits = text.get(..4)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

// ────────────────────────────────────────────────────────────────────────────
// Batch records
// ────────────────────────────────────────────────────────────────────────────

/// A resume to analyze. `label` identifies it in batch output (file name, index, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeInput {
    pub label: String,
    pub text: String,
}

#[derive(Debug)]
pub struct BatchEntry {
    pub label: String,
    pub outcome: Result<AnalysisResult, AppError>,
}

/// Outcome of one batch call. Entries are in input order.
#[derive(Debug)]
pub struct BatchReport {
    pub job_requirements: JobRequirements,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn successes(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }

    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_err()).count()
    }

    /// Summaries of successful analyses, best total score first.
    pub fn ranked(&self) -> Vec<AnalysisSummary> {
        let mut summaries: Vec<_> = self.successes().map(AnalysisResult::summary).collect();
        summaries.sort_by(|a, b| {
            b.total_score
                .partial_cmp(&a.total_score)
                .unwrap_or(Ordering::Equal)
        });
        summaries
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

/// Runs the analysis pipeline. Holds no per-analysis state; safe to share behind `Arc`.
pub struct ResumeAnalyzer {
    model: Arc<dyn StructuredModel>,
    weights: ScoringWeights,
    concurrency: usize,
}

impl ResumeAnalyzer {
    pub fn new(model: Arc<dyn StructuredModel>) -> Self {
        Self {
            model,
            weights: ScoringWeights::default(),
            concurrency: 1,
        }
    }

    /// Maximum resumes in flight during `analyze_batch`. Clamped to at least 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Analyzes one resume against one job description.
    ///
    /// Steps:
    /// 1. reject an empty job description (no model call made)
    /// 2. extract_candidate_profile() → CandidateProfile
    /// 3. extract_job_requirements() → JobRequirements
    /// 4. four category scores, weighted and summed
    /// 5. recommendations
    pub async fn analyze(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<AnalysisResult, AppError> {
        validate_job_description(jd_text)?;
        let model = self.model.as_ref();

        let profile = extract_candidate_profile(resume_text, today(), model).await?;
        info!("Resume extracted for candidate '{}'", profile.name);

        let job = extract_job_requirements(jd_text, model).await?;
        info!(
            "Job description extracted: {} required skills",
            job.required_skills.len()
        );

        self.score_and_assemble(profile, &job, jd_text).await
    }

    /// Analyzes several resumes against one job description.
    ///
    /// The job description is extracted once and shared by every resume, so a batch of
    /// N resumes makes `1 + 6N` model calls. A failure on one resume is recorded in its
    /// entry and does not affect the others; a job extraction failure fails the batch.
    pub async fn analyze_batch(
        &self,
        resumes: &[ResumeInput],
        jd_text: &str,
    ) -> Result<BatchReport, AppError> {
        validate_job_description(jd_text)?;
        if resumes.is_empty() {
            return Err(AppError::Validation(
                "At least one resume is required".to_string(),
            ));
        }

        info!(
            "Starting batch analysis of {} resumes (concurrency {})",
            resumes.len(),
            self.concurrency
        );

        let job = extract_job_requirements(jd_text, self.model.as_ref()).await?;
        let job_ref = &job;
        let today = today();

        let entries: Vec<BatchEntry> = stream::iter(resumes.iter().cloned())
            .map(|resume: ResumeInput| async move {
                let outcome = self.analyze_against(&resume.text, job_ref, jd_text, today).await;
                if let Err(e) = &outcome {
                    warn!("Analysis of '{}' failed: {e}", resume.label);
                }
                BatchEntry {
                    label: resume.label,
                    outcome,
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let report = BatchReport {
            job_requirements: job,
            entries,
        };
        info!(
            "Batch analysis finished: {} succeeded, {} failed",
            report.entries.len() - report.failure_count(),
            report.failure_count()
        );

        Ok(report)
    }

    async fn analyze_against(
        &self,
        resume_text: &str,
        job: &JobRequirements,
        jd_text: &str,
        today: NaiveDate,
    ) -> Result<AnalysisResult, AppError> {
        let profile = extract_candidate_profile(resume_text, today, self.model.as_ref()).await?;
        self.score_and_assemble(profile, job, jd_text).await
    }

    async fn score_and_assemble(
        &self,
        profile: CandidateProfile,
        job: &JobRequirements,
        jd_text: &str,
    ) -> Result<AnalysisResult, AppError> {
        let model = self.model.as_ref();

        // The four category scores are independent of each other.
        let (skills, experience, education, other) = tokio::try_join!(
            score_skills(&profile.skills, &job.required_skills, model),
            score_experience(&profile.experience, &job.required_experience, model),
            score_education(&profile.education, &job.required_education, model),
            score_other(&profile.other_skills, &job.other_requirements, model),
        )?;

        let component_scores = ComponentScores {
            skills: self.component(Category::Skills, skills.score, &skills.reason),
            experience: self.component(Category::Experience, experience.score, &experience.reason),
            education: self.component(Category::Education, education.score, &education.reason),
            other: self.component(Category::Other, other.score, &other.reason),
        };
        let total_score = component_scores.total();

        info!(
            "Scored '{}': total={:.1} (skills={}, experience={}, education={}, other={})",
            profile.name, total_score, skills.score, experience.score, education.score, other.score
        );

        let recommendations = generate_recommendations(
            &skills,
            &profile.experience,
            &job.required_experience,
            jd_text,
            model,
        )
        .await?;

        Ok(AnalysisResult {
            name: profile.name,
            total_score,
            component_scores,
            analysis: AnalysisDetails {
                matching_skills: profile.skills,
                experience_summary: profile.experience,
                education_summary: profile.education,
                other_factors: profile.other_skills,
            },
            recommendations: recommendations.recommendations,
        })
    }

    fn component(&self, category: Category, raw: i64, reason: &str) -> ComponentScore {
        ComponentScore {
            score: self.weights.weighted(category, clamp_raw_score(category, raw)),
            reason: reason.to_string(),
        }
    }
}

fn validate_job_description(jd_text: &str) -> Result<(), AppError> {
    if jd_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
