use serde::{Deserialize, Serialize};
use tracing::warn;

pub const MIN_RAW_SCORE: i64 = 0;
pub const MAX_RAW_SCORE: i64 = 100;

/// The four scored dimensions of a resume/job match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Skills,
    Experience,
    Education,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Skills,
        Category::Experience,
        Category::Education,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Skills => "skills",
            Category::Experience => "experience",
            Category::Education => "education",
            Category::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub other: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            experience: 0.3,
            education: 0.2,
            other: 0.1,
        }
    }
}

impl ScoringWeights {
    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::Skills => self.skills,
            Category::Experience => self.experience,
            Category::Education => self.education,
            Category::Other => self.other,
        }
    }

    /// Summed smallest-first so the default weights add up to exactly 1.0.
    pub fn sum(&self) -> f64 {
        self.other + self.education + self.experience + self.skills
    }

    /// Weighted score: raw 0–100 sub-score × category weight.
    pub fn weighted(&self, category: Category, raw: u8) -> f64 {
        f64::from(raw) * self.weight(category)
    }
}

/// Brings a model-reported sub-score into 0–100.
///
/// The schema declares the range but the model is not bound by it; out-of-range
/// values are clamped and logged rather than failing the whole analysis.
pub fn clamp_raw_score(category: Category, raw: i64) -> u8 {
    if !(MIN_RAW_SCORE..=MAX_RAW_SCORE).contains(&raw) {
        warn!(
            category = category.as_str(),
            raw, "model returned out-of-range sub-score; clamping to 0-100"
        );
    }
    raw.clamp(MIN_RAW_SCORE, MAX_RAW_SCORE) as u8
}
