//! Canned model outputs for every pipeline step. Raw scores: skills 80, experience 70,
//! education 90, other 60; weighted 32 + 21 + 18 + 6 = 77.

use serde_json::{json, Value};

use crate::analysis::prompts::{
    EDUCATION_SCORE, EXPERIENCE_SCORE, JD_EXTRACT, OTHER_SCORE, RECOMMENDATIONS, RESUME_EXTRACT,
    SKILLS_SCORE,
};
use crate::llm_client::stub::StubModel;

pub const RESUME_TEXT: &str = "Jane Doe\nSenior Backend Engineer at Acme (2019-present)\n\
    Rust, PostgreSQL, Kubernetes\nBSc Computer Science\nBased in Berlin, speaks English and German";

pub const JD_TEXT: &str = "Senior Rust Engineer\nRequired: 5+ years backend, Rust, SQL, AWS.\n\
    BSc in Computer Science or equivalent. Remote (EU). English required.";

pub fn candidate_profile() -> Value {
    json!({
        "name": "Jane Doe",
        "skills": ["Rust", "PostgreSQL", "Kubernetes"],
        "experience": {
            "years_per_role": [{"role": "Senior Backend Engineer", "years": "5"}],
            "domains": ["backend", "distributed systems"],
            "levels": ["Senior"]
        },
        "education": {
            "degrees": ["BSc Computer Science"],
            "certifications": []
        },
        "other_skills": {
            "soft_skills": ["mentoring"],
            "languages": ["English", "German"],
            "location": "Berlin"
        },
        "brief_description": "Backend engineer focused on Rust services."
    })
}

pub fn job_requirements() -> Value {
    json!({
        "required_skills": ["Rust", "SQL", "AWS"],
        "required_experience": {
            "years_per_role": [{"role": "Backend Engineer", "years": "5+"}],
            "domains": ["backend"],
            "levels": ["Senior"]
        },
        "required_education": {
            "degrees": ["BSc Computer Science"],
            "certifications": []
        },
        "other_requirements": {
            "soft_skills": ["communication"],
            "languages": ["English"],
            "location": "Remote (EU)"
        }
    })
}

pub fn skill_score(score: i64) -> Value {
    json!({
        "score": score,
        "matching_skills": ["Rust", "SQL"],
        "missing_skills": ["AWS"],
        "reason": "Strong Rust and SQL, no AWS."
    })
}

pub fn fixture_model() -> StubModel {
    fixture_model_with_skills(80)
}

pub fn fixture_model_with_skills(skills: i64) -> StubModel {
    StubModel::new()
        .with_response(RESUME_EXTRACT.id, candidate_profile())
        .with_response(JD_EXTRACT.id, job_requirements())
        .with_response(SKILLS_SCORE.id, skill_score(skills))
        .with_response(
            EXPERIENCE_SCORE.id,
            json!({"score": 70, "reason": "Five years of backend work at senior level."}),
        )
        .with_response(
            EDUCATION_SCORE.id,
            json!({"score": 90, "reason": "Degree matches exactly."}),
        )
        .with_response(
            OTHER_SCORE.id,
            json!({"score": 60, "reason": "Berlin fits a remote EU role."}),
        )
        .with_response(
            RECOMMENDATIONS.id,
            json!({"recommendations": "- Learn **AWS** fundamentals\\n- Earn the AWS Developer certification"}),
        )
}
