//! Resume-to-job-description matching: structured extraction, weighted category
//! scoring and recommendations, served over HTTP.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod pdf;
pub mod routes;
pub mod state;
