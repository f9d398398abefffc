pub mod analyzer;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod scorer;
pub mod weights;

#[cfg(test)]
mod fixtures;
