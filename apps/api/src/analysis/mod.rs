// Resume scoring against a job description, the Scoring Normalizer that makes
// its output safe to display, and resume optimization.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod service;
pub mod validation;
