// Interview preparation: question sets tailored to a resume and job, and
// scoring of a candidate's practice answers.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod service;
