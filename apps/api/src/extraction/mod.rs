// Resume ingestion from PDF: a local text-extraction cascade followed by an
// LLM pass that turns the raw text (and optional page renders) into markdown
// or structured resume data.

pub mod handlers;
pub mod pdf_text;
pub mod prompts;
pub mod service;
