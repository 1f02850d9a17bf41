// Job-description summarization. Long postings are condensed before they are
// fed into analysis and optimization prompts.

pub mod handlers;
pub mod prompts;
pub mod summary;
