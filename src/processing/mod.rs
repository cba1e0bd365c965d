//! Resume interpretation, scoring and ranking

pub mod analyzer;
pub mod dates;
pub mod interpreter;
pub mod profile;
pub mod ranking;
pub mod scoring;
pub mod text_processor;

pub use analyzer::{BatchOutcome, BatchRanker, CandidateAnalysis};
pub use profile::RequirementProfile;
pub use ranking::ResumeResult;
