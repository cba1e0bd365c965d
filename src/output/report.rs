//! Report structures for a ranked batch of resumes

use crate::processing::analyzer::{BatchOutcome, CandidateAnalysis};
use crate::processing::profile::RequirementProfile;
use crate::processing::ranking::ResumeResult;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Everything a formatter needs to present one ranking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    /// Ranked `{name, score}` entries, at most `shortlist_size` long
    pub shortlist: Vec<ResumeResult>,

    /// Every candidate, best score first
    pub candidates: Vec<CandidateAnalysis>,

    /// Requirements the batch was ranked against
    pub profile: RequirementProfile,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated
    pub generated_at: SystemTime,

    /// Version of the ranker used
    pub ranker_version: String,

    /// Extraction backend the fields came from
    pub extraction_backend: String,

    pub resumes_processed: usize,
    pub failed_extractions: usize,

    /// Total processing time
    pub processing_time_ms: u64,
}

impl RankingReport {
    pub fn from_outcome(outcome: BatchOutcome, profile: &RequirementProfile, extraction_backend: &str) -> Self {
        let metadata = ReportMetadata {
            generated_at: SystemTime::now(),
            ranker_version: env!("CARGO_PKG_VERSION").to_string(),
            extraction_backend: extraction_backend.to_string(),
            resumes_processed: outcome.candidates.len(),
            failed_extractions: outcome.failed_extractions(),
            processing_time_ms: outcome.processing_time_ms,
        };

        let candidates = outcome
            .ranked_candidates(outcome.candidates.len())
            .into_iter()
            .cloned()
            .collect();

        Self {
            shortlist: outcome.shortlist,
            candidates,
            profile: profile.clone(),
            metadata,
        }
    }
}
