//! Batch pipeline: extraction, interpretation, scoring and ranking

use crate::error::{Result, ResumeRankerError};
use crate::extraction::extractor::FieldExtractor;
use crate::input::manager::ResumeDocument;
use crate::processing::dates::{Clock, DateParser, LenientDateParser, SystemClock};
use crate::processing::interpreter::{FieldInterpreter, InterpretedResume};
use crate::processing::profile::RequirementProfile;
use crate::processing::ranking::{display_name, rank, rank_by, ResumeResult};
use crate::processing::scoring::{self, ScoreBreakdown};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Everything computed for one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAnalysis {
    pub file_name: String,
    pub display_name: String,
    pub resume: InterpretedResume,
    pub score: ScoreBreakdown,
    /// Set when extraction failed and the resume was scored without fields
    pub extraction_error: Option<String>,
}

impl CandidateAnalysis {
    pub fn result(&self) -> ResumeResult {
        ResumeResult::new(self.display_name.clone(), self.score.final_score)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Candidates in submission order
    pub candidates: Vec<CandidateAnalysis>,
    pub shortlist: Vec<ResumeResult>,
    pub processing_time_ms: u64,
}

impl BatchOutcome {
    /// Candidates ordered and truncated the same way as the shortlist.
    pub fn ranked_candidates(&self, shortlist_size: usize) -> Vec<&CandidateAnalysis> {
        rank_by(self.candidates.iter().collect(), shortlist_size, |c| c.score.final_score)
    }

    pub fn failed_extractions(&self) -> usize {
        self.candidates
            .iter()
            .filter(|c| c.extraction_error.is_some())
            .count()
    }
}

/// Runs one task per resume, at most `concurrency` at a time.
pub struct BatchRanker<E, P = LenientDateParser, C = SystemClock> {
    extractor: Arc<E>,
    interpreter: Arc<FieldInterpreter<P, C>>,
    concurrency: usize,
}

impl<E> BatchRanker<E>
where
    E: FieldExtractor + Send + Sync + 'static,
{
    pub fn new(extractor: E) -> Self {
        Self::with_interpreter(extractor, FieldInterpreter::new())
    }
}

impl<E, P, C> BatchRanker<E, P, C>
where
    E: FieldExtractor + Send + Sync + 'static,
    P: DateParser + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub fn with_interpreter(extractor: E, interpreter: FieldInterpreter<P, C>) -> Self {
        Self {
            extractor: Arc::new(extractor),
            interpreter: Arc::new(interpreter),
            concurrency: 1,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn rank_batch(
        &self,
        documents: Vec<ResumeDocument>,
        profile: &RequirementProfile,
    ) -> Result<BatchOutcome> {
        self.rank_batch_with_progress(documents, profile, |_| {}).await
    }

    /// Score every resume and build the shortlist. `on_done` is called as
    /// each resume finishes, in completion order.
    ///
    /// Extraction failures are isolated to their resume; only an invalid
    /// profile or an empty batch fails the whole call.
    pub async fn rank_batch_with_progress<F>(
        &self,
        documents: Vec<ResumeDocument>,
        profile: &RequirementProfile,
        mut on_done: F,
    ) -> Result<BatchOutcome>
    where
        F: FnMut(&CandidateAnalysis),
    {
        profile.validate()?;
        if documents.is_empty() {
            return Err(ResumeRankerError::InvalidInput("No resumes to rank".to_string()));
        }

        let start_time = Instant::now();
        let total = documents.len();
        info!("Ranking {} resumes with concurrency {}", total, self.concurrency);

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let shared_profile = Arc::new(profile.clone());
        let mut tasks = JoinSet::new();

        for (index, document) in documents.into_iter().enumerate() {
            let semaphore = semaphore.clone();
            let extractor = self.extractor.clone();
            let interpreter = self.interpreter.clone();
            let profile = shared_profile.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                debug!("Processing resume {}/{}: {}", index + 1, total, document.file_name);
                let analysis = analyze(extractor.as_ref(), &interpreter, &document, &profile).await;
                (index, analysis)
            });
        }

        let mut slots: Vec<Option<CandidateAnalysis>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, analysis)) => {
                    on_done(&analysis);
                    slots[index] = Some(analysis);
                }
                Err(e) => error!("Resume task did not complete: {}", e),
            }
        }

        let candidates: Vec<CandidateAnalysis> = slots.into_iter().flatten().collect();
        let results = candidates.iter().map(CandidateAnalysis::result).collect();
        let shortlist = rank(results, profile.shortlist_size);

        Ok(BatchOutcome {
            candidates,
            shortlist,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

async fn analyze<E, P, C>(
    extractor: &E,
    interpreter: &FieldInterpreter<P, C>,
    document: &ResumeDocument,
    profile: &RequirementProfile,
) -> CandidateAnalysis
where
    E: FieldExtractor,
    P: DateParser,
    C: Clock,
{
    info!("Processing resume: {}", document.file_name);

    let (records, extraction_error) = match extractor.extract(document).await {
        Ok(records) => (records, None),
        Err(e) => {
            error!("Error analyzing document {}: {}", document.file_name, e);
            (Vec::new(), Some(e.to_string()))
        }
    };

    let resume = interpreter.interpret(&records);
    debug!("Extracted total months of experience: {}", resume.experience_months);
    debug!("Extracted skills: {:?}", resume.skill_tokens);
    debug!("Extracted projects: {:?}", resume.project_tokens);

    let score = scoring::score(&resume, profile);
    debug!("Matched skills: {:?}", score.matched_skills);
    debug!("Matched projects: {:?}", score.matched_projects);

    let display_name = display_name(resume.name.as_deref(), &document.file_name);
    info!("Final score for {}: {}", display_name, score.final_score);

    CandidateAnalysis {
        file_name: document.file_name.clone(),
        display_name,
        resume,
        score,
        extraction_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fields::{ExtractedField, FieldRecord};
    use crate::input::file_detector::FileType;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    /// In-memory extractor; unknown files fail like an unreachable service.
    struct StaticExtractor {
        fields: HashMap<String, FieldRecord>,
        delays: HashMap<String, u64>,
    }

    impl FieldExtractor for StaticExtractor {
        async fn extract(&self, document: &ResumeDocument) -> Result<Vec<FieldRecord>> {
            if let Some(ms) = self.delays.get(&document.file_name) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            self.fields
                .get(&document.file_name)
                .cloned()
                .map(|record| vec![record])
                .ok_or_else(|| ResumeRankerError::Extraction("service unavailable".to_string()))
        }
    }

    fn document(name: &str) -> ResumeDocument {
        ResumeDocument {
            path: PathBuf::from(name),
            file_name: name.to_string(),
            file_type: FileType::Pdf,
        }
    }

    fn skills_only(name: &str, skills: &str) -> FieldRecord {
        FieldRecord::new()
            .with("Name", ExtractedField::scalar(name))
            .with("Skills", ExtractedField::scalar(skills))
    }

    fn profile(shortlist_size: usize) -> RequirementProfile {
        RequirementProfile::new(
            0,
            vec!["rust".to_string(), "sql".to_string()],
            vec![10.0, 5.0],
            Vec::new(),
            shortlist_size,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_failed_extraction_is_isolated() {
        let mut fields = HashMap::new();
        fields.insert("a.pdf".to_string(), skills_only("Ana", "Rust"));
        let ranker = BatchRanker::new(StaticExtractor { fields, delays: HashMap::new() });

        let outcome = ranker
            .rank_batch(vec![document("a.pdf"), document("broken.pdf")], &profile(5))
            .await
            .unwrap();

        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(outcome.failed_extractions(), 1);
        assert_eq!(outcome.shortlist, vec![ResumeResult::new("Ana", 10.0), ResumeResult::new("broken.pdf", 0.0)]);
    }

    #[tokio::test]
    async fn test_completion_order_does_not_change_ranking() {
        let mut fields = HashMap::new();
        let mut delays = HashMap::new();
        for (file, name, delay) in [("1.pdf", "First", 40), ("2.pdf", "Second", 0), ("3.pdf", "Third", 20)] {
            fields.insert(file.to_string(), skills_only(name, "sql"));
            delays.insert(file.to_string(), delay);
        }
        let ranker = BatchRanker::new(StaticExtractor { fields, delays }).with_concurrency(3);

        let mut completed = Vec::new();
        let outcome = ranker
            .rank_batch_with_progress(
                vec![document("1.pdf"), document("2.pdf"), document("3.pdf")],
                &profile(3),
                |c| completed.push(c.display_name.clone()),
            )
            .await
            .unwrap();

        assert_eq!(completed.len(), 3);
        let names: Vec<&str> = outcome.shortlist.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let ranker = BatchRanker::new(StaticExtractor { fields: HashMap::new(), delays: HashMap::new() });
        let result = ranker.rank_batch(Vec::new(), &profile(1)).await;
        assert!(matches!(result, Err(ResumeRankerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_ranked_candidates_follow_shortlist() {
        let mut fields = HashMap::new();
        fields.insert("a.pdf".to_string(), skills_only("Low", "sql"));
        fields.insert("b.pdf".to_string(), skills_only("High", "rust sql"));
        let ranker = BatchRanker::new(StaticExtractor { fields, delays: HashMap::new() });

        let outcome = ranker
            .rank_batch(vec![document("a.pdf"), document("b.pdf")], &profile(1))
            .await
            .unwrap();

        let ranked = outcome.ranked_candidates(1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].display_name, "High");
        assert_eq!(ranked[0].score.matched_skills, vec!["rust", "sql"]);
        assert_eq!(outcome.shortlist, vec![ResumeResult::new("High", 15.0)]);
    }
}
