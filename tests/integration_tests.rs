//! Integration tests for the resume ranker

use chrono::NaiveDate;
use resume_ranker::config::OutputFormat;
use resume_ranker::extraction::fields::ExtractionOutput;
use resume_ranker::extraction::{ExtractedField, FieldRecord, JsonFieldExtractor};
use resume_ranker::input::InputManager;
use resume_ranker::output::{RankingReport, ReportGenerator};
use resume_ranker::processing::dates::{DateRangeResolver, FixedClock, LenientDateParser};
use resume_ranker::processing::interpreter::FieldInterpreter;
use resume_ranker::processing::{BatchRanker, RequirementProfile, ResumeResult};
use resume_ranker::ResumeRankerError;
use std::path::Path;

fn resume(name: &str, dates: &[&str], skills: &str) -> FieldRecord {
    let experience = dates
        .iter()
        .map(|date| ExtractedField::Record(FieldRecord::new().with("DATE", ExtractedField::scalar(*date))))
        .collect();

    FieldRecord::new()
        .with("Name", ExtractedField::scalar(name))
        .with("Experience", ExtractedField::List(experience))
        .with("Skills", ExtractedField::scalar(skills))
}

fn write_fields(path: &Path, record: FieldRecord) {
    let output = ExtractionOutput { documents: vec![record] };
    std::fs::write(path, serde_json::to_string(&output).unwrap()).unwrap();
}

fn profile(shortlist_size: usize) -> RequirementProfile {
    RequirementProfile::new(
        24,
        vec!["python".to_string(), "sql".to_string()],
        vec![40.0, 30.0],
        Vec::new(),
        shortlist_size,
    )
    .unwrap()
}

#[tokio::test]
async fn test_ranks_directory_of_resumes() {
    let dir = tempfile::tempdir().unwrap();
    write_fields(&dir.path().join("ada.json"), resume("Ada", &["Jan 2020 - Jul 2022"], "Python, Django"));
    write_fields(&dir.path().join("bob.json"), resume("Bob", &["Jan 2021 to Jan 2022"], "SQL"));
    // no sidecar: extraction fails and the resume is scored without fields
    std::fs::write(dir.path().join("carol.pdf"), b"%PDF-1.4").unwrap();

    let documents = InputManager::new().collect(&[dir.path().to_path_buf()]).await.unwrap();
    assert_eq!(documents.len(), 3);

    let ranker = BatchRanker::new(JsonFieldExtractor).with_concurrency(2);
    let outcome = ranker.rank_batch(documents, &profile(2)).await.unwrap();

    assert_eq!(outcome.shortlist, vec![ResumeResult::new("Ada", 46.0), ResumeResult::new("Bob", 18.0)]);
    assert_eq!(outcome.failed_extractions(), 1);

    let carol = &outcome.candidates[2];
    assert_eq!(carol.display_name, "carol.pdf");
    assert_eq!(carol.score.final_score, -24.0);
}

#[tokio::test]
async fn test_pdf_with_sidecar_fields() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("dave.pdf");
    std::fs::write(&pdf, b"%PDF-1.4").unwrap();
    write_fields(&dir.path().join("dave.pdf.fields.json"), resume("Dave", &["2019 - 2021"], "sql, python"));

    let documents = InputManager::new().collect(&[dir.path().to_path_buf()]).await.unwrap();
    assert_eq!(documents.len(), 1);

    let outcome = BatchRanker::new(JsonFieldExtractor)
        .rank_batch(documents, &profile(5))
        .await
        .unwrap();

    // 24 months from year-only dates, both skills matched
    assert_eq!(outcome.shortlist, vec![ResumeResult::new("Dave", 70.0)]);
}

#[tokio::test]
async fn test_ties_keep_file_order() {
    let dir = tempfile::tempdir().unwrap();
    for file in ["b.json", "a.json", "c.json"] {
        let name = file.trim_end_matches(".json").to_uppercase();
        write_fields(&dir.path().join(file), resume(&name, &[], "sql"));
    }

    let documents = InputManager::new().collect(&[dir.path().to_path_buf()]).await.unwrap();
    let outcome = BatchRanker::new(JsonFieldExtractor)
        .with_concurrency(3)
        .rank_batch(documents, &profile(2))
        .await
        .unwrap();

    let names: Vec<&str> = outcome.shortlist.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn test_open_ended_range_uses_reference_date() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("erin.json");
    write_fields(&path, resume("Erin", &["Mar 2023 - Present"], ""));

    let resolver = DateRangeResolver::with_parts(
        LenientDateParser,
        FixedClock(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()),
    );
    let ranker = BatchRanker::with_interpreter(JsonFieldExtractor, FieldInterpreter::with_resolver(resolver));

    let documents = InputManager::new().collect(&[path]).await.unwrap();
    let outcome = ranker.rank_batch(documents, &profile(1)).await.unwrap();

    assert_eq!(outcome.candidates[0].resume.experience_months, 12);
    assert_eq!(outcome.shortlist, vec![ResumeResult::new("Erin", -12.0)]);
}

#[tokio::test]
async fn test_json_report_shape() {
    let dir = tempfile::tempdir().unwrap();
    write_fields(&dir.path().join("ada.json"), resume("Ada", &["Jan 2020 - Jul 2022"], "python"));

    let documents = InputManager::new().collect(&[dir.path().to_path_buf()]).await.unwrap();
    let profile = profile(3);
    let outcome = BatchRanker::new(JsonFieldExtractor)
        .rank_batch(documents, &profile)
        .await
        .unwrap();

    let report = RankingReport::from_outcome(outcome, &profile, "json");
    let json = ReportGenerator::with_options(false, false, false, false)
        .generate_report(&report, &OutputFormat::Json)
        .unwrap();

    assert_eq!(json, r#"[{"name":"Ada","score":46.0}]"#);
}

#[tokio::test]
async fn test_batch_level_input_errors() {
    let mismatched = RequirementProfile::new(0, vec!["rust".to_string()], Vec::new(), Vec::new(), 1);
    assert!(matches!(mismatched, Err(ResumeRankerError::InvalidInput(_))));

    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "not a resume").unwrap();
    let result = InputManager::new().collect(&[notes]).await;
    assert!(matches!(result, Err(ResumeRankerError::UnsupportedFormat(_))));

    let result = BatchRanker::new(JsonFieldExtractor).rank_batch(Vec::new(), &profile(1)).await;
    assert!(matches!(result, Err(ResumeRankerError::InvalidInput(_))));
}
