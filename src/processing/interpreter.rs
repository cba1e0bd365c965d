//! Maps extracted field trees onto the attributes a resume is scored on

use crate::extraction::fields::{ExtractedField, FieldRecord};
use crate::processing::dates::{Clock, DateParser, DateRangeResolver, LenientDateParser, SystemClock};
use crate::processing::text_processor::normalize;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const SKILLS_WORD: &str = "skills";
const PROJECTS_WORD: &str = "projects";
const DATE_KEY: &str = "DATE";

/// One employment date range found under `experience`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub raw: String,
    pub start: String,
    pub end: String,
    pub months: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpretedResume {
    pub name: Option<String>,
    pub experience_months: i64,
    pub experience_entries: Vec<ExperienceEntry>,
    pub skill_tokens: Vec<String>,
    pub project_tokens: Vec<String>,
    /// Recognized fields whose value had a shape they cannot use
    pub unexpected_shapes: usize,
}

pub struct FieldInterpreter<P = LenientDateParser, C = SystemClock> {
    resolver: DateRangeResolver<P, C>,
}

impl FieldInterpreter {
    pub fn new() -> Self {
        Self::with_resolver(DateRangeResolver::new())
    }
}

impl Default for FieldInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DateParser, C: Clock> FieldInterpreter<P, C> {
    pub fn with_resolver(resolver: DateRangeResolver<P, C>) -> Self {
        Self { resolver }
    }

    /// Walk every extracted document and accumulate name, experience,
    /// skill tokens and project tokens. Keys are matched ignoring case.
    pub fn interpret(&self, documents: &[FieldRecord]) -> InterpretedResume {
        let mut resume = InterpretedResume::default();

        for (idx, document) in documents.iter().enumerate() {
            debug!("Analyzing document #{} ({} fields)", idx + 1, document.len());

            for (key, field) in document.iter() {
                match key.to_lowercase().as_str() {
                    "name" => self.read_name(key, field, &mut resume),
                    "experience" => self.read_experience(key, field, &mut resume),
                    "skills" => {
                        resume.unexpected_shapes +=
                            collect_tokens(key, field, SKILLS_WORD, &mut resume.skill_tokens);
                    }
                    "projects" => {
                        if field.is_empty() {
                            debug!("No projects listed");
                            continue;
                        }
                        resume.unexpected_shapes +=
                            collect_tokens(key, field, PROJECTS_WORD, &mut resume.project_tokens);
                    }
                    _ => {}
                }
            }
        }

        resume.experience_months = resume.experience_entries.iter().map(|e| e.months).sum();
        resume
    }

    fn read_name(&self, key: &str, field: &ExtractedField, resume: &mut InterpretedResume) {
        match field {
            ExtractedField::Scalar(value) => {
                let value = value.trim();
                if resume.name.is_none() && !value.is_empty() {
                    resume.name = Some(value.to_string());
                }
            }
            other => {
                debug!("Ignoring '{}' field of kind {}", key, other.kind());
                resume.unexpected_shapes += 1;
            }
        }
    }

    fn read_experience(&self, key: &str, field: &ExtractedField, resume: &mut InterpretedResume) {
        let items = match field {
            ExtractedField::List(items) => items,
            other => {
                debug!("Ignoring '{}' field of kind {}", key, other.kind());
                resume.unexpected_shapes += 1;
                return;
            }
        };

        for item in items {
            let record = match item {
                ExtractedField::Record(record) => record,
                other => {
                    debug!("Ignoring '{}' item of kind {}", key, other.kind());
                    resume.unexpected_shapes += 1;
                    continue;
                }
            };

            let text = match record.get_ignore_case(DATE_KEY) {
                Some(ExtractedField::Scalar(text)) if !text.is_empty() => text,
                Some(ExtractedField::Scalar(_)) | None => continue,
                Some(other) => {
                    debug!("Ignoring {} of kind {}", DATE_KEY, other.kind());
                    resume.unexpected_shapes += 1;
                    continue;
                }
            };

            debug!("Extracted date field: {}", text);
            if let Some((start, end)) = split_date_range(text) {
                let months = self.resolver.months_between(&start, &end);
                debug!("Experience from {} to {}: {} months", start, end, months);
                resume.experience_entries.push(ExperienceEntry {
                    raw: text.clone(),
                    start,
                    end,
                    months,
                });
            }
        }
    }
}

fn separator_regex() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"(?i)\s*-\s*|\s+to\s+").expect("Invalid date separator regex"))
}

/// Split a date range such as `"Jan 2020 - Present"` or `"2019 to 2021"`.
///
/// The text is cut at every separator; anything other than exactly two
/// parts is rejected.
pub fn split_date_range(text: &str) -> Option<(String, String)> {
    let lowered = text.to_lowercase();
    if !(text.contains(" - ") || lowered.contains(" to ") || text.contains('-')) {
        return None;
    }

    let parts: Vec<&str> = separator_regex().split(text).collect();
    match parts.as_slice() {
        [start, end] => Some((start.trim().to_string(), end.trim().to_string())),
        _ => None,
    }
}

/// Append tokens from a scalar or a list of scalars. Returns how many
/// values had a shape that could not be used.
fn collect_tokens(key: &str, field: &ExtractedField, category_word: &str, out: &mut Vec<String>) -> usize {
    match field {
        ExtractedField::Scalar(text) => {
            out.extend(normalize(text, category_word));
            0
        }
        ExtractedField::List(items) => {
            let mut unexpected = 0;
            for item in items {
                match item {
                    ExtractedField::Scalar(text) if !text.is_empty() => {
                        out.extend(normalize(text, category_word));
                    }
                    ExtractedField::Scalar(_) => {}
                    other => {
                        debug!("Ignoring '{}' item of kind {}", key, other.kind());
                        unexpected += 1;
                    }
                }
            }
            unexpected
        }
        ExtractedField::Record(_) => {
            debug!("Ignoring '{}' field of kind record", key);
            1
        }
    }
}
