//! Composite resume score from experience, skills and projects

use crate::processing::interpreter::InterpretedResume;
use crate::processing::profile::{RequiredSkill, RequirementProfile};
use crate::processing::text_processor::join_tokens;
use serde::{Deserialize, Serialize};

/// Points for every required project found on a resume.
pub const PROJECT_POINTS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub experience_score: f64,
    pub skill_score: f64,
    pub project_score: f64,
    pub final_score: f64,
    pub matched_skills: Vec<String>,
    pub matched_projects: Vec<String>,
}

/// Score an interpreted resume against the profile.
pub fn score(resume: &InterpretedResume, profile: &RequirementProfile) -> ScoreBreakdown {
    score_parts(
        resume.experience_months,
        &resume.skill_tokens,
        &resume.project_tokens,
        profile,
    )
}

/// The three sub-scores are added on their raw scales: one point per month
/// of surplus or deficit, skill weights as given, and [`PROJECT_POINTS`] per
/// project.
pub fn score_parts(
    experience_months: i64,
    skill_tokens: &[String],
    project_tokens: &[String],
    profile: &RequirementProfile,
) -> ScoreBreakdown {
    let experience_score = compare_experience(experience_months, profile.required_experience_months) as f64;
    let (skill_score, matched_skills) = compare_skills(skill_tokens, &profile.required_skills);

    let (project_score, matched_projects) = if project_tokens.is_empty() {
        (0.0, Vec::new())
    } else {
        compare_projects(project_tokens, &profile.required_projects)
    };

    ScoreBreakdown {
        experience_score,
        skill_score,
        project_score,
        final_score: experience_score + skill_score + project_score,
        matched_skills,
        matched_projects,
    }
}

pub fn compare_experience(extracted_months: i64, required_months: i64) -> i64 {
    extracted_months - required_months
}

/// A skill matches when its text appears verbatim in the space-joined tokens.
pub fn compare_skills(skill_tokens: &[String], required: &[RequiredSkill]) -> (f64, Vec<String>) {
    let extracted_text = join_tokens(skill_tokens);
    let mut matched = Vec::new();
    let mut total = 0.0;

    for skill in required {
        if extracted_text.contains(skill.name.as_str()) {
            matched.push(skill.name.clone());
            total += skill.weight;
        }
    }

    (total, matched)
}

pub fn compare_projects(project_tokens: &[String], required: &[String]) -> (f64, Vec<String>) {
    let extracted_text = join_tokens(project_tokens);
    let matched: Vec<String> = required
        .iter()
        .filter(|project| extracted_text.contains(project.as_str()))
        .cloned()
        .collect();

    (matched.len() as f64 * PROJECT_POINTS, matched)
}
