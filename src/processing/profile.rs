//! Job requirement profile a batch of resumes is ranked against

use crate::error::{Result, ResumeRankerError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredSkill {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementProfile {
    pub required_experience_months: i64,
    #[serde(default)]
    pub required_skills: Vec<RequiredSkill>,
    #[serde(default)]
    pub required_projects: Vec<String>,
    pub shortlist_size: usize,
}

impl RequirementProfile {
    /// Build a profile from index-aligned skill and weight lists.
    pub fn new(
        required_experience_months: i64,
        skills: Vec<String>,
        weights: Vec<f64>,
        required_projects: Vec<String>,
        shortlist_size: usize,
    ) -> Result<Self> {
        if skills.len() != weights.len() {
            return Err(ResumeRankerError::InvalidInput(format!(
                "{} required skills but {} skill weights",
                skills.len(),
                weights.len()
            )));
        }

        let required_skills = skills
            .into_iter()
            .zip(weights)
            .map(|(name, weight)| RequiredSkill { name, weight })
            .collect();

        let profile = Self {
            required_experience_months,
            required_skills,
            required_projects,
            shortlist_size,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let profile: Self = toml::from_str(content)
            .map_err(|e| ResumeRankerError::InvalidInput(format!("Failed to parse profile: {}", e)))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(skill) = self.required_skills.iter().find(|s| !s.weight.is_finite()) {
            return Err(ResumeRankerError::InvalidInput(format!(
                "Skill '{}' has a non-finite weight",
                skill.name
            )));
        }
        Ok(())
    }
}
