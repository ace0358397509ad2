//! Static portfolio document

use devfolio_collector::RepositoryWithLanguages;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("Failed to read portfolio file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid portfolio file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub portfolio: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
    /// 0 to 100
    pub proficiency: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub location: String,
    pub period: String,
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// The hand-written part of the portfolio: who, what they know, where they worked
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioProfile {
    #[serde(default)]
    pub personal: PersonalInfo,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
    #[serde(default)]
    pub experience: Vec<Experience>,
}

impl PortfolioProfile {
    /// Load a profile from a JSON file
    pub async fn load(path: &Path) -> Result<Self, PortfolioError> {
        let text = tokio::fs::read_to_string(path).await?;
        let profile: Self = serde_json::from_str(&text)?;

        info!(
            path = %path.display(),
            skills = profile.skills.len(),
            experience = profile.experience.len(),
            "Loaded portfolio profile"
        );
        Ok(profile)
    }

    pub fn with_projects(&self, projects: Vec<RepositoryWithLanguages>) -> PortfolioPage {
        PortfolioPage {
            profile: self.clone(),
            projects,
        }
    }
}

/// Everything the portfolio page renders
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioPage {
    #[serde(flatten)]
    pub profile: PortfolioProfile,
    pub projects: Vec<RepositoryWithLanguages>,
}
