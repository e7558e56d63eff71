// src/profile.rs
//! Structured candidate and requirement profiles extracted from free text

use crate::config::CuratedProfile;
use crate::extraction::{extract_education, extract_years_experience, EducationLevel, SkillExtractor};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Everything the scoring engine needs to know about one résumé.
/// Immutable once extracted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub matched_skills: BTreeSet<String>,
    pub years_experience: u32,
    pub education: EducationLevel,
    #[serde(default)]
    pub certifications: Vec<String>,
}

impl CandidateProfile {
    /// Extract a profile from résumé text. Total: malformed or empty text
    /// degrades to empty skills, zero years, Unknown education.
    pub fn extract(resume_text: &str, extractor: &impl SkillExtractor) -> Self {
        let matched_skills = extractor.extract(resume_text);
        let years_experience = extract_years_experience(resume_text);
        let education = extract_education(resume_text);
        debug!(
            skills = matched_skills.len(),
            years_experience, "Extracted candidate profile"
        );
        Self {
            matched_skills,
            years_experience,
            education,
            certifications: Vec::new(),
        }
    }

    /// Attach a curated certification list (certifications are not parsed
    /// from free text).
    pub fn with_certifications(mut self, certifications: Vec<String>) -> Self {
        self.certifications = certifications;
        self
    }
}

/// A job description's demands, shared read-only across every candidate
/// scored against it.
///
/// `preferred_skills` and `bonus_skills` only come from curated profiles;
/// job-text parsing places every extracted skill in `required_skills`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementProfile {
    pub required_skills: BTreeSet<String>,
    #[serde(default)]
    pub preferred_skills: BTreeSet<String>,
    #[serde(default)]
    pub bonus_skills: BTreeSet<String>,
    pub required_years: u32,
    pub required_education: EducationLevel,
    #[serde(default)]
    pub synonyms: BTreeMap<String, BTreeSet<String>>,
}

impl RequirementProfile {
    /// Parse a requirement profile out of job-description text. Empty text
    /// yields an empty profile, never an error.
    pub fn parse(job_text: &str, extractor: &impl SkillExtractor) -> Self {
        Self {
            required_skills: extractor.extract(job_text),
            required_years: extract_years_experience(job_text),
            required_education: extract_education(job_text),
            ..Default::default()
        }
    }

    /// Build a requirement profile from a manually curated configuration
    /// profile. Skill entries are lowercased and trimmed; blank entries are
    /// dropped.
    pub fn from_curated(curated: &CuratedProfile) -> Self {
        fn normalize_set(entries: &[String]) -> BTreeSet<String> {
            entries
                .iter()
                .map(|entry| entry.trim().to_lowercase())
                .filter(|entry| !entry.is_empty())
                .collect()
        }

        Self {
            required_skills: normalize_set(&curated.required),
            preferred_skills: normalize_set(&curated.preferred),
            bonus_skills: normalize_set(&curated.bonus),
            required_years: curated.required_years,
            required_education: curated.required_education,
            synonyms: curated.synonyms.clone(),
        }
    }
}
