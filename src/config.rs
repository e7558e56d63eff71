// src/config.rs
//! Ranker configuration: factor weights, curated profiles, skill vocabulary

use crate::extraction::EducationLevel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// Weights for the scoring factors, each >= 0.
///
/// The 4-factor "semantic-aware" and 5-factor "certification-aware" scoring
/// modes are just different weight vectors over the same primitives. The
/// engine does not normalize: callers wanting a [0,1] final score should
/// call [`WeightConfig::normalize`] first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub embedding: f64,
    pub certifications: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self::semantic_default()
    }
}

impl WeightConfig {
    /// The 4-factor weight vector (certifications excluded).
    pub fn semantic_default() -> Self {
        Self {
            skills: 0.60,
            experience: 0.25,
            education: 0.15,
            embedding: 0.0,
            certifications: 0.0,
        }
    }

    /// The 5-factor weight vector including certifications.
    pub fn certification_aware() -> Self {
        Self {
            skills: 0.45,
            experience: 0.25,
            education: 0.15,
            embedding: 0.0,
            certifications: 0.15,
        }
    }

    /// Clamp negatives to zero and scale so the weights sum to 1.
    /// An all-zero vector stays all-zero.
    pub fn normalize(self) -> Self {
        let clamp = |w: f64| w.max(0.0);
        let total = clamp(self.skills)
            + clamp(self.experience)
            + clamp(self.education)
            + clamp(self.embedding)
            + clamp(self.certifications);
        if total <= 0.0 {
            return Self {
                skills: 0.0,
                experience: 0.0,
                education: 0.0,
                embedding: 0.0,
                certifications: 0.0,
            };
        }
        Self {
            skills: clamp(self.skills) / total,
            experience: clamp(self.experience) / total,
            education: clamp(self.education) / total,
            embedding: clamp(self.embedding) / total,
            certifications: clamp(self.certifications) / total,
        }
    }

    /// Boundary validation; the engine itself never rejects weights.
    pub fn validate(&self) -> Result<()> {
        let entries = [
            ("skills", self.skills),
            ("experience", self.experience),
            ("education", self.education),
            ("embedding", self.embedding),
            ("certifications", self.certifications),
        ];
        for (name, value) in entries {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("Weight '{}' must be a finite value >= 0, got {}", name, value);
            }
        }
        Ok(())
    }
}

/// A manually curated requirement profile, as stored in configuration.
/// Unlike job-text parsing, curated profiles may carry preferred and bonus
/// skill tiers and a synonym map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CuratedProfile {
    pub required: Vec<String>,
    pub preferred: Vec<String>,
    pub bonus: Vec<String>,
    pub required_years: u32,
    pub required_education: EducationLevel,
    pub synonyms: BTreeMap<String, BTreeSet<String>>,
}

/// Top-level ranker configuration file (TOML).
#[derive(Debug, Clone, Deserialize)]
pub struct RankerConfig {
    /// Path to the skill vocabulary CSV.
    pub vocabulary: PathBuf,
    #[serde(default)]
    pub weights: WeightConfig,
    /// Optional curated profile; when present it replaces job-text parsing
    /// as the requirement source.
    #[serde(default)]
    pub profile: Option<CuratedProfile>,
}

impl RankerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.weights.validate()?;
        info!("Loaded ranker config from {}", path.display());
        Ok(config)
    }
}

/// Load the skill vocabulary from a CSV file with a `skill` column.
/// Entries are lowercased, trimmed, deduped, and returned sorted.
pub fn load_skill_vocabulary(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open skill vocabulary: {}", path.display()))?;
    let vocabulary = read_skill_vocabulary(file)
        .with_context(|| format!("Failed to read skill vocabulary: {}", path.display()))?;
    info!(
        "Loaded {} skills from {}",
        vocabulary.len(),
        path.display()
    );
    Ok(vocabulary)
}

pub fn read_skill_vocabulary(reader: impl Read) -> Result<Vec<String>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    let skill_column = headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case("skill"))
        .context("Skill vocabulary CSV has no 'skill' column")?;

    let mut skills = BTreeSet::new();
    for record in csv_reader.records() {
        let record = record.context("Failed to read CSV record")?;
        if let Some(raw) = record.get(skill_column) {
            let skill = raw.trim().to_lowercase();
            if !skill.is_empty() {
                skills.insert(skill);
            }
        }
    }
    Ok(skills.into_iter().collect())
}
