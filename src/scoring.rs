// src/scoring.rs
//! Weighted multi-factor scoring of a candidate against a requirement

use crate::config::WeightConfig;
use crate::extraction::EducationLevel;
use crate::normalizer::{expand_synonyms, normalize};
use crate::profile::{CandidateProfile, RequirementProfile};
use crate::semantic::{NoSemantic, SemanticSimilarity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Per-factor sub-scores plus the weighted final score.
///
/// Each sub-score is in [0,1]. `final_score` is only bounded when the
/// caller supplies normalized weights; the engine computes whatever the
/// arithmetic yields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skill_match_ratio: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub semantic_score: f64,
    pub certification_score: f64,
    pub missing_skills: Vec<String>,
    pub final_score: f64,
}

/// Skill ratio over required skills. The candidate's skill phrases are
/// widened with their `[a-z0-9+#]` tokens (curated profiles and synonym
/// maps use the token convention, the extractor emits whole vocabulary
/// phrases) and then synonym-expanded. An empty requirement set yields
/// ratio 0.0: unstated requirements are neutral, not satisfied.
fn skill_scores(
    candidate: &CandidateProfile,
    requirement: &RequirementProfile,
) -> (f64, Vec<String>) {
    let mut skills: BTreeSet<String> = candidate.matched_skills.clone();
    skills.extend(
        candidate
            .matched_skills
            .iter()
            .flat_map(|phrase| normalize(phrase)),
    );
    let matched = expand_synonyms(skills, &requirement.synonyms);
    let required = &requirement.required_skills;
    let overlap = required.intersection(&matched).count();
    let ratio = overlap as f64 / required.len().max(1) as f64;
    let missing: Vec<String> = required.difference(&matched).cloned().collect();
    (ratio, missing)
}

/// Linear ramp toward the required years, capped at 1.0. A requirement of
/// zero years is satisfied by anyone.
fn experience_score(years_experience: u32, required_years: u32) -> f64 {
    if required_years == 0 {
        1.0
    } else {
        (f64::from(years_experience) / f64::from(required_years)).min(1.0)
    }
}

/// Three-tier education policy: meeting or exceeding the requirement is
/// 1.0; a Bachelor asked for a Master is the near-miss tier at 0.7; every
/// other shortfall gets the 0.4 floor.
fn education_score(candidate: EducationLevel, required: EducationLevel) -> f64 {
    if candidate >= required {
        1.0
    } else if candidate == EducationLevel::Bachelor && required == EducationLevel::Master {
        0.7
    } else {
        0.4
    }
}

/// Linear in certification count, saturating at 3.
fn certification_score(count: usize) -> f64 {
    (count as f64 / 3.0).min(1.0)
}

/// Scoring engine with an injected semantic similarity adapter.
///
/// Scoring is a pure function of its inputs; the engine itself holds no
/// per-candidate state and may be shared across a whole ranking run.
pub struct ScoringEngine<S = NoSemantic> {
    semantic: S,
}

impl ScoringEngine<NoSemantic> {
    pub fn new() -> Self {
        Self {
            semantic: NoSemantic,
        }
    }
}

impl Default for ScoringEngine<NoSemantic> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SemanticSimilarity> ScoringEngine<S> {
    pub fn with_semantic(semantic: S) -> Self {
        Self { semantic }
    }

    /// Score one candidate against one requirement.
    ///
    /// The semantic factor participates only when its weight is positive
    /// and both texts are supplied non-empty; an adapter failure counts as
    /// 0.0 and the rest of the score still computes.
    pub async fn score(
        &self,
        candidate: &CandidateProfile,
        requirement: &RequirementProfile,
        weights: &WeightConfig,
        resume_text: Option<&str>,
        jd_text: Option<&str>,
    ) -> ScoreBreakdown {
        let (skill_match_ratio, missing_skills) = skill_scores(candidate, requirement);
        let experience_score =
            experience_score(candidate.years_experience, requirement.required_years);
        let education_score =
            education_score(candidate.education, requirement.required_education);
        let certification_score = certification_score(candidate.certifications.len());

        let resume_text = resume_text.filter(|text| !text.is_empty());
        let jd_text = jd_text.filter(|text| !text.is_empty());
        let semantic_score = match (resume_text, jd_text) {
            (Some(resume), Some(jd)) if weights.embedding > 0.0 => {
                match self.semantic.similarity(resume, jd).await {
                    Ok(similarity) => similarity.clamp(0.0, 1.0),
                    Err(error) => {
                        warn!("Semantic similarity failed, scoring without it: {:#}", error);
                        0.0
                    }
                }
            }
            _ => 0.0,
        };

        let final_score = weights.skills * skill_match_ratio
            + weights.experience * experience_score
            + weights.education * education_score
            + weights.embedding * semantic_score
            + weights.certifications * certification_score;

        ScoreBreakdown {
            skill_match_ratio,
            experience_score,
            education_score,
            semantic_score,
            certification_score,
            missing_skills,
            final_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::BTreeSet;

    const EPS: f64 = 1e-9;

    struct FixedSimilarity(f64);

    impl SemanticSimilarity for FixedSimilarity {
        async fn similarity(&self, _a: &str, _b: &str) -> anyhow::Result<f64> {
            Ok(self.0)
        }
    }

    struct FailingSimilarity;

    impl SemanticSimilarity for FailingSimilarity {
        async fn similarity(&self, _a: &str, _b: &str) -> anyhow::Result<f64> {
            Err(anyhow!("embedding backend unavailable"))
        }
    }

    fn skills(entries: &[&str]) -> BTreeSet<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    fn candidate(matched: &[&str], years: u32, education: EducationLevel) -> CandidateProfile {
        CandidateProfile {
            matched_skills: skills(matched),
            years_experience: years,
            education,
            certifications: Vec::new(),
        }
    }

    fn requirement(required: &[&str], years: u32, education: EducationLevel) -> RequirementProfile {
        RequirementProfile {
            required_skills: skills(required),
            required_years: years,
            required_education: education,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_worked_example_underqualified() {
        let requirement = requirement(&["python", "sql"], 5, EducationLevel::Master);
        let candidate = candidate(&["python"], 3, EducationLevel::Unknown);
        let weights = WeightConfig {
            skills: 0.6,
            experience: 0.25,
            education: 0.15,
            embedding: 0.0,
            certifications: 0.0,
        };
        let breakdown = ScoringEngine::new()
            .score(&candidate, &requirement, &weights, None, None)
            .await;

        assert!((breakdown.skill_match_ratio - 0.5).abs() < EPS);
        assert!((breakdown.experience_score - 0.6).abs() < EPS);
        assert!((breakdown.education_score - 0.4).abs() < EPS);
        assert_eq!(breakdown.semantic_score, 0.0);
        assert_eq!(breakdown.missing_skills, vec!["sql".to_string()]);
        assert!((breakdown.final_score - 0.51).abs() < EPS);
    }

    #[tokio::test]
    async fn test_worked_example_fully_qualified_factors() {
        let requirement = requirement(&["python", "sql"], 5, EducationLevel::Master);
        let candidate = candidate(&["python"], 10, EducationLevel::Master);
        let weights = WeightConfig {
            skills: 0.6,
            experience: 0.25,
            education: 0.15,
            embedding: 0.0,
            certifications: 0.0,
        };
        let breakdown = ScoringEngine::new()
            .score(&candidate, &requirement, &weights, None, None)
            .await;

        assert!((breakdown.experience_score - 1.0).abs() < EPS);
        assert!((breakdown.education_score - 1.0).abs() < EPS);
        assert!((breakdown.final_score - 0.70).abs() < EPS);
    }

    #[tokio::test]
    async fn test_empty_requirement_skills_are_neutral() {
        let requirement = requirement(&[], 0, EducationLevel::Unknown);
        let candidate = candidate(&["python"], 2, EducationLevel::Bachelor);
        let breakdown = ScoringEngine::new()
            .score(&candidate, &requirement, &WeightConfig::default(), None, None)
            .await;

        assert_eq!(breakdown.skill_match_ratio, 0.0);
        assert!(breakdown.missing_skills.is_empty());
    }

    #[test]
    fn test_experience_caps_at_one() {
        assert_eq!(experience_score(10, 5), 1.0);
        assert_eq!(experience_score(5, 5), 1.0);
        assert!((experience_score(3, 5) - 0.6).abs() < EPS);
        assert_eq!(experience_score(0, 0), 1.0);
    }

    #[test]
    fn test_education_tier_table() {
        use EducationLevel::*;
        // Meeting or exceeding the requirement.
        for (candidate, required) in [
            (PhD, PhD),
            (PhD, Bachelor),
            (Master, Master),
            (Bachelor, Bachelor),
            (Unknown, Unknown),
        ] {
            assert_eq!(education_score(candidate, required), 1.0);
        }
        // The one near-miss tier.
        assert_eq!(education_score(Bachelor, Master), 0.7);
        // Everything else under-qualified gets the floor.
        for (candidate, required) in [
            (Unknown, Bachelor),
            (Unknown, Master),
            (Unknown, PhD),
            (Bachelor, PhD),
            (Master, PhD),
        ] {
            assert_eq!(education_score(candidate, required), 0.4);
        }
    }

    #[test]
    fn test_certification_saturation() {
        assert_eq!(certification_score(0), 0.0);
        assert!((certification_score(1) - 1.0 / 3.0).abs() < EPS);
        assert!((certification_score(2) - 2.0 / 3.0).abs() < EPS);
        assert_eq!(certification_score(3), 1.0);
        assert_eq!(certification_score(7), 1.0);
    }

    #[tokio::test]
    async fn test_synonyms_expand_candidate_skills() {
        let mut requirement = requirement(&["kubernetes"], 0, EducationLevel::Unknown);
        requirement.synonyms.insert(
            "kubernetes".to_string(),
            ["k8s".to_string()].into_iter().collect(),
        );
        let candidate = candidate(&["k8s"], 0, EducationLevel::Unknown);
        let breakdown = ScoringEngine::new()
            .score(&candidate, &requirement, &WeightConfig::default(), None, None)
            .await;

        assert_eq!(breakdown.skill_match_ratio, 1.0);
        assert!(breakdown.missing_skills.is_empty());
    }

    #[tokio::test]
    async fn test_curated_token_entries_match_phrase_skills() {
        use crate::config::CuratedProfile;
        // Curated profiles list skills at token level; a candidate whose
        // extractor emitted the whole phrase must still match.
        let curated = CuratedProfile {
            required: vec!["machine".to_string()],
            ..Default::default()
        };
        let requirement = RequirementProfile::from_curated(&curated);
        let candidate = candidate(&["machine learning"], 0, EducationLevel::Unknown);
        let breakdown = ScoringEngine::new()
            .score(&candidate, &requirement, &WeightConfig::default(), None, None)
            .await;

        assert_eq!(breakdown.skill_match_ratio, 1.0);
        assert!(breakdown.missing_skills.is_empty());
    }

    #[tokio::test]
    async fn test_token_level_synonyms_reach_phrase_skills() {
        use crate::config::CuratedProfile;
        use std::collections::BTreeMap;
        // Synonym maps keyed in token space apply to the tokens of a
        // phrase-level candidate skill.
        let mut synonyms = BTreeMap::new();
        synonyms.insert(
            "ml".to_string(),
            ["machine".to_string()].into_iter().collect(),
        );
        let curated = CuratedProfile {
            required: vec!["ml".to_string()],
            synonyms,
            ..Default::default()
        };
        let requirement = RequirementProfile::from_curated(&curated);
        let candidate = candidate(&["machine learning"], 0, EducationLevel::Unknown);
        let breakdown = ScoringEngine::new()
            .score(&candidate, &requirement, &WeightConfig::default(), None, None)
            .await;

        assert_eq!(breakdown.skill_match_ratio, 1.0);
    }

    #[tokio::test]
    async fn test_semantic_requires_weight_and_both_texts() {
        let requirement = requirement(&[], 0, EducationLevel::Unknown);
        let candidate = candidate(&[], 0, EducationLevel::Unknown);
        let engine = ScoringEngine::with_semantic(FixedSimilarity(0.9));

        let zero_weight = WeightConfig {
            embedding: 0.0,
            ..WeightConfig::default()
        };
        let breakdown = engine
            .score(&candidate, &requirement, &zero_weight, Some("a"), Some("b"))
            .await;
        assert_eq!(breakdown.semantic_score, 0.0);

        let weighted = WeightConfig {
            embedding: 0.2,
            ..WeightConfig::default()
        };
        let breakdown = engine
            .score(&candidate, &requirement, &weighted, Some("a"), None)
            .await;
        assert_eq!(breakdown.semantic_score, 0.0);

        let breakdown = engine
            .score(&candidate, &requirement, &weighted, Some(""), Some("b"))
            .await;
        assert_eq!(breakdown.semantic_score, 0.0);

        let breakdown = engine
            .score(&candidate, &requirement, &weighted, Some("a"), Some("b"))
            .await;
        assert!((breakdown.semantic_score - 0.9).abs() < EPS);
    }

    #[tokio::test]
    async fn test_semantic_failure_fails_open() {
        let requirement = requirement(&["python"], 2, EducationLevel::Bachelor);
        let candidate = candidate(&["python"], 2, EducationLevel::Bachelor);
        let weights = WeightConfig {
            skills: 0.5,
            experience: 0.2,
            education: 0.1,
            embedding: 0.2,
            certifications: 0.0,
        };
        let engine = ScoringEngine::with_semantic(FailingSimilarity);
        let breakdown = engine
            .score(&candidate, &requirement, &weights, Some("a"), Some("b"))
            .await;

        assert_eq!(breakdown.semantic_score, 0.0);
        assert!((breakdown.final_score - 0.8).abs() < EPS);
    }

    #[tokio::test]
    async fn test_semantic_result_is_clamped() {
        let requirement = requirement(&[], 0, EducationLevel::Unknown);
        let candidate = candidate(&[], 0, EducationLevel::Unknown);
        let weights = WeightConfig {
            embedding: 1.0,
            ..WeightConfig::default()
        };

        let engine = ScoringEngine::with_semantic(FixedSimilarity(1.7));
        let breakdown = engine
            .score(&candidate, &requirement, &weights, Some("a"), Some("b"))
            .await;
        assert_eq!(breakdown.semantic_score, 1.0);

        let engine = ScoringEngine::with_semantic(FixedSimilarity(-0.3));
        let breakdown = engine
            .score(&candidate, &requirement, &weights, Some("a"), Some("b"))
            .await;
        assert_eq!(breakdown.semantic_score, 0.0);
    }

    #[tokio::test]
    async fn test_certification_weighted_mode() {
        let requirement = requirement(&["python"], 0, EducationLevel::Unknown);
        let candidate = candidate(&["python"], 0, EducationLevel::Unknown)
            .with_certifications(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        let weights = WeightConfig::certification_aware();
        let breakdown = ScoringEngine::new()
            .score(&candidate, &requirement, &weights, None, None)
            .await;

        assert_eq!(breakdown.certification_score, 1.0);
        assert!(breakdown.final_score > 0.0);
    }

    #[tokio::test]
    async fn test_all_zero_inputs_stay_defined() {
        let requirement = RequirementProfile::default();
        let candidate = candidate(&[], 0, EducationLevel::Unknown);
        let breakdown = ScoringEngine::new()
            .score(&candidate, &requirement, &WeightConfig::default(), None, None)
            .await;

        assert!(breakdown.final_score.is_finite());
        assert_eq!(breakdown.skill_match_ratio, 0.0);
    }
}
