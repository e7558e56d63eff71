// src/ranking.rs
//! Batch ranking of candidates against one requirement profile

use crate::config::WeightConfig;
use crate::extraction::SkillExtractor;
use crate::profile::{CandidateProfile, RequirementProfile};
use crate::scoring::{ScoreBreakdown, ScoringEngine};
use crate::semantic::SemanticSimilarity;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub id: String,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedCandidate {
    pub id: String,
    pub error: String,
}

/// Result of a ranking run. Candidates that could not be processed are
/// reported separately; one bad input never blanks the whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub ranked: Vec<RankedCandidate>,
    pub failed: Vec<FailedCandidate>,
}

/// One résumé to rank: an opaque caller id plus the decoded plain text.
#[derive(Debug, Clone)]
pub struct CandidateInput {
    pub id: String,
    pub text: String,
}

/// Rank candidates against a requirement, descending by final score.
///
/// Each candidate is extracted and scored in its own task; there is no
/// cross-candidate dependency. Ties keep the input order (stable sort),
/// so callers should present candidates in a deterministic order.
pub async fn rank_candidates<S, X>(
    candidates: Vec<CandidateInput>,
    requirement: Arc<RequirementProfile>,
    weights: WeightConfig,
    engine: Arc<ScoringEngine<S>>,
    extractor: Arc<X>,
    jd_text: Option<String>,
) -> RankingOutcome
where
    S: SemanticSimilarity + 'static,
    X: SkillExtractor + 'static,
{
    let total = candidates.len();
    let jd_text: Option<Arc<str>> = jd_text.map(Arc::from);

    let mut tasks: JoinSet<(usize, String, Result<ScoreBreakdown, String>)> = JoinSet::new();
    for (index, candidate) in candidates.into_iter().enumerate() {
        let requirement = Arc::clone(&requirement);
        let engine = Arc::clone(&engine);
        let extractor = Arc::clone(&extractor);
        let jd_text = jd_text.clone();

        tasks.spawn(async move {
            if candidate.text.trim().is_empty() {
                return (
                    index,
                    candidate.id,
                    Err("empty or unreadable résumé text".to_string()),
                );
            }
            let profile = CandidateProfile::extract(&candidate.text, extractor.as_ref());
            let breakdown = engine
                .score(
                    &profile,
                    &requirement,
                    &weights,
                    Some(candidate.text.as_str()),
                    jd_text.as_deref(),
                )
                .await;
            (index, candidate.id, Ok(breakdown))
        });
    }

    let mut scored: Vec<(usize, RankedCandidate)> = Vec::new();
    let mut failed: Vec<(usize, FailedCandidate)> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, id, Ok(breakdown))) => {
                scored.push((index, RankedCandidate { id, breakdown }));
            }
            Ok((index, id, Err(message))) => {
                error!("Candidate '{}' failed: {}", id, message);
                failed.push((index, FailedCandidate { id, error: message }));
            }
            Err(join_error) => {
                error!("Ranking task panicked: {}", join_error);
            }
        }
    }

    // Restore input order, then stable-sort descending so ties keep it.
    scored.sort_by_key(|(index, _)| *index);
    failed.sort_by_key(|(index, _)| *index);
    let mut ranked: Vec<RankedCandidate> = scored.into_iter().map(|(_, c)| c).collect();
    ranked.sort_by(|a, b| {
        b.breakdown
            .final_score
            .partial_cmp(&a.breakdown.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let failed: Vec<FailedCandidate> = failed.into_iter().map(|(_, c)| c).collect();

    info!(
        "Ranked {} of {} candidates ({} failed)",
        ranked.len(),
        total,
        failed.len()
    );

    RankingOutcome { ranked, failed }
}
