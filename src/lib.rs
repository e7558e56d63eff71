//! Résumé ranking core: extract structured profiles from free text and
//! score candidates against a job description's requirements.
//!
//! The pipeline is: raw text goes through the normalizer and extractors
//! into a [`CandidateProfile`] / [`RequirementProfile`] pair, which the
//! [`ScoringEngine`] blends into a weighted [`ScoreBreakdown`];
//! [`rank_candidates`] runs that per candidate and sorts the batch.

pub mod config;
pub mod extraction;
pub mod normalizer;
pub mod pii;
pub mod profile;
pub mod ranking;
pub mod scoring;
pub mod semantic;

pub use config::{load_skill_vocabulary, CuratedProfile, RankerConfig, WeightConfig};
pub use extraction::{EducationLevel, PhraseSkillExtractor, SkillExtractor};
pub use profile::{CandidateProfile, RequirementProfile};
pub use ranking::{rank_candidates, CandidateInput, FailedCandidate, RankedCandidate, RankingOutcome};
pub use scoring::{ScoreBreakdown, ScoringEngine};
pub use semantic::{HttpSemanticClient, NoSemantic, SemanticSimilarity};
