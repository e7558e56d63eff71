use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cv_ranker::{
    load_skill_vocabulary, pii::mask_pii, rank_candidates, CandidateInput, CandidateProfile,
    FailedCandidate, HttpSemanticClient, PhraseSkillExtractor, RankerConfig, RequirementProfile,
    ScoreBreakdown, ScoringEngine, SemanticSimilarity, WeightConfig,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "cvrank")]
#[command(about = "Rank candidate résumés against a job description")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Ranker configuration file
    #[arg(long, default_value = "cvrank.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Rank a directory of plain-text résumés against a job description
    Rank {
        /// Job description text file
        #[arg(long)]
        jd: PathBuf,
        /// Directory of .txt résumés (one candidate per file)
        #[arg(long)]
        resumes: PathBuf,
    },
    /// Extract and print a candidate profile from a résumé file
    Profile { file: PathBuf },
    /// Parse and print the requirement profile of a job description
    Requirement { jd: PathBuf },
}

#[derive(Serialize)]
struct RankedEntry {
    id: String,
    /// PII-masked snippet of the résumé, for report readability only.
    excerpt: String,
    breakdown: ScoreBreakdown,
}

#[derive(Serialize)]
struct RankReport {
    requirement: RequirementProfile,
    weights: WeightConfig,
    ranked: Vec<RankedEntry>,
    failed: Vec<FailedCandidate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = RankerConfig::load(&cli.config)?;
    let vocabulary = load_skill_vocabulary(&config.vocabulary)?;
    let extractor = Arc::new(PhraseSkillExtractor::new(&vocabulary)?);
    info!(
        "Skill matcher ready with {} vocabulary entries",
        extractor.vocabulary().len()
    );

    match cli.command {
        Command::Rank { jd, resumes } => {
            let jd_text = read_text(&jd)?;
            let requirement = Arc::new(match &config.profile {
                Some(curated) => RequirementProfile::from_curated(curated),
                None => RequirementProfile::parse(&jd_text, extractor.as_ref()),
            });

            // Only stand the semantic adapter up when its weight
            // actually participates.
            let report = if config.weights.embedding > 0.0 {
                let client = HttpSemanticClient::new()?;
                run_rank(
                    &resumes,
                    requirement,
                    config.weights,
                    Arc::new(ScoringEngine::with_semantic(client)),
                    extractor,
                    Some(jd_text),
                )
                .await?
            } else {
                run_rank(
                    &resumes,
                    requirement,
                    config.weights,
                    Arc::new(ScoringEngine::new()),
                    extractor,
                    Some(jd_text),
                )
                .await?
            };

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Profile { file } => {
            let text = read_text(&file)?;
            let profile = CandidateProfile::extract(&text, extractor.as_ref());
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::Requirement { jd } => {
            let text = read_text(&jd)?;
            let requirement = RequirementProfile::parse(&text, extractor.as_ref());
            println!("{}", serde_json::to_string_pretty(&requirement)?);
        }
    }

    Ok(())
}

async fn run_rank<S: SemanticSimilarity + 'static>(
    resumes_dir: &Path,
    requirement: Arc<RequirementProfile>,
    weights: WeightConfig,
    engine: Arc<ScoringEngine<S>>,
    extractor: Arc<PhraseSkillExtractor>,
    jd_text: Option<String>,
) -> Result<RankReport> {
    let (candidates, mut unreadable) = collect_resumes(resumes_dir)?;
    info!(
        "Ranking {} résumés from {}",
        candidates.len(),
        resumes_dir.display()
    );

    let excerpts: BTreeMap<String, String> = candidates
        .iter()
        .map(|c| (c.id.clone(), excerpt(&c.text)))
        .collect();

    let requirement_for_report = (*requirement).clone();
    let outcome =
        rank_candidates(candidates, requirement, weights, engine, extractor, jd_text).await;

    let ranked = outcome
        .ranked
        .into_iter()
        .map(|candidate| RankedEntry {
            excerpt: excerpts.get(&candidate.id).cloned().unwrap_or_default(),
            id: candidate.id,
            breakdown: candidate.breakdown,
        })
        .collect();

    let mut failed = outcome.failed;
    failed.append(&mut unreadable);

    Ok(RankReport {
        requirement: requirement_for_report,
        weights,
        ranked,
        failed,
    })
}

fn excerpt(text: &str) -> String {
    mask_pii(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(160)
        .collect()
}

/// Gather .txt résumés in deterministic (sorted) order so tie-breaking is
/// reproducible. Files that cannot be read are reported as failed
/// candidates instead of aborting the run.
fn collect_resumes(dir: &Path) -> Result<(Vec<CandidateInput>, Vec<FailedCandidate>)> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read résumé directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    paths.sort();

    let mut candidates = Vec::new();
    let mut failed = Vec::new();
    for path in paths {
        let id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("resume")
            .to_string();
        match std::fs::read_to_string(&path) {
            Ok(text) => candidates.push(CandidateInput { id, text }),
            Err(error) => {
                warn!("Skipping unreadable résumé {}: {}", path.display(), error);
                failed.push(FailedCandidate {
                    id,
                    error: error.to_string(),
                });
            }
        }
    }
    Ok((candidates, failed))
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}
