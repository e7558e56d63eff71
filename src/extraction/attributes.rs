// src/extraction/attributes.rs
//! Years-of-experience and education-level extraction from free text

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Education levels on an ordinal scale. Derived `Ord` gives
/// Unknown < Bachelor < Master < PhD.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EducationLevel {
    #[default]
    Unknown,
    Bachelor,
    Master,
    PhD,
}

const PHD_TERMS: &[&str] = &["phd", "ph.d", "doctorate"];
const MASTER_TERMS: &[&str] = &[
    "master", "mtech", "m.tech", "m.e.", "m.sc", "ms", "m.s", "mca", "mba",
];
const BACHELOR_TERMS: &[&str] = &[
    "bachelor", "b.tech", "btech", "b.e.", "b.sc", "bs", "b.s", "bca",
];

fn years_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\+?\s+years?").expect("invalid years pattern"))
}

/// Scan text for "<n>[+] year(s)" mentions and return the maximum value
/// found, or 0 when nothing matches. Numbers too large to parse are
/// skipped rather than failing the extraction.
pub fn extract_years_experience(text: &str) -> u32 {
    let lowered = text.to_lowercase();
    let mut years = 0u32;
    for captures in years_pattern().captures_iter(&lowered) {
        if let Ok(value) = captures[1].parse::<u32>() {
            years = years.max(value);
        }
    }
    years
}

/// Classify the highest education level mentioned in the text.
///
/// Matching is exact-substring against fixed synonym lists, checked in
/// priority order PhD > Master > Bachelor so that a higher credential
/// dominates lower ones also present (e.g. a bachelor's listed en route
/// to a PhD).
pub fn extract_education(text: &str) -> EducationLevel {
    let lowered = text.to_lowercase();
    if PHD_TERMS.iter().any(|term| lowered.contains(term)) {
        return EducationLevel::PhD;
    }
    if MASTER_TERMS.iter().any(|term| lowered.contains(term)) {
        return EducationLevel::Master;
    }
    if BACHELOR_TERMS.iter().any(|term| lowered.contains(term)) {
        return EducationLevel::Bachelor;
    }
    EducationLevel::Unknown
}
