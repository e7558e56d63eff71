// src/extraction/skills.rs
//! Phrase-level skill extraction against a fixed vocabulary

use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};
use std::collections::BTreeSet;

/// A skill extractor locates vocabulary entries mentioned in free text.
///
/// Returned strings are always the lowercased, trimmed vocabulary entries.
/// Multi-word entries must match as whole phrases; implementations must
/// respect token boundaries so "machine learning" never matches via
/// independent "machine" and "learning" hits.
pub trait SkillExtractor: Send + Sync {
    fn extract(&self, text: &str) -> BTreeSet<String>;
}

/// Default extractor backed by an Aho-Corasick automaton built once per
/// vocabulary and reused across every candidate in a run.
pub struct PhraseSkillExtractor {
    automaton: AhoCorasick,
    vocabulary: Vec<String>,
}

impl PhraseSkillExtractor {
    pub fn new(vocabulary: &[String]) -> Result<Self> {
        let vocabulary: Vec<String> = vocabulary
            .iter()
            .map(|entry| entry.trim().to_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();

        // Standard match kind: extraction walks overlapping hits, so a
        // vocabulary holding both "machine" and "machine learning" reports
        // every entry whose own token boundaries line up.
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&vocabulary)
            .context("Failed to build skill phrase automaton")?;

        Ok(Self {
            automaton,
            vocabulary,
        })
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }
}

/// Boundary class used to reject mid-token hits. Mirrors the tokenizer's
/// `[a-z0-9+#]` alphabet so "java" never matches inside "javascript" and
/// "c" never matches inside "c++".
fn is_boundary_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '#'
}

impl SkillExtractor for PhraseSkillExtractor {
    fn extract(&self, text: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for hit in self.automaton.find_overlapping_iter(text) {
            let before = text[..hit.start()].chars().next_back();
            let after = text[hit.end()..].chars().next();
            if before.is_some_and(is_boundary_token_char)
                || after.is_some_and(is_boundary_token_char)
            {
                continue;
            }
            found.insert(self.vocabulary[hit.pattern().as_usize()].clone());
        }
        found
    }
}
