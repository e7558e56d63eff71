// src/normalizer.rs
//! Canonical tokenization and synonym expansion for skill matching

use std::collections::{BTreeMap, BTreeSet};

/// Characters that survive tokenization. `+` and `#` are kept so that
/// tokens like "c++" and "c#" stay intact.
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '+' || c == '#'
}

/// Lowercase the input, replace everything outside `[a-z0-9+#]` with
/// whitespace, and split. Empty input yields an empty sequence.
pub fn normalize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if is_token_char(c) { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Expand a token set through a synonym map.
///
/// The map goes from canonical skill name to its synonyms. Expansion is
/// bidirectional: a token that is a synonym contributes its canonical name,
/// and a token that is a canonical key contributes all of its synonyms.
/// Expansion is single-hop only: newly added tokens are never re-expanded.
pub fn expand_synonyms(
    tokens: impl IntoIterator<Item = String>,
    synonyms: &BTreeMap<String, BTreeSet<String>>,
) -> BTreeSet<String> {
    let mut expanded: BTreeSet<String> = tokens.into_iter().collect();

    let mut reverse: BTreeMap<&str, &str> = BTreeMap::new();
    for (canonical, syns) in synonyms {
        for syn in syns {
            reverse.insert(syn.as_str(), canonical.as_str());
        }
    }

    let snapshot: Vec<String> = expanded.iter().cloned().collect();
    for token in &snapshot {
        if let Some(canonical) = reverse.get(token.as_str()) {
            expanded.insert((*canonical).to_string());
        }
        if let Some(syns) = synonyms.get(token) {
            expanded.extend(syns.iter().cloned());
        }
    }

    expanded
}
