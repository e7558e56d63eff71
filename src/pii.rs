// src/pii.rs
//! Masking of emails and phone numbers before résumé text is logged
//! or echoed into reports

use regex::Regex;
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
            .expect("invalid email pattern")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\+?\d[\d\-\s]{8,}\d").expect("invalid phone pattern"))
}

/// Replace emails with `[EMAIL]` and phone numbers with `[PHONE]`.
pub fn mask_pii(text: &str) -> String {
    let masked = email_pattern().replace_all(text, "[EMAIL]");
    phone_pattern().replace_all(&masked, "[PHONE]").into_owned()
}

pub fn extract_emails(text: &str) -> Vec<String> {
    email_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn extract_phones(text: &str) -> Vec<String> {
    phone_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
