// src/extraction/mod.rs
//! Attribute and skill extraction over raw résumé / job-description text

pub mod attributes;
pub mod skills;

pub use attributes::{extract_education, extract_years_experience, EducationLevel};
pub use skills::{PhraseSkillExtractor, SkillExtractor};
