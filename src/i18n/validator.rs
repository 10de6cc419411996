//! Dictionary coverage validation.
//!
//! Checks a translation document against the supported languages and the
//! fixed-selector table so gaps show up at render time instead of as
//! untranslated text on the live page. Nothing here blocks a render: the
//! binder already leaves unresolved elements untouched.

use super::table::{Mode, FIXED_BINDINGS};
use super::{Language, TranslationDocument};
use std::collections::BTreeSet;

/// Validation report containing errors and warnings about a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// A supported language is missing entirely
    pub errors: Vec<String>,

    /// Keys that resolve in one language only, or table keys that resolve
    /// nowhere
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DictionaryValidator;

impl DictionaryValidator {
    /// Validate `translations` for every supported language.
    ///
    /// Errors: a language without an object subtree.
    /// Warnings: leaf keys present in some languages but not others, and
    /// fixed-table keys a language cannot resolve for its binding mode.
    pub fn validate(translations: &TranslationDocument) -> ValidationReport {
        let mut report = ValidationReport::new();

        let mut present = Vec::new();
        for lang in Language::all() {
            match translations.dictionary(lang) {
                Some(dict) => present.push((lang, dict)),
                None => report
                    .errors
                    .push(format!("Missing dictionary for language '{}'", lang)),
            }
        }

        let leaves: Vec<(Language, BTreeSet<String>)> = present
            .iter()
            .map(|(lang, dict)| (*lang, dict.leaf_paths().into_iter().collect()))
            .collect();
        for (lang, keys) in &leaves {
            for (other, other_keys) in &leaves {
                if other == lang {
                    continue;
                }
                for key in keys.difference(other_keys) {
                    report
                        .warnings
                        .push(format!("Key '{}' present in '{}' but not in '{}'", key, lang, other));
                }
            }
        }

        for (lang, dict) in &present {
            for binding in FIXED_BINDINGS {
                let resolved = match binding.mode {
                    Mode::Attribute(_) => dict.attribute(binding.key).is_some(),
                    _ => dict.text(binding.key).is_some(),
                };
                if !resolved {
                    report.warnings.push(format!(
                        "No '{}' translation for '{}' ({})",
                        lang, binding.key, binding.selector
                    ));
                }
            }
        }

        report
    }
}
