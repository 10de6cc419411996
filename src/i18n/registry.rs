//! Language registry: Single source of truth for the page's two languages.
//!
//! The registry is a lazily-initialized singleton (`OnceLock`) holding the
//! per-language metadata the translation binder needs beyond the dictionary
//! itself: the toggle label, the toggle's accessibility text, and the
//! resume file offered for download.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "pt", "en")
    pub code: &'static str,

    /// English name of the language (e.g., "Portuguese")
    pub name: &'static str,

    /// Native name of the language (e.g., "Português")
    pub native_name: &'static str,

    /// Whether this is the language used when no preference is stored
    pub is_default: bool,

    /// Short label the toggle shows when it offers a switch to this language
    pub toggle_label: &'static str,

    /// Accessibility text for a toggle offering a switch to this language,
    /// written in this language
    pub switch_prompt: &'static str,

    /// Resume linked from the hero section while this language is active
    pub resume_path: &'static str,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all languages, default first.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the default language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one default language
    /// (this indicates a configuration error).
    pub fn default_language(&self) -> &LanguageConfig {
        let defaults: Vec<_> = self.languages.iter().filter(|l| l.is_default).collect();

        match defaults.len() {
            0 => panic!("No default language found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default languages found in registry"),
        }
    }

    /// The language the toggle switches to from `code`.
    ///
    /// The page is bilingual, so this is simply the first other entry.
    pub fn other(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code != code)
    }
}

/// Portuguese (default) and English.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "pt",
            name: "Portuguese",
            native_name: "Português",
            is_default: true,
            toggle_label: "PT",
            switch_prompt: "Mudar para Português",
            resume_path: "assets/resume/CV_Pedro_Braga_Software_Engineer.pdf",
        },
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_default: false,
            toggle_label: "EN",
            switch_prompt: "Switch to English",
            resume_path: "assets/resume/Resume_Pedro_Braga_Software_Engineer.pdf",
        },
    ]
}
