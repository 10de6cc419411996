//! Bilingual text layer.
//!
//! # Architecture
//!
//! - `registry`: the two supported languages and their metadata
//! - `language`: validated `Language` handle over the registry
//! - `dictionary`: translation document and dot-path key resolution
//! - `table`: fixed-selector bindings for elements without `data-i18n`
//! - `binder`: the translation pass over a parsed page
//! - `preference`: persisted language choice (memory, file, cookie)
//! - `validator`: dictionary coverage checks
//!
//! # Example
//!
//! ```rust,ignore
//! use portfolio_binder::i18n::{apply_translations, resolve_language, FilePreferences};
//!
//! let lang = resolve_language(&FilePreferences::new(".portfolio-preferences.json"));
//! if let Some(dict) = translations.dictionary(lang) {
//!     apply_translations(&mut page, &dict, lang);
//! }
//! ```

mod binder;
mod dictionary;
mod language;
mod preference;
mod registry;
mod table;
mod validator;

pub use binder::{apply_translations, update_toggle, PassSummary, I18N_ATTRIBUTE, TOGGLE_ID};
pub use dictionary::{Dictionary, TranslationDocument, TRANSLATIONS_PATH};
pub use language::Language;
pub use preference::{
    resolve_language, CookiePreferences, FilePreferences, MemoryPreferences, PreferenceStore,
    COOKIE_MAX_AGE, STORAGE_KEY,
};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use table::{Binding, Mode, FIXED_BINDINGS};
pub use validator::{DictionaryValidator, ValidationReport};
