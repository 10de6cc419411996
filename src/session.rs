//! Page startup coordinator.
//!
//! One `PageSession` per page load. It fetches both documents, then runs the
//! content binder, then the translation binder, so translated text always
//! wins over injected content. After startup it owns the active language and
//! the dictionary for later toggles.

use crate::content::{bind_content, ContentDocument};
use crate::dom::Document;
use crate::i18n::{
    apply_translations, resolve_language, update_toggle, Language, PassSummary, PreferenceStore,
    TranslationDocument,
};
use crate::source::Loader;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct PageSession {
    language: Language,
    translations: Option<TranslationDocument>,
}

impl PageSession {
    /// Fetch both documents concurrently, then bind them into `doc`.
    pub async fn start(loader: &Loader, doc: &mut Document, prefs: &dyn PreferenceStore) -> Self {
        let (content, translations) = tokio::join!(loader.content(), loader.translations());
        Self::hydrate(doc, content.as_ref(), translations, prefs)
    }

    /// Bind already-loaded documents: content first, then translations.
    pub fn hydrate(
        doc: &mut Document,
        content: Option<&ContentDocument>,
        translations: Option<TranslationDocument>,
        prefs: &dyn PreferenceStore,
    ) -> Self {
        if let Some(content) = content {
            bind_content(doc, content);
        }

        let session = Self {
            language: resolve_language(prefs),
            translations,
        };
        if session.apply(doc).is_some() {
            info!("✓ i18n initialized ({})", session.language.code().to_uppercase());
        }
        session
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn translations(&self) -> Option<&TranslationDocument> {
        self.translations.as_ref()
    }

    /// Run the translation pass for the active language.
    ///
    /// Without a dictionary the page keeps its fallback text. A dictionary
    /// lacking the active language still updates the toggle. Returns `None`
    /// when the pass did not run.
    pub fn apply(&self, doc: &mut Document) -> Option<PassSummary> {
        let translations = self.translations.as_ref()?;

        let summary = match translations.dictionary(self.language) {
            Some(dict) => Some(apply_translations(doc, &dict, self.language)),
            None => {
                warn!("No translations for '{}', skipping pass", self.language);
                None
            }
        };
        update_toggle(doc, self.language);
        summary
    }

    /// Flip to the other language, persist it and re-run the pass.
    ///
    /// Inert when no dictionary was loaded; returns the new language
    /// otherwise.
    pub fn toggle(&mut self, doc: &mut Document, prefs: &mut dyn PreferenceStore) -> Option<Language> {
        if self.translations.is_none() {
            debug!("Toggle ignored: no translations loaded");
            return None;
        }
        let next = self.language.other();
        self.set_language(doc, next, prefs);
        Some(next)
    }

    /// Switch to `lang`, persist it and re-run the pass.
    pub fn set_language(&mut self, doc: &mut Document, lang: Language, prefs: &mut dyn PreferenceStore) {
        if let Err(e) = prefs.save(lang.code()) {
            warn!("Failed to persist language preference: {}", e);
        }
        self.language = lang;
        self.apply(doc);
    }
}
