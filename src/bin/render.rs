//! Render binary - writes the hydrated page for static hosting
//!
//! Usage:
//!   cargo run --bin render              # Stored language (or default) → dist/index.html
//!   cargo run --bin render -- --toggle  # Flip the stored language, then render
//!   cargo run --bin render -- --all     # Every language → dist/<code>/index.html
//!
//! Optional environment variables:
//! - SITE_DIR (defaults to site)
//! - SITE_BASE_URL (fetch documents over HTTP instead of from SITE_DIR)
//! - PREFERENCE_FILE (defaults to .portfolio-preferences.json)
//! - RENDER_OUT_DIR (defaults to dist)

use anyhow::{Context, Result};
use portfolio_binder::config::Config;
use portfolio_binder::content::ContentDocument;
use portfolio_binder::dom::Document;
use portfolio_binder::i18n::{
    DictionaryValidator, FilePreferences, Language, MemoryPreferences, PreferenceStore,
    TranslationDocument,
};
use portfolio_binder::session::PageSession;
use portfolio_binder::source::Loader;
use std::path::Path;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_binder=info".parse()?)
                .add_directive("render=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let render_all = args.iter().any(|a| a == "--all");
    let toggle = args.iter().any(|a| a == "--toggle");

    info!("Loading configuration...");
    let config = Config::from_env()?;
    let page_path = config.page_path();
    let markup = tokio::fs::read_to_string(&page_path)
        .await
        .with_context(|| format!("Failed to read page {}", page_path.display()))?;

    let loader = Loader::from_config(&config);
    let (content, translations) = tokio::join!(loader.content(), loader.translations());

    if let Some(translations) = &translations {
        report_coverage(translations);
    }

    tokio::fs::create_dir_all(&config.render_out_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.render_out_dir.display()))?;

    if render_all {
        for lang in Language::all() {
            let prefs = MemoryPreferences::with_code(lang.code());
            let mut doc = Document::parse(&markup);
            PageSession::hydrate(&mut doc, content.as_ref(), translations.clone(), &prefs);

            let target = config.render_out_dir.join(lang.code()).join("index.html");
            write_page(&target, &doc).await?;
            if lang.is_default() {
                write_page(&config.render_out_dir.join("index.html"), &doc).await?;
            }
        }
        return Ok(());
    }

    let mut prefs = FilePreferences::new(&config.preference_file);
    let doc = render_one(&markup, content.as_ref(), translations, &mut prefs, toggle);
    write_page(&config.render_out_dir.join("index.html"), &doc).await
}

fn render_one(
    markup: &str,
    content: Option<&ContentDocument>,
    translations: Option<TranslationDocument>,
    prefs: &mut dyn PreferenceStore,
    toggle: bool,
) -> Document {
    let mut doc = Document::parse(markup);
    let mut session = PageSession::hydrate(&mut doc, content, translations, &*prefs);

    if toggle {
        match session.toggle(&mut doc, prefs) {
            Some(lang) => info!("Switched to {}", lang.native_name()),
            None => warn!("No translations loaded, language unchanged"),
        }
    }
    info!("Rendered page in {}", session.language().name());
    doc
}

fn report_coverage(translations: &TranslationDocument) {
    let report = DictionaryValidator::validate(translations);
    for e in &report.errors {
        error!("Translation coverage: {}", e);
    }
    for w in &report.warnings {
        warn!("Translation coverage: {}", w);
    }
    if report.is_clean() {
        info!("✓ Translations cover every language and fixed binding");
    }
}

async fn write_page(path: &Path, doc: &Document) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, doc.to_html())
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("💾 Saved to: {}", path.display());
    Ok(())
}
