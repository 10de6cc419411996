use crate::content::CONTENT_PATH;
use crate::i18n::TRANSLATIONS_PATH;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Site source
    pub site_dir: PathBuf,
    pub site_base_url: Option<String>,
    pub page_file: String,
    pub content_path: String,
    pub translations_path: String,

    // Render
    pub preference_file: PathBuf,
    pub render_out_dir: PathBuf,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            site_dir: std::env::var("SITE_DIR")
                .unwrap_or_else(|_| "site".to_string())
                .into(),
            // When set, the JSON documents are fetched over HTTP instead of
            // read from SITE_DIR
            site_base_url: std::env::var("SITE_BASE_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            page_file: std::env::var("PAGE_FILE").unwrap_or_else(|_| "index.html".to_string()),
            content_path: std::env::var("CONTENT_PATH")
                .unwrap_or_else(|_| CONTENT_PATH.to_string()),
            translations_path: std::env::var("TRANSLATIONS_PATH")
                .unwrap_or_else(|_| TRANSLATIONS_PATH.to_string()),

            preference_file: std::env::var("PREFERENCE_FILE")
                .unwrap_or_else(|_| ".portfolio-preferences.json".to_string())
                .into(),
            render_out_dir: std::env::var("RENDER_OUT_DIR")
                .unwrap_or_else(|_| "dist".to_string())
                .into(),

            port: match std::env::var("PORT") {
                Ok(port) => port
                    .parse()
                    .with_context(|| format!("PORT must be a port number, got '{}'", port))?,
                Err(_) => 8080,
            },
        })
    }

    /// Path of the static page inside the site directory.
    pub fn page_path(&self) -> PathBuf {
        self.site_dir.join(&self.page_file)
    }
}
