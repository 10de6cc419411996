//! Loading the content and translation documents.
//!
//! Documents come either from a deployed site over HTTP or from a local site
//! directory. Loading never fails outward: every error is logged and turned
//! into `None`, which the binders treat as "keep the fallback markup".

use crate::config::Config;
use crate::content::{ContentDocument, CONTENT_PATH};
use crate::error::FetchError;
use crate::i18n::{TranslationDocument, TRANSLATIONS_PATH};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tracing::{info, warn};

/// Where documents are read from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// `GET {base_url}/{path}`; any non-2xx status is a failure.
    Http {
        client: reqwest::Client,
        base_url: String,
    },
    /// `{root}/{path}` on the local filesystem.
    Directory { root: PathBuf },
}

impl DocumentSource {
    pub fn http(base_url: &str) -> Self {
        Self::Http {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn directory(root: impl Into<PathBuf>) -> Self {
        Self::Directory { root: root.into() }
    }

    /// Human-readable location of `path` for log lines and errors.
    pub fn location(&self, path: &str) -> String {
        match self {
            Self::Http { base_url, .. } => format!("{}/{}", base_url, path.trim_start_matches('/')),
            Self::Directory { root } => root.join(path).display().to_string(),
        }
    }

    /// Fetch the raw body of `path`.
    pub async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let location = self.location(path);
        match self {
            Self::Http { client, .. } => {
                let response = client.get(&location).send().await.map_err(|source| {
                    FetchError::Transport {
                        url: location.clone(),
                        source,
                    }
                })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        url: location,
                        status,
                    });
                }

                response
                    .text()
                    .await
                    .map_err(|source| FetchError::Transport {
                        url: location,
                        source,
                    })
            }
            Self::Directory { .. } => tokio::fs::read_to_string(&location)
                .await
                .map_err(|source| FetchError::Io {
                    path: location,
                    source,
                }),
        }
    }

    /// Fetch `path` and parse it as JSON into `T`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let body = self.fetch(path).await?;
        serde_json::from_str(&body).map_err(|source| FetchError::Parse {
            location: self.location(path),
            source,
        })
    }
}

/// Loads the two documents a page session needs.
#[derive(Debug, Clone)]
pub struct Loader {
    source: DocumentSource,
    content_path: String,
    translations_path: String,
}

impl Loader {
    /// Loader using the default document paths.
    pub fn new(source: DocumentSource) -> Self {
        Self {
            source,
            content_path: CONTENT_PATH.to_string(),
            translations_path: TRANSLATIONS_PATH.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let source = match &config.site_base_url {
            Some(url) => DocumentSource::http(url),
            None => DocumentSource::directory(&config.site_dir),
        };
        Self::new(source).with_paths(&config.content_path, &config.translations_path)
    }

    pub fn with_paths(mut self, content_path: &str, translations_path: &str) -> Self {
        self.content_path = content_path.to_string();
        self.translations_path = translations_path.to_string();
        self
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    /// The content document, or `None` after logging why it is unavailable.
    pub async fn content(&self) -> Option<ContentDocument> {
        self.load(&self.content_path, "content").await
    }

    /// The translation dictionary, or `None` after logging why it is unavailable.
    pub async fn translations(&self) -> Option<TranslationDocument> {
        self.load(&self.translations_path, "translations").await
    }

    async fn load<T: DeserializeOwned>(&self, path: &str, what: &str) -> Option<T> {
        match self.source.fetch_json(path).await {
            Ok(document) => {
                info!("✓ Loaded {} from {}", what, self.source.location(path));
                Some(document)
            }
            Err(e) => {
                warn!("Failed to load {}, keeping page fallback: {}", what, e);
                None
            }
        }
    }
}
