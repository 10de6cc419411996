//! Translation document and dot-path key resolution.

use super::Language;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Default location of the translation document, relative to the site root.
pub const TRANSLATIONS_PATH: &str = "data/translations.json";

/// Translation document: language code → nested key tree.
///
/// No schema is enforced. A language whose subtree is not an object is
/// treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct TranslationDocument {
    languages: Map<String, Value>,
}

impl TranslationDocument {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(languages) => Some(Self { languages }),
            _ => None,
        }
    }

    /// Dictionary for `lang`, if the document has an object subtree for it.
    pub fn dictionary(&self, lang: Language) -> Option<Dictionary<'_>> {
        self.languages
            .get(lang.code())
            .filter(|tree| tree.is_object())
            .map(Dictionary::new)
    }

    /// Language codes present in the document.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }
}

/// One language's key tree.
#[derive(Debug, Clone, Copy)]
pub struct Dictionary<'a> {
    root: &'a Value,
}

impl<'a> Dictionary<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// Walk a dot-separated path (`"nav.about"`). Numeric segments index
    /// into arrays. Any missing segment yields `None`.
    pub fn resolve(&self, path: &str) -> Option<&'a Value> {
        if path.is_empty() {
            return None;
        }
        path.split('.').try_fold(self.root, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Non-empty string at `path`.
    pub fn text(&self, path: &str) -> Option<&'a str> {
        self.resolve(path)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }

    /// Value for an attribute target: a non-empty string as-is, a non-empty
    /// list of strings as a JSON array (the typewriter's `data-words`
    /// format), a number as its decimal text.
    pub fn attribute(&self, path: &str) -> Option<String> {
        match self.resolve(path)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items)
                if !items.is_empty() && items.iter().all(Value::is_string) =>
            {
                serde_json::to_string(items).ok()
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Every leaf path below the root, sorted.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_leaves(self.root, String::new(), &mut paths);
        paths.sort();
        paths
    }
}

fn collect_leaves(node: &Value, prefix: String, out: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                collect_leaves(child, path, out);
            }
        }
        _ if !prefix.is_empty() => out.push(prefix),
        _ => {}
    }
}
