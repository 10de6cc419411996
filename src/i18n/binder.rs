use super::table::{Binding, Mode, FIXED_BINDINGS};
use super::{Dictionary, Language};
use crate::dom::{Document, NodeId};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Attribute naming the dictionary key for an element.
pub const I18N_ATTRIBUTE: &str = "data-i18n";

/// Element id of the language toggle control.
pub const TOGGLE_ID: &str = "langToggle";

// `{name}` placeholders filled from the element's `data-name` attribute
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Counts of elements rewritten by one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub declarative: usize,
    pub fixed: usize,
}

/// Run the full translation pass for `lang`.
///
/// Declarative `data-i18n` elements first, then the fixed-selector table,
/// then the root `lang` attribute and the resume link.
pub fn apply_translations(doc: &mut Document, dict: &Dictionary<'_>, lang: Language) -> PassSummary {
    let summary = PassSummary {
        declarative: declarative_pass(doc, dict),
        fixed: fixed_pass(doc, dict, FIXED_BINDINGS),
    };

    if let Some(root) = doc.document_element() {
        doc.set_attr(root, "lang", lang.code());
    }
    if let Some(link) = doc.select(".hero__cta--secondary") {
        doc.set_attr(link, "href", lang.resume_path());
    }

    debug!(
        "Translation pass ({}): {} declarative, {} fixed",
        lang, summary.declarative, summary.fixed
    );
    summary
}

/// Point the toggle at the language it will switch to.
pub fn update_toggle(doc: &mut Document, lang: Language) {
    let Some(toggle) = doc.get_element_by_id(TOGGLE_ID) else {
        return;
    };
    if let Some(label) = doc.query_selector(toggle, "span") {
        doc.set_text_content(label, lang.toggle_label());
    }
    doc.set_attr(toggle, "aria-label", lang.toggle_aria_label());
}

/// Rewrite every `[data-i18n]` element whose key resolves to text.
///
/// Text replacement is wholesale: child markup inside a marked element is
/// dropped.
fn declarative_pass(doc: &mut Document, dict: &Dictionary<'_>) -> usize {
    let marked = doc.select_all(&format!("[{}]", I18N_ATTRIBUTE));
    let mut count = 0;

    for id in marked {
        let Some(key) = doc.attr(id, I18N_ATTRIBUTE).map(str::to_string) else {
            continue;
        };
        let Some(value) = dict.text(&key) else {
            debug!("No translation for '{}'", key);
            continue;
        };
        let Some(value) = interpolate(doc, id, value) else {
            debug!("Unfilled placeholder in '{}', keeping page text", key);
            continue;
        };
        if doc.has_attr(id, "placeholder") {
            doc.set_attr(id, "placeholder", &value);
        } else {
            doc.set_text_content(id, &value);
        }
        count += 1;
    }

    count
}

fn fixed_pass(doc: &mut Document, dict: &Dictionary<'_>, table: &[Binding]) -> usize {
    let mut count = 0;

    for binding in table {
        let targets = doc.select_all(binding.selector);
        if targets.is_empty() {
            continue;
        }

        match binding.mode {
            Mode::Attribute(name) => {
                let Some(value) = dict.attribute(binding.key) else {
                    continue;
                };
                for id in targets {
                    doc.set_attr(id, name, &value);
                    count += 1;
                }
            }
            Mode::Html => {
                let Some(value) = dict.text(binding.key) else {
                    continue;
                };
                for id in targets {
                    doc.set_inner_html(id, value);
                    count += 1;
                }
            }
            Mode::Text | Mode::KeepIcon => {
                let Some(value) = dict.text(binding.key) else {
                    continue;
                };
                for id in targets {
                    let Some(value) = interpolate(doc, id, value) else {
                        debug!("Unfilled placeholder in '{}', keeping page text", binding.key);
                        continue;
                    };
                    if binding.mode == Mode::KeepIcon {
                        set_text_keeping_icon(doc, id, &value);
                    } else {
                        doc.set_text_content(id, &value);
                    }
                    count += 1;
                }
            }
        }
    }

    count
}

/// Replace the text of `id`, re-appending its `svg` icon after the text.
fn set_text_keeping_icon(doc: &mut Document, id: NodeId, text: &str) {
    match doc.query_selector(id, "svg") {
        Some(icon) => {
            doc.detach(icon);
            doc.set_text_content(id, &format!("{} ", text));
            doc.append_child(id, icon);
        }
        None => doc.set_text_content(id, text),
    }
}

/// Fill `{name}` placeholders from the element's `data-name` attributes.
///
/// `None` if any placeholder has no matching attribute: the value is not
/// displayable and the element keeps its page text.
fn interpolate(doc: &Document, id: NodeId, text: &str) -> Option<String> {
    if !text.contains('{') {
        return Some(text.to_string());
    }
    let regex = PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\{([a-z][a-z0-9_-]*)\}").expect("placeholder regex"));

    let mut filled = String::with_capacity(text.len());
    let mut last = 0;
    for caps in regex.captures_iter(text) {
        let placeholder = caps.get(0)?;
        let value = doc.attr(id, &format!("data-{}", &caps[1]))?;
        filled.push_str(&text[last..placeholder.start()]);
        filled.push_str(value);
        last = placeholder.end();
    }
    filled.push_str(&text[last..]);
    Some(filled)
}
