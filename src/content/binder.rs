use super::{ContactCopy, ContentDocument, Credential, Education, Testimonial};
use crate::dom::{Document, NodeId};
use tracing::{debug, info};

/// Logo identifiers understood in `certifications[].logo`.
pub const LOGO_PATHS: &[(&str, &str)] = &[
    ("alura", "assets/icons/Alura.png"),
    ("efset", "assets/icons/EF_SET_logo.svg"),
];

/// Fallback badge text; the translation pass replaces it via `data-i18n`.
const IN_PROGRESS_BADGE: &str = "Em andamento";
const IN_PROGRESS_KEY: &str = "credentials.in_progress";

/// Which sections of the page were rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindSummary {
    pub credentials: usize,
    pub testimonial: bool,
    pub contact: bool,
    pub progress: Option<i64>,
    pub subjects: usize,
}

/// Inject every section present in `content` into the page.
///
/// Absent sections, empty sequences and missing anchors leave the static
/// markup untouched.
pub fn bind_content(doc: &mut Document, content: &ContentDocument) -> BindSummary {
    let mut summary = BindSummary::default();

    if let Some(credentials) = &content.certifications {
        summary.credentials = populate_credentials(doc, credentials);
    }
    if let Some(testimonials) = &content.testimonials {
        summary.testimonial = populate_testimonials(doc, testimonials);
    }
    if let Some(contact) = &content.contact {
        summary.contact = populate_contact(doc, contact);
    }
    if let Some(education) = &content.education {
        let (progress, subjects) = populate_education(doc, education);
        summary.progress = progress;
        summary.subjects = subjects;
    }

    info!("✓ Content bound: {:?}", summary);
    summary
}

/// `round(current / total * 100)` with halves rounded away from zero.
///
/// Computed in integers so `1/3 → 33`, `2/3 → 67` and `1/8 → 13` are exact.
/// Returns `None` when `total` is not positive or `current` is negative.
pub fn progress_percent(current: i64, total: i64) -> Option<i64> {
    if total <= 0 || current < 0 {
        return None;
    }
    let numerator = current.checked_mul(200)?.checked_add(total)?;
    Some(numerator / total.checked_mul(2)?)
}

fn populate_credentials(doc: &mut Document, credentials: &[Credential]) -> usize {
    let Some(container) = doc.get_element_by_id("credentialsList") else {
        debug!("#credentialsList not found, skipping credentials");
        return 0;
    };
    if credentials.is_empty() {
        return 0;
    }

    doc.clear_children(container);
    for credential in credentials {
        let item = credential_item(doc, credential);
        doc.append_child(container, item);
    }
    credentials.len()
}

fn credential_item(doc: &mut Document, credential: &Credential) -> NodeId {
    let li = element(doc, "li", &[("class", "credential-item")]);

    let mut link_class = String::from("credential-link");
    if credential.is_in_progress() {
        link_class.push_str(" credential-link--progress");
    }
    if credential.is_highlight {
        link_class.push_str(" credential-link--highlight");
    }
    let link = element(
        doc,
        "a",
        &[
            ("href", credential.credential_url.as_deref().unwrap_or("")),
            ("target", "_blank"),
            ("rel", "noopener noreferrer"),
            ("class", link_class.as_str()),
        ],
    );
    doc.append_child(li, link);

    let logo = credential
        .logo
        .as_deref()
        .and_then(|id| LOGO_PATHS.iter().find(|(key, _)| *key == id))
        .map(|(_, path)| *path);
    if let Some(src) = logo {
        let img = element(
            doc,
            "img",
            &[
                ("src", src),
                ("alt", credential.institution.as_deref().unwrap_or("")),
                ("class", "credential-logo-img"),
            ],
        );
        doc.append_child(link, img);
    }

    let info = element(doc, "div", &[("class", "credential-info")]);
    doc.append_child(link, info);

    let title = element(doc, "span", &[("class", "credential-title")]);
    append_text(doc, title, credential.title.as_deref().unwrap_or(""));
    if credential.is_in_progress() {
        append_text(doc, title, " ");
        let badge = element(
            doc,
            "span",
            &[("class", "credential-badge"), ("data-i18n", IN_PROGRESS_KEY)],
        );
        append_text(doc, badge, IN_PROGRESS_BADGE);
        doc.append_child(title, badge);
    }
    doc.append_child(info, title);

    let institution = element(doc, "span", &[("class", "credential-institution")]);
    append_text(doc, institution, credential.institution.as_deref().unwrap_or(""));
    if let Some(hours) = credential.hours.as_deref().filter(|h| !h.is_empty()) {
        append_text(doc, institution, " ");
        let badge = element(doc, "span", &[("class", "credential-hours")]);
        append_text(doc, badge, hours);
        doc.append_child(institution, badge);
    }
    doc.append_child(info, institution);

    let icon = external_link_icon(doc);
    doc.append_child(link, icon);

    li
}

fn external_link_icon(doc: &mut Document) -> NodeId {
    let svg = element(
        doc,
        "svg",
        &[
            ("class", "credential-icon"),
            ("xmlns", "http://www.w3.org/2000/svg"),
            ("viewBox", "0 0 24 24"),
            ("fill", "none"),
            ("stroke", "currentColor"),
            ("stroke-width", "2"),
            ("stroke-linecap", "round"),
            ("stroke-linejoin", "round"),
        ],
    );
    let path = element(
        doc,
        "path",
        &[("d", "M18 13v6a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h6")],
    );
    let polyline = element(doc, "polyline", &[("points", "15 3 21 3 21 9")]);
    let line = element(
        doc,
        "line",
        &[("x1", "10"), ("y1", "14"), ("x2", "21"), ("y2", "3")],
    );
    doc.append_child(svg, path);
    doc.append_child(svg, polyline);
    doc.append_child(svg, line);
    svg
}

/// Single-card design: only the first testimonial is shown.
fn populate_testimonials(doc: &mut Document, testimonials: &[Testimonial]) -> bool {
    let Some(container) = doc.select(".testimonials__grid") else {
        debug!(".testimonials__grid not found, skipping testimonials");
        return false;
    };
    let Some(testimonial) = testimonials.first() else {
        return false;
    };
    if testimonials.len() > 1 {
        debug!(
            "{} testimonials supplied, only the first is rendered",
            testimonials.len()
        );
    }

    if let (Some(el), Some(name)) = (
        doc.query_selector(container, ".testimonial-card__name"),
        testimonial.author_name.as_deref(),
    ) {
        doc.set_text_content(el, name);
    }
    if let (Some(el), Some(role)) = (
        doc.query_selector(container, ".testimonial-card__role"),
        testimonial.author_role.as_deref(),
    ) {
        doc.set_text_content(el, role);
    }
    if let (Some(el), Some(text)) = (
        doc.query_selector(container, ".testimonial-card__text"),
        testimonial.text.as_deref(),
    ) {
        doc.set_text_content(el, &format!("\"{}\"", text));
    }

    if let Some(avatar) = doc.query_selector(container, ".testimonial-card__avatar--photo") {
        if let Some(photo) = testimonial.photo() {
            doc.clear_children(avatar);
            let img = element(
                doc,
                "img",
                &[
                    ("src", photo),
                    ("alt", testimonial.author_name.as_deref().unwrap_or("")),
                    ("class", "avatar-image"),
                ],
            );
            doc.append_child(avatar, img);
        } else if let Some(initial) = testimonial.initial() {
            doc.clear_children(avatar);
            let span = element(doc, "span", &[("class", "avatar-initial")]);
            append_text(doc, span, &initial);
            doc.append_child(avatar, span);
        }
    }

    true
}

fn populate_contact(doc: &mut Document, contact: &ContactCopy) -> bool {
    let mut changed = false;
    if let (Some(el), Some(title)) = (
        doc.select(".contact .section-title"),
        contact.section_title.as_deref().filter(|t| !t.is_empty()),
    ) {
        doc.set_text_content(el, title);
        changed = true;
    }
    if let (Some(el), Some(subtitle)) = (
        doc.select(".contact__subtitle"),
        contact.section_subtitle.as_deref().filter(|t| !t.is_empty()),
    ) {
        doc.set_text_content(el, subtitle);
        changed = true;
    }
    changed
}

/// Returns the computed progress and the number of subject tags written.
fn populate_education(doc: &mut Document, education: &Education) -> (Option<i64>, usize) {
    let progress = match (education.current_semester, education.total_semesters) {
        (Some(current), Some(total)) => progress_percent(current, total),
        _ => None,
    };

    if let Some(percent) = progress {
        if let Some(bar) = doc.select(".education__progress-bar") {
            doc.set_style_property(bar, "width", &format!("{}%", percent));
        }
        // The translation pass formats the label from this attribute.
        if let Some(label) = doc.select(".education__progress-label") {
            doc.set_attr(label, "data-progress", &percent.to_string());
        }
    } else {
        debug!(
            "Education progress unavailable ({:?}/{:?})",
            education.current_semester, education.total_semesters
        );
    }

    if let (Some(el), Some(current)) = (
        doc.select(".education__detail-item:nth-child(2) span"),
        education.current_semester,
    ) {
        doc.set_attr(el, "data-semester", &current.to_string());
    }

    if let (Some(el), Some(year)) = (
        doc.select(".education__detail-expected span"),
        education.expected_year.as_deref(),
    ) {
        doc.set_attr(el, "data-expected", year);
    }

    let subjects = match education.subjects.as_deref() {
        None => {
            debug!("No subjects key, keeping static tags");
            0
        }
        Some([]) => {
            debug!("Empty subjects list, keeping static tags");
            0
        }
        Some(subjects) => match doc.select(".education__tags") {
            Some(container) => {
                doc.clear_children(container);
                for subject in subjects {
                    let tag = element(doc, "span", &[("class", "education__tag")]);
                    append_text(doc, tag, subject);
                    doc.append_child(container, tag);
                }
                subjects.len()
            }
            None => 0,
        },
    };

    if let Some(percent) = progress {
        info!(
            "✓ Education: {}/{} ({}%)",
            education.current_semester.unwrap_or_default(),
            education.total_semesters.unwrap_or_default(),
            percent
        );
    }

    (progress, subjects)
}

fn element(doc: &mut Document, name: &str, attrs: &[(&str, &str)]) -> NodeId {
    let node = doc.create_element(name);
    for (key, value) in attrs {
        doc.set_attr(node, key, value);
    }
    node
}

fn append_text(doc: &mut Document, parent: NodeId, text: &str) {
    if text.is_empty() {
        return;
    }
    let node = doc.create_text(text);
    doc.append_child(parent, node);
}
