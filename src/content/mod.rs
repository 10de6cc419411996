//! Page content document and the binder that injects it into the page.
//!
//! The document is a loosely-typed JSON file edited by hand. Every field is
//! optional at every level and scalar fields accept whatever JSON scalar the
//! author wrote, so a number where a string was expected still renders
//! instead of failing the whole document.

mod binder;
mod lenient;

pub use binder::{bind_content, progress_percent, BindSummary, LOGO_PATHS};

use serde::Deserialize;

/// Default location of the content document, relative to the site root.
pub const CONTENT_PATH: &str = "data/content.json";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    #[serde(default)]
    pub certifications: Option<Vec<Credential>>,
    #[serde(default)]
    pub testimonials: Option<Vec<Testimonial>>,
    #[serde(default)]
    pub contact: Option<ContactCopy>,
    #[serde(default)]
    pub education: Option<Education>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub credential_url: Option<String>,
    /// Identifier looked up in [`LOGO_PATHS`].
    #[serde(default, deserialize_with = "lenient::string")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub hours: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    /// Only a literal JSON `true` counts.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_highlight: bool,
}

impl Credential {
    pub fn is_in_progress(&self) -> bool {
        self.status.as_deref() == Some("in-progress")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(default, deserialize_with = "lenient::string")]
    pub author_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub author_role: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub author_photo: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub author_initial: Option<String>,
}

impl Testimonial {
    /// Photo URL if one is given and not blank.
    pub fn photo(&self) -> Option<&str> {
        self.author_photo
            .as_deref()
            .filter(|photo| !photo.trim().is_empty())
    }

    /// Explicit initial, else the first character of the author's name.
    pub fn initial(&self) -> Option<String> {
        match self.author_initial.as_deref() {
            Some(initial) if !initial.is_empty() => Some(initial.to_string()),
            _ => self
                .author_name
                .as_deref()
                .and_then(|name| name.chars().next())
                .map(String::from),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCopy {
    #[serde(default, deserialize_with = "lenient::string")]
    pub section_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub section_subtitle: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub current_semester: Option<i64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub total_semesters: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub expected_year: Option<String>,
    /// `None` when the key is absent, `Some(vec![])` when given empty.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub subjects: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_document() {
        let json = r#"{
            "certifications": [
                {"title": "Java", "institution": "Alura", "credentialUrl": "https://x", "logo": "alura",
                 "hours": 40, "status": "in-progress", "isHighlight": true}
            ],
            "testimonials": [{"authorName": "Ana", "authorRole": "CTO", "text": "Great"}],
            "contact": {"sectionTitle": "Contato"},
            "education": {"currentSemester": 5, "totalSemesters": 10, "expectedYear": 2027,
                          "subjects": ["Algoritmos", "Redes"]}
        }"#;

        let doc: ContentDocument = serde_json::from_str(json).expect("valid document");

        let cert = &doc.certifications.as_ref().unwrap()[0];
        assert_eq!(cert.title.as_deref(), Some("Java"));
        assert_eq!(cert.hours.as_deref(), Some("40"));
        assert!(cert.is_in_progress());
        assert!(cert.is_highlight);

        let education = doc.education.unwrap();
        assert_eq!(education.current_semester, Some(5));
        assert_eq!(education.expected_year.as_deref(), Some("2027"));
        assert_eq!(
            education.subjects,
            Some(vec!["Algoritmos".to_string(), "Redes".to_string()])
        );
        assert_eq!(doc.contact.unwrap().section_subtitle, None);
    }

    #[test]
    fn test_empty_object_is_valid() {
        let doc: ContentDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, ContentDocument::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let doc: ContentDocument =
            serde_json::from_str(r#"{"projects": [], "contact": {"email": "x"}}"#).unwrap();
        assert!(doc.contact.is_some());
    }

    #[test]
    fn test_highlight_requires_literal_true() {
        let truthy: Credential = serde_json::from_str(r#"{"isHighlight": "true"}"#).unwrap();
        assert!(!truthy.is_highlight);
        let real: Credential = serde_json::from_str(r#"{"isHighlight": true}"#).unwrap();
        assert!(real.is_highlight);
    }

    #[test]
    fn test_status_other_than_in_progress() {
        let cert: Credential = serde_json::from_str(r#"{"status": "done"}"#).unwrap();
        assert!(!cert.is_in_progress());
    }

    #[test]
    fn test_subjects_absent_vs_empty() {
        let absent: Education = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.subjects, None);
        let empty: Education = serde_json::from_str(r#"{"subjects": []}"#).unwrap();
        assert_eq!(empty.subjects, Some(vec![]));
    }

    #[test]
    fn test_testimonial_initial_fallbacks() {
        let explicit = Testimonial {
            author_name: Some("Maria".to_string()),
            author_initial: Some("X".to_string()),
            ..Default::default()
        };
        assert_eq!(explicit.initial().as_deref(), Some("X"));

        let from_name = Testimonial {
            author_name: Some("Élise".to_string()),
            ..Default::default()
        };
        assert_eq!(from_name.initial().as_deref(), Some("É"));

        assert_eq!(Testimonial::default().initial(), None);
    }

    #[test]
    fn test_blank_photo_is_ignored() {
        let t = Testimonial {
            author_photo: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(t.photo(), None);
    }
}
