//! Integration tests for the portfolio binder
//!
//! These tests hydrate the sample site under `tests/fixtures/site` end to end:
//! both documents loaded, content bound, translations applied, and the
//! language toggled through the session and through the HTTP server.

use std::path::PathBuf;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use portfolio_binder::{
    content::ContentDocument,
    dom::Document,
    i18n::{DictionaryValidator, Language, MemoryPreferences, TranslationDocument},
    server::{router, AppState},
    session::PageSession,
    source::{DocumentSource, Loader},
};

// ==================== Test Helpers ====================

fn site_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/site")
}

fn page() -> Document {
    let markup = std::fs::read_to_string(site_dir().join("index.html")).expect("fixture page");
    Document::parse(&markup)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(site_dir().join("data").join(name)).expect("fixture document")
}

fn text_of(doc: &Document, selector: &str) -> String {
    let node = doc
        .select(selector)
        .unwrap_or_else(|| panic!("'{}' should match", selector));
    doc.text_content(node)
}

fn attr_of<'a>(doc: &'a Document, selector: &str, name: &str) -> Option<&'a str> {
    doc.select(selector).and_then(|node| doc.attr(node, name))
}

async fn hydrated(lang: Option<&str>) -> (Document, PageSession) {
    let loader = Loader::new(DocumentSource::directory(site_dir()));
    let prefs = match lang {
        Some(code) => MemoryPreferences::with_code(code),
        None => MemoryPreferences::new(),
    };
    let mut doc = page();
    let session = PageSession::start(&loader, &mut doc, &prefs).await;
    (doc, session)
}

// ==================== Full Pipeline ====================

#[tokio::test]
async fn test_full_hydration_in_default_language() {
    let (doc, session) = hydrated(None).await;
    assert_eq!(session.language(), Language::PORTUGUESE);

    // Credentials: fully replaced, in input order, flags composed
    let items = doc.select_all("#credentialsList > li");
    assert_eq!(items.len(), 2);
    assert_eq!(
        attr_of(&doc, "#credentialsList li:first-child a", "class"),
        Some("credential-link credential-link--progress credential-link--highlight")
    );
    assert_eq!(
        attr_of(&doc, "#credentialsList li:first-child img", "src"),
        Some("assets/icons/Alura.png")
    );
    assert_eq!(
        attr_of(&doc, "#credentialsList li:nth-child(2) img", "src"),
        Some("assets/icons/EF_SET_logo.svg")
    );
    assert_eq!(text_of(&doc, ".credential-badge"), "Em andamento");
    assert_eq!(text_of(&doc, ".credential-hours"), "40h");

    // Testimonial: first only, quoted, initial avatar
    assert_eq!(text_of(&doc, ".testimonial-card__name"), "Marina Costa");
    assert_eq!(text_of(&doc, ".testimonial-card__text"), "\"Entrega com qualidade.\"");
    assert_eq!(text_of(&doc, ".avatar-initial"), "M");
    assert!(!doc.to_html().contains("Not rendered."));

    // Contact: subtitle from content, title untouched by content
    assert_eq!(text_of(&doc, ".contact__subtitle"), "Respondo em até 24 horas.");

    // Education: progress, interpolated labels, tags
    assert_eq!(
        attr_of(&doc, ".education__progress-bar", "style"),
        Some("width: 50%")
    );
    assert_eq!(text_of(&doc, ".education__progress-label"), "50% concluído");
    assert_eq!(text_of(&doc, r#"[data-i18n="education.semester_of"]"#), "5º semestre");
    assert_eq!(
        attr_of(&doc, ".education__detail-expected span", "data-expected"),
        Some("2027")
    );
    let tags: Vec<String> = doc
        .select_all(".education__tags .education__tag")
        .into_iter()
        .map(|tag| doc.text_content(tag))
        .collect();
    assert_eq!(tags, vec!["Algoritmos", "Banco de Dados", "Redes"]);
}

#[tokio::test]
async fn test_full_hydration_in_english() {
    let (doc, session) = hydrated(Some("en")).await;
    assert_eq!(session.language(), Language::ENGLISH);

    assert_eq!(attr_of(&doc, "html", "lang"), Some("en"));
    assert_eq!(text_of(&doc, r##".nav__link[href="#about"]"##), "About");
    assert_eq!(text_of(&doc, ".credential-badge"), "In progress");
    assert_eq!(text_of(&doc, ".education__progress-label"), "50% complete");
    assert_eq!(text_of(&doc, r#"[data-i18n="education.semester_of"]"#), "Semester 5");
    assert_eq!(text_of(&doc, "#contact .section-title"), "Let's talk");
    assert_eq!(attr_of(&doc, "#name", "placeholder"), Some("Your name"));
    assert_eq!(
        attr_of(&doc, ".hero__title .txt-type", "data-words"),
        Some(r#"["Developer","Software Engineer"]"#)
    );
    assert_eq!(
        attr_of(&doc, ".hero__cta--secondary", "href"),
        Some("assets/resume/Resume_Pedro_Braga_Software_Engineer.pdf")
    );
    assert_eq!(text_of(&doc, "#langToggle span"), "PT");
    assert_eq!(attr_of(&doc, "#langToggle", "aria-label"), Some("Mudar para Português"));

    // Icon survives the CTA rewrite; markup is parsed for about text
    let cta = doc.select(".hero__cta--secondary").unwrap();
    assert!(doc.inner_html(cta).starts_with("Download CV <svg"));
    let about = doc.select("#about .about__text").unwrap();
    assert_eq!(doc.inner_html(about), "I am a <strong>developer</strong>.");

    // Keys missing from the dictionary leave the page text in place
    assert_eq!(text_of(&doc, ".footer__bottom p:last-child"), "All rights reserved.");
}

#[test]
fn test_missing_content_keeps_fallback_for_templated_text() {
    let translations: TranslationDocument =
        serde_json::from_str(&fixture("translations.json")).unwrap();
    let mut doc = page();
    PageSession::hydrate(&mut doc, None, Some(translations), &MemoryPreferences::with_code("en"));

    assert_eq!(text_of(&doc, ".education__progress-label"), "0% concluído");
    assert_eq!(
        text_of(&doc, r#"[data-i18n="education.semester_of"]"#),
        "1º semestre"
    );
    assert!(!doc.to_html().contains("{progress}"));
    assert!(!doc.to_html().contains("{semester}"));
    assert_eq!(text_of(&doc, r##".nav__link[href="#about"]"##), "About");
}

#[tokio::test]
async fn test_content_strings_are_never_markup() {
    let (doc, _) = hydrated(None).await;
    let html = doc.to_html();
    assert!(html.contains("EF SET English Certificate &lt;C1&gt;"));
    assert!(doc.select("#credentialsList c1").is_none());
}

#[tokio::test]
async fn test_toggle_round_trip_on_fixture() {
    let (mut doc, mut session) = hydrated(None).await;
    let portuguese = doc.to_html();
    let mut prefs = MemoryPreferences::new();

    assert_eq!(session.toggle(&mut doc, &mut prefs), Some(Language::ENGLISH));
    assert_eq!(text_of(&doc, ".credential-badge"), "In progress");
    assert_ne!(doc.to_html(), portuguese);

    assert_eq!(session.toggle(&mut doc, &mut prefs), Some(Language::PORTUGUESE));
    assert_eq!(doc.to_html(), portuguese);
}

#[test]
fn test_content_binding_is_idempotent_on_fixture() {
    let content: ContentDocument = serde_json::from_str(&fixture("content.json")).unwrap();
    let mut doc = page();
    portfolio_binder::content::bind_content(&mut doc, &content);
    let once = doc.to_html();
    portfolio_binder::content::bind_content(&mut doc, &content);
    assert_eq!(doc.to_html(), once);
}

#[test]
fn test_fixture_dictionary_has_both_languages() {
    let translations: TranslationDocument =
        serde_json::from_str(&fixture("translations.json")).unwrap();
    let report = DictionaryValidator::validate(&translations);
    assert!(!report.has_errors(), "errors: {:?}", report.errors);
    // The fixture page is a subset: table keys for absent sections warn
    assert!(report.has_warnings());
}

// ==================== Fetch Failures ====================

#[tokio::test]
async fn test_http_failures_leave_page_untouched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/content.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/translations.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ truncated"))
        .mount(&mock_server)
        .await;

    let loader = Loader::new(DocumentSource::http(&mock_server.uri()));
    let mut doc = page();
    let before = doc.to_html();
    let mut session = PageSession::start(&loader, &mut doc, &MemoryPreferences::new()).await;

    assert_eq!(doc.to_html(), before);
    assert_eq!(session.toggle(&mut doc, &mut MemoryPreferences::new()), None);
    assert_eq!(doc.to_html(), before);
}

#[tokio::test]
async fn test_http_content_failure_still_translates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/content.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/translations.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("translations.json")))
        .mount(&mock_server)
        .await;

    let loader = Loader::new(DocumentSource::http(&mock_server.uri()));
    let mut doc = page();
    PageSession::start(&loader, &mut doc, &MemoryPreferences::with_code("en")).await;

    assert_eq!(text_of(&doc, "#credentialsList"), "Carregando...");
    assert_eq!(text_of(&doc, r##".nav__link[href="#contact"]"##), "Contact");
}

// ==================== Server ====================

#[tokio::test]
async fn test_server_serves_translated_page_after_toggle() {
    let dir = site_dir();
    let state = AppState {
        loader: Loader::new(DocumentSource::directory(&dir)),
        page_path: dir.join("index.html"),
    };
    let app = router(state, &dir);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let toggled = client.post(format!("{}/language", base)).send().await.unwrap();
    let cookie = toggled.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(cookie.starts_with("portfolio-language=en;"));

    let name_value = cookie.split(';').next().unwrap();
    let body = client
        .get(&base)
        .header("Cookie", name_value)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(r#"<html lang="en">"#));
    assert!(body.contains("In progress"));

    let data = client
        .get(format!("{}/data/content.json", base))
        .send()
        .await
        .unwrap();
    assert_eq!(data.status(), reqwest::StatusCode::OK);
}
