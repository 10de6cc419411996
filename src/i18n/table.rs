//! Fixed-selector translation table.
//!
//! Covers elements that cannot carry a `data-i18n` marker: text next to an
//! icon that must survive, attribute targets, and paragraphs whose
//! translations contain markup. Entries are applied in order.

/// How a resolved value is written into each matching element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Replace the element's text content.
    Text,
    /// Replace the text but keep the element's `svg` icon after it.
    KeepIcon,
    /// Replace the children with markup parsed from the dictionary value.
    Html,
    /// Write the value into the named attribute.
    Attribute(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub selector: &'static str,
    pub key: &'static str,
    pub mode: Mode,
}

const fn text(selector: &'static str, key: &'static str) -> Binding {
    Binding {
        selector,
        key,
        mode: Mode::Text,
    }
}

const fn keep_icon(selector: &'static str, key: &'static str) -> Binding {
    Binding {
        selector,
        key,
        mode: Mode::KeepIcon,
    }
}

const fn html(selector: &'static str, key: &'static str) -> Binding {
    Binding {
        selector,
        key,
        mode: Mode::Html,
    }
}

const fn attribute(selector: &'static str, key: &'static str, name: &'static str) -> Binding {
    Binding {
        selector,
        key,
        mode: Mode::Attribute(name),
    }
}

pub const FIXED_BINDINGS: &[Binding] = &[
    // Navigation
    text(r##".nav__link[href="#about"]"##, "nav.about"),
    text(r##".nav__link[href="#servicos"]"##, "nav.solutions"),
    text(r##".nav__link[href="#skills"]"##, "nav.skills"),
    text(r##".nav__link[href="#projects"]"##, "nav.projects"),
    text(r##".nav__link[href="#education"]"##, "nav.education"),
    text(r##".nav__link[href="#blog"]"##, "nav.blog"),
    text(r##".nav__link[href="#contact"]"##, "nav.contact"),
    // Hero
    text(".hero__badge span", "hero.badge"),
    text(".hero .section-label", "hero.greeting"),
    attribute(".hero__title .txt-type", "hero.role", "data-words"),
    text(".hero__subtitle", "hero.description"),
    keep_icon(".hero__cta:not(.hero__cta--secondary)", "hero.cta_projects"),
    keep_icon(".hero__cta--secondary", "hero.cta_cv"),
    // About
    text("#about .section-label", "about.label"),
    text("#about .section-title", "about.title"),
    html("#about .about__text:nth-of-type(1)", "about.text1"),
    html("#about .about__text:nth-of-type(2)", "about.text2"),
    html("#about .about__text:nth-of-type(3)", "about.text3"),
    // Services
    text("#servicos .section-label", "services.label"),
    text("#servicos .section-title", "services.title"),
    text(".services__cta-wrapper .btn", "services.cta"),
    text(".service-card:nth-child(1) .service-card__title", "services.card1_title"),
    text(".service-card:nth-child(1) .service-card__description", "services.card1_desc"),
    text(".service-card:nth-child(2) .service-card__title", "services.card2_title"),
    text(".service-card:nth-child(2) .service-card__description", "services.card2_desc"),
    text(".service-card:nth-child(3) .service-card__title", "services.card3_title"),
    text(".service-card:nth-child(3) .service-card__description", "services.card3_desc"),
    // Skills
    text("#skills .section-label", "skills.label"),
    text("#skills .section-title", "skills.title"),
    // Projects
    text("#projects .section-label", "projects.label"),
    text("#projects .section-title", "projects.title"),
    text(".project-card__cta", "projects.view_case"),
    keep_icon(".project-card__btn--primary", "projects.btn_site"),
    keep_icon(".project-card__btn--secondary", "projects.btn_code"),
    // Education
    text("#education .section-label", "education.label"),
    text("#education .section-title", "education.title"),
    text(".education__item--degree h3", "education.degree_title"),
    text(".education__university", "education.degree_university"),
    text(".education__detail-expected span", "education.degree_expected"),
    text(".education__detail-semester span", "education.degree_semester"),
    text(".education__focus-title", "education.degree_focus"),
    text(".education__progress-label", "education.progress_label"),
    text(".education__item--credentials h3", "education.certs_title"),
    // Testimonials
    text("#testimonials .section-label", "testimonials.label"),
    text("#testimonials .section-title", "testimonials.title"),
    // Contact
    text("#contact .section-label", "contact.label"),
    text("#contact .section-title", "contact.title"),
    text(".contact__subtitle", "contact.subtitle"),
    text(r#".contact__label[for="name"]"#, "contact.name"),
    text(r#".contact__label[for="email"]"#, "contact.email"),
    text(r#".contact__label[for="subject"]"#, "contact.subject"),
    text(r#".contact__label[for="message"]"#, "contact.message"),
    text(".contact__submit", "contact.submit"),
    attribute("#name", "contact.name_placeholder", "placeholder"),
    attribute("#email", "contact.email_placeholder", "placeholder"),
    attribute("#subject", "contact.subject_placeholder", "placeholder"),
    attribute("#message", "contact.message_placeholder", "placeholder"),
    // Footer
    text(".footer__bottom p:first-child", "footer.developed"),
];
