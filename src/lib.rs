//! Content and translation binding for a bilingual portfolio page.
//!
//! The static page is parsed into a [`dom::Document`], the content document
//! is injected by [`content::bind_content`], and the translation pass from
//! [`i18n`] rewrites visible text for the active language. [`session`]
//! sequences the two; [`server`] serves the result.

pub mod config;
pub mod content;
pub mod dom;
pub mod error;
pub mod i18n;
pub mod server;
pub mod session;
pub mod source;
