//! Markdown to sanitized HTML.

use std::borrow::Cow;

use ammonia::UrlRelative;
use pulldown_cmark::{Options, Parser, html};

use pancake_core::ports::{ContentRenderer, RenderError};

/// Prefix for element ids that survive sanitizing, and for the in-page links
/// pointing at them.
const ANCHOR_PREFIX: &str = "md-";

/// CommonMark renderer with GitHub-style extensions.
///
/// Raw HTML in the source passes through the Markdown parser untouched, so
/// the output is always run through an `ammonia` sanitizer.
pub struct MarkdownRenderer {
    options: Options,
    sanitizer: ammonia::Builder<'static>,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        let mut sanitizer = ammonia::Builder::default();
        sanitizer
            .strip_comments(true)
            .add_tags(&["input"])
            .add_tag_attributes("input", &["type", "checked", "disabled"])
            // Footnote definitions are `<div id="label">`.
            .add_tag_attributes("div", &["id"])
            .id_prefix(Some(ANCHOR_PREFIX))
            .url_relative(UrlRelative::Custom(Box::new(prefix_fragment)))
            .link_rel(Some("noopener noreferrer"))
            .rm_tags(&["link", "iframe", "object", "embed"]);

        Self { options, sanitizer }
    }
}

/// Keep `#fragment` links aligned with prefixed ids.
fn prefix_fragment(url: &str) -> Option<Cow<'_, str>> {
    match url.strip_prefix('#') {
        Some(fragment) => Some(Cow::Owned(format!("#{ANCHOR_PREFIX}{fragment}"))),
        None => Some(Cow::Borrowed(url)),
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRenderer for MarkdownRenderer {
    fn render(&self, raw: &str) -> Result<String, RenderError> {
        let parser = Parser::new_ext(raw, self.options);

        let mut html_output = String::with_capacity(raw.len() * 3 / 2);
        html::push_html(&mut html_output, parser);

        Ok(self.sanitizer.clean(&html_output).to_string())
    }
}
