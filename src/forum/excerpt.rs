use scraper::Html;

use crate::db::Thread;

/// Default excerpt length in characters.
pub const DEFAULT_EXCERPT_LIMIT: usize = 100;

/// Converts markdown source to HTML. Rendering is an external collaborator;
/// this crate never ships a markdown engine of its own.
pub trait MarkdownRenderer {
    fn to_html(&self, markdown: &str) -> String;
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String,
{
    fn to_html(&self, markdown: &str) -> String {
        self(markdown)
    }
}

/// Plain-text excerpt of a markdown body: rendered to HTML, stripped of
/// markup, whitespace-collapsed, and truncated to `limit` characters with a
/// `...` suffix when the text is longer.
#[must_use]
pub fn excerpt<R>(renderer: &R, body: &str, limit: usize) -> String
where
    R: MarkdownRenderer + ?Sized,
{
    let html = renderer.to_html(body);
    limit_chars(&strip_tags(&html), limit)
}

impl Thread {
    /// Plain-text excerpt of this thread's body. See [`excerpt`].
    #[must_use]
    pub fn excerpt<R>(&self, renderer: &R, limit: usize) -> String
    where
        R: MarkdownRenderer + ?Sized,
    {
        excerpt(renderer, &self.body, limit)
    }
}

fn strip_tags(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    // Block elements render as line breaks; collapse all runs of whitespace
    // to single spaces.
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn limit_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let cut: String = text.chars().take(limit).collect();
    format!("{}...", cut.trim_end())
}
