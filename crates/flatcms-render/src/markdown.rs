use pulldown_cmark::{html, Options, Parser};

/// Converts markdown text to HTML.
///
/// Implementations must be pure and total: the same input always yields the
/// same output, and no well-formed text makes them fail.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark renderer backed by `pulldown-cmark`.
#[derive(Clone, Copy, Debug)]
pub struct CommonMarkRenderer {
    options: Options,
}

impl CommonMarkRenderer {
    /// Strict CommonMark, no extensions.
    pub fn new() -> Self {
        Self {
            options: Options::empty(),
        }
    }

    /// CommonMark plus tables, strikethrough, and task lists.
    pub fn extended() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }
}

impl Default for CommonMarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}
