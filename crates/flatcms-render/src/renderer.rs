use flatcms_types::{ContentType, Extension};
use tracing::error;

use crate::error::RenderError;
use crate::markdown::{CommonMarkRenderer, MarkdownRenderer};

/// Display-ready document content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    pub body: String,
    pub content_type: ContentType,
}

/// Pick the display form of `content` from the extension of `name`.
///
/// `.txt` is returned verbatim as `text/plain`; `.md` goes through
/// `markdown` and is returned as `text/html`.
///
/// ```
/// use flatcms_render::{render_for_display, CommonMarkRenderer};
/// use flatcms_types::ContentType;
///
/// let out = render_for_display("x.txt", "hello", &CommonMarkRenderer::new()).unwrap();
/// assert_eq!(out.body, "hello");
/// assert_eq!(out.content_type, ContentType::TextPlain);
/// ```
pub fn render_for_display(
    name: &str,
    content: &str,
    markdown: &dyn MarkdownRenderer,
) -> Result<Rendered, RenderError> {
    let extension = Extension::from_name(name).map_err(|_| {
        error!(document = name, "no renderer for document extension");
        RenderError::UnsupportedExtension {
            name: name.to_string(),
        }
    })?;

    let body = match extension {
        Extension::Txt => content.to_string(),
        Extension::Md => markdown.render(content),
    };

    Ok(Rendered {
        body,
        content_type: extension.content_type(),
    })
}

/// Extension dispatch bound to a particular markdown renderer.
pub struct ContentRenderer {
    markdown: Box<dyn MarkdownRenderer>,
}

impl ContentRenderer {
    pub fn new(markdown: Box<dyn MarkdownRenderer>) -> Self {
        Self { markdown }
    }

    pub fn render(&self, name: &str, content: &str) -> Result<Rendered, RenderError> {
        render_for_display(name, content, self.markdown.as_ref())
    }
}

impl Default for ContentRenderer {
    fn default() -> Self {
        Self::new(Box::new(CommonMarkRenderer::extended()))
    }
}
