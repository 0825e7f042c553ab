//! Content rendering for flatcms documents.
//!
//! A document's extension decides how it is displayed:
//!
//! | extension | output                         | content type |
//! |-----------|--------------------------------|--------------|
//! | `.txt`    | the stored text, unchanged     | `text/plain` |
//! | `.md`     | HTML from the markdown renderer| `text/html`  |
//!
//! Any other extension is an error. The store refuses to create such
//! documents, so reaching that path means a file was placed by other means.

pub mod error;
pub mod markdown;
pub mod renderer;

pub use error::RenderError;
pub use markdown::{CommonMarkRenderer, MarkdownRenderer};
pub use renderer::{render_for_display, ContentRenderer, Rendered};
