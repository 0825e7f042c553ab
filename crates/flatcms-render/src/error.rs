use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("cannot display {name:?}: unsupported extension")]
    UnsupportedExtension { name: String },
}
