use std::fmt;

/// A gated entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Show the form that creates a document.
    ViewNewForm,
    Create,
    /// Show the form that edits a document.
    ViewEditForm,
    Overwrite,
    Delete,
    Duplicate,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::ViewNewForm,
        Operation::Create,
        Operation::ViewEditForm,
        Operation::Overwrite,
        Operation::Delete,
        Operation::Duplicate,
    ];

    /// Whether the operation changes stored documents (as opposed to
    /// only preparing a change).
    pub fn mutates(&self) -> bool {
        !matches!(self, Self::ViewNewForm | Self::ViewEditForm)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ViewNewForm => write!(f, "view-new-form"),
            Self::Create => write!(f, "create"),
            Self::ViewEditForm => write!(f, "view-edit-form"),
            Self::Overwrite => write!(f, "overwrite"),
            Self::Delete => write!(f, "delete"),
            Self::Duplicate => write!(f, "duplicate"),
        }
    }
}
