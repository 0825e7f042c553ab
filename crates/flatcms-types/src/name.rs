//! Document name validation.
//!
//! A document name is a single flat directory entry:
//! - Must be non-empty after trimming surrounding whitespace
//! - Must not contain `/`, `\` or NUL
//! - Must not be `.` or `..`, and must not start with `.`
//! - Must end in an allowed extension (`.txt` or `.md`)
//!
//! Reads and deletes only need the path-safety half of these rules, see
//! [`validate_path_component`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NameError;

/// Characters that would let a name escape the storage directory.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

/// Supported document extensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    /// Plain text, served verbatim.
    Txt,
    /// Markdown, rendered to HTML.
    Md,
}

impl Extension {
    /// Every extension the store accepts.
    pub const ALLOWED: [Extension; 2] = [Extension::Txt, Extension::Md];

    /// Parse an extension without its leading dot.
    pub fn parse(ext: &str) -> Result<Self, NameError> {
        match ext {
            "txt" => Ok(Self::Txt),
            "md" => Ok(Self::Md),
            other => Err(NameError::UnsupportedExtension {
                extension: other.to_string(),
            }),
        }
    }

    /// Derive the extension from a full file name (last `.` wins).
    pub fn from_name(name: &str) -> Result<Self, NameError> {
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Self::parse(ext),
            _ => Err(NameError::MissingExtension(name.to_string())),
        }
    }

    /// The extension text without the leading dot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Md => "md",
        }
    }

    /// The content type a document with this extension is served as.
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Txt => ContentType::TextPlain,
            Self::Md => ContentType::TextHtml,
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.as_str())
    }
}

/// MIME type attached to displayed content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    TextPlain,
    TextHtml,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextPlain => "text/plain",
            Self::TextHtml => "text/html",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that `name` is a single, visible directory entry.
///
/// Unlike [`DocumentName::parse`] this does not look at the extension, so it
/// can guard reads of files that were placed in the store by other means.
///
/// # Examples
///
/// ```
/// use flatcms_types::validate_path_component;
///
/// assert!(validate_path_component("notes.rb").is_ok());
/// assert!(validate_path_component("../etc/passwd").is_err());
/// assert!(validate_path_component("").is_err());
/// ```
pub fn validate_path_component(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.contains(FORBIDDEN_CHARS) || name.starts_with('.') {
        return Err(NameError::UnsafePath(name.to_string()));
    }
    Ok(())
}

/// A validated document name.
///
/// Construct with [`DocumentName::parse`]; every instance is path-safe and
/// carries an allowed [`Extension`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentName {
    name: String,
    extension: Extension,
}

impl DocumentName {
    /// Validate a raw name, trimming surrounding whitespace first.
    ///
    /// # Examples
    ///
    /// ```
    /// use flatcms_types::{DocumentName, Extension};
    ///
    /// let name = DocumentName::parse("  about.md ").unwrap();
    /// assert_eq!(name.as_str(), "about.md");
    /// assert_eq!(name.extension(), Extension::Md);
    /// assert!(DocumentName::parse("script.rb").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let name = raw.trim();
        validate_path_component(name)?;
        let extension = Extension::from_name(name)?;
        Ok(Self {
            name: name.to_string(),
            extension,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> Extension {
        self.extension
    }

    /// The name without its final `.extension`.
    pub fn stem(&self) -> &str {
        // Validated names always contain the extension separator.
        let cut = self.name.len() - self.extension.as_str().len() - 1;
        &self.name[..cut]
    }

    pub fn into_string(self) -> String {
        self.name
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for DocumentName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl FromStr for DocumentName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DocumentName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentName> for String {
    fn from(name: DocumentName) -> Self {
        name.name
    }
}
