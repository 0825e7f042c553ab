use std::collections::HashMap;

use flatcms_types::DocumentName;

use crate::error::{parse_name, StoreResult};

/// Per-session tally of duplicates made from each source document.
///
/// Lives exactly as long as the session that owns it; nothing is persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DuplicateCounter {
    counts: HashMap<String, u32>,
}

impl DuplicateCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duplicates of `source` made so far in this session.
    pub fn count(&self, source: &str) -> u32 {
        self.counts.get(source).copied().unwrap_or(0)
    }

    /// Claim the next ordinal for `source`, returning the count before the bump.
    pub fn next_ordinal(&mut self, source: &str) -> u32 {
        let slot = self.counts.entry(source.to_string()).or_insert(0);
        let ordinal = *slot;
        *slot += 1;
        ordinal
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Build the name of the `ordinal`-th duplicate: `stem + ordinal + "." + ext`.
///
/// ```
/// use flatcms_store::duplicate_name;
/// use flatcms_types::DocumentName;
///
/// let source = DocumentName::parse("changes.txt").unwrap();
/// assert_eq!(duplicate_name(&source, 0).unwrap().as_str(), "changes0.txt");
/// ```
pub fn duplicate_name(source: &DocumentName, ordinal: u32) -> StoreResult<DocumentName> {
    parse_name(&format!(
        "{}{}.{}",
        source.stem(),
        ordinal,
        source.extension().as_str()
    ))
}
