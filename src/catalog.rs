//! Stable enumeration of gene names to integer codes.
//!
//! Codes are assigned by sorting the distinct names ascending and
//! enumerating from zero. This ordering is a contract with the viewer, not
//! an incidental choice: the catalog is computed once from the
//! full-resolution data and reused at every pyramid level, so a point's
//! code never changes even as the point population shrinks.

use crate::error::{Result, RnagridError};
use rustc_hash::FxHashMap;

/// The sentinel written as the second column of identity arrays, meaning
/// "unused" to the consuming viewer. No gene code may collide with it.
pub const IDENTITY_SENTINEL: u16 = u16::MAX;

/// Bijective mapping between gene names and `u16` codes.
///
/// # Example
///
/// ```rust
/// use rnagrid::GeneCatalog;
///
/// let catalog = GeneCatalog::from_labels(["B", "A", "B", "C"]).unwrap();
/// assert_eq!(catalog.len(), 3);
/// assert_eq!(catalog.code_of("A"), Some(0));
/// assert_eq!(catalog.code_of("C"), Some(2));
/// assert_eq!(catalog.name_of(1), Some("B"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneCatalog {
    names: Vec<String>,
    index: FxHashMap<String, u16>,
}

impl GeneCatalog {
    /// Build the catalog from an iterator of labels. Duplicates collapse;
    /// distinct names are sorted lexicographically ascending and coded by
    /// position.
    pub fn from_labels<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();
        names.sort_unstable();
        names.dedup();

        // 65535 is the identity sentinel, so at most 65535 codes fit.
        if names.len() >= IDENTITY_SENTINEL as usize {
            return Err(RnagridError::InvalidInput(format!(
                "Too many distinct genes: {} (max {})",
                names.len(),
                IDENTITY_SENTINEL as usize - 1
            )));
        }

        let index = names
            .iter()
            .enumerate()
            .map(|(code, name)| (name.clone(), code as u16))
            .collect();

        Ok(Self { names, index })
    }

    /// Number of distinct genes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Code for a gene name, if the name is in the catalog.
    pub fn code_of(&self, name: &str) -> Option<u16> {
        self.index.get(name).copied()
    }

    /// Name for a code, if the code is in range.
    pub fn name_of(&self, code: u16) -> Option<&str> {
        self.names.get(code as usize).map(String::as_str)
    }

    /// All names in code order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
