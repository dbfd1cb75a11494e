//! openEHR terminology types.
//!
//! A [`Terminology`] is the parse result of one `openehr_terminology_<lang>.xml`
//! (or the external terminologies) document. It holds code sets and concept
//! groups keyed by their openEHR identifier.

use std::collections::HashMap;

/// A single code of a [`CodeSet`].
///
/// Represents a `<code value=".." description=".."/>` element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TermCode {
    /// Literal code value (e.g. "ISO_639-1" or "en").
    pub code: String,
    /// Optional human readable description.
    pub description: Option<String>,
}

impl TermCode {
    /// Creates a code without a description.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: None,
        }
    }

    /// Sets the description, treating an empty string as absent.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }
}

/// A named, issuer-attributed collection of codes.
///
/// Codes keep document order and are not deduplicated.
///
/// # Examples
///
/// ```
/// use openehr_refdata_types::{CodeSet, TermCode};
///
/// let set = CodeSet {
///     issuer: "openEHR".to_string(),
///     openehr_id: "null_flavours".to_string(),
///     name: "null flavours".to_string(),
///     external_id: "openehr_null_flavours".to_string(),
///     codes: vec![TermCode::new("253"), TermCode::new("271")],
/// };
///
/// assert_eq!(set.code_values().collect::<Vec<_>>(), vec!["253", "271"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodeSet {
    /// Issuing organisation.
    pub issuer: String,
    /// openEHR identifier, the lookup key.
    pub openehr_id: String,
    /// Display name.
    pub name: String,
    /// External reference identifier.
    pub external_id: String,
    /// Codes in document order.
    pub codes: Vec<TermCode>,
}

impl CodeSet {
    /// Iterates over the literal code values in document order.
    pub fn code_values(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(|c| c.code.as_str())
    }
}

/// A named collection of concept id → rubric associations.
///
/// Concept ids are unique: a later duplicate replaces the earlier rubric.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerminologyGroup {
    /// openEHR identifier, the lookup key.
    pub openehr_id: String,
    /// Display name.
    pub name: String,
    /// Concept id to rubric text.
    pub concepts: HashMap<String, String>,
}

impl TerminologyGroup {
    /// Returns the rubric of a concept.
    pub fn rubric(&self, concept_id: &str) -> Option<&str> {
        self.concepts.get(concept_id).map(String::as_str)
    }
}

/// The root of one terminology document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Terminology {
    /// Terminology name (normally "openehr").
    pub name: String,
    /// Language tag of the rubrics (e.g. "en").
    pub language: String,
    /// Release version.
    pub version: String,
    /// Release date as written in the document.
    pub date: String,
    /// Code sets keyed by openEHR id.
    pub code_sets: HashMap<String, CodeSet>,
    /// Groups keyed by openEHR id.
    pub groups: HashMap<String, TerminologyGroup>,
}

impl Terminology {
    /// Gets a code set by openEHR id.
    pub fn code_set(&self, id: &str) -> Option<&CodeSet> {
        self.code_sets.get(id)
    }

    /// Gets a group by openEHR id.
    pub fn group(&self, id: &str) -> Option<&TerminologyGroup> {
        self.groups.get(id)
    }

    /// Returns the total number of concepts across all groups.
    pub fn concept_count(&self) -> usize {
        self.groups.values().map(|g| g.concepts.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_description_is_absent() {
        let code = TermCode::new("en").with_description("");
        assert_eq!(code.description, None);

        let code = TermCode::new("en").with_description("English");
        assert_eq!(code.description.as_deref(), Some("English"));
    }

    #[test]
    fn test_group_rubric() {
        let mut group = TerminologyGroup {
            openehr_id: "setting".to_string(),
            name: "setting".to_string(),
            concepts: HashMap::new(),
        };
        group
            .concepts
            .insert("225".to_string(), "home".to_string());

        assert_eq!(group.rubric("225"), Some("home"));
        assert_eq!(group.rubric("226"), None);
    }

    #[test]
    fn test_terminology_concept_count() {
        let mut terminology = Terminology::default();
        let mut group = TerminologyGroup::default();
        group.concepts.insert("1".to_string(), "a".to_string());
        group.concepts.insert("2".to_string(), "b".to_string());
        terminology.groups.insert("g".to_string(), group);

        assert_eq!(terminology.concept_count(), 2);
        assert!(terminology.group("g").is_some());
        assert!(terminology.code_set("g").is_none());
    }
}
