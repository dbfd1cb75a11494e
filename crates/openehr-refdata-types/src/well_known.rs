//! Well-known openEHR reference data constants.
//!
//! # Examples
//!
//! ```
//! use openehr_refdata_types::well_known;
//!
//! assert_eq!(well_known::DEFAULT_LANGUAGE, "en");
//! assert!(well_known::SUPPORTED_LANGUAGES.contains(&"pt"));
//! ```

// =============================================================================
// Terminology
// =============================================================================

/// Name of the only terminology served (compared case-insensitively).
pub const OPENEHR_TERMINOLOGY: &str = "openehr";

/// Language used when a caller does not ask for one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Languages an openEHR terminology release is published in.
pub const SUPPORTED_LANGUAGES: [&str; 3] = ["en", "es", "pt"];

// =============================================================================
// Property/unit data
// =============================================================================

/// Upstream location of `PropertyUnitData.xml`.
pub const PROPERTY_UNIT_DATA_URL: &str =
    "https://raw.githubusercontent.com/openEHR/specifications-TERM/master/computable/XML/PropertyUnitData.xml";

/// Literal value of the `primary` attribute marking a primary unit.
pub const PRIMARY_TRUE: &str = "true";

// =============================================================================
// Element names
// =============================================================================

/// Property element of the property/unit document.
pub const PROPERTY_ELEMENT: &str = "Property";
/// Unit element of the property/unit document.
pub const UNIT_ELEMENT: &str = "Unit";
/// Root element of a terminology document.
pub const TERMINOLOGY_ELEMENT: &str = "terminology";
/// Code set element of a terminology document.
pub const CODESET_ELEMENT: &str = "codeset";
/// Code element nested in a code set.
pub const CODE_ELEMENT: &str = "code";
/// Group element of a terminology document.
pub const GROUP_ELEMENT: &str = "group";
/// Concept element nested in a group.
pub const CONCEPT_ELEMENT: &str = "concept";
