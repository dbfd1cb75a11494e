//! # openehr-refdata-types
//!
//! Type definitions for openEHR reference data.
//!
//! This crate provides Rust types for the two reference documents published
//! by openEHR alongside its specifications:
//!
//! - `PropertyUnitData.xml`: properties (quantity kinds) and their units.
//! - `openehr_terminology_<lang>.xml` and `openehr_external_terminologies.xml`:
//!   code sets and concept groups.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!
//! ## Usage
//!
//! ```rust
//! use openehr_refdata_types::{Property, Unit, well_known};
//!
//! let length = Property {
//!     id: 0,
//!     text: "Length".to_string(),
//!     openehr_id: 122,
//! };
//!
//! let metre = Unit {
//!     property_id: length.id,
//!     text: "m".to_string(),
//!     name: "meter".to_string(),
//!     ucum: "m".to_string(),
//!     primary: true,
//! };
//!
//! assert_eq!(metre.property_id, 0);
//! assert_eq!(well_known::OPENEHR_TERMINOLOGY, "openehr");
//! ```

#![warn(missing_docs)]

mod ids;
mod property;
mod terminology;
pub mod well_known;

// Re-export all public types at crate root
pub use ids::{OpenEhrId, PropertyId};
pub use property::{Property, Unit};
pub use terminology::{CodeSet, TermCode, Terminology, TerminologyGroup};
