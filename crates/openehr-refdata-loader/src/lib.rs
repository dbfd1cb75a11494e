//! # openehr-refdata-loader
//!
//! Parsers and lookup services for openEHR reference data files.
//!
//! Two services are provided:
//!
//! - [`PropertyUnitService`]: physical properties and their UCUM units, read
//!   from `PropertyUnitData.xml` (local file first, remote URL second).
//! - [`TerminologyService`]: the openEHR terminology in several languages
//!   plus the external terminologies document.
//!
//! Both are plain values: construct one, call `initialize`, then query it.
//! Load failures never panic; they are logged through `tracing` and returned
//! to the caller.
//!
//! ## Features
//!
//! - `parallel` (default): parses terminology documents in parallel with rayon.
//! - `remote` (default): enables the HTTP fallback for property/unit data.
//!
//! ## Usage
//!
//! ```ignore
//! use openehr_refdata_loader::{RefDataConfig, PropertyUnitService, TerminologyService};
//!
//! let config = RefDataConfig::from_data_dir("terminology_data");
//!
//! let mut units = PropertyUnitService::new(config.property_units);
//! units.initialize().await?;
//!
//! let mut terminology = TerminologyService::new(config.terminology);
//! let report = terminology.initialize().await;
//! ```

#![warn(missing_docs)]

pub mod loader;
pub mod parser;
pub mod property_unit;
pub mod terminology;
pub mod types;

pub use loader::{fetch_remote_document, read_local_document};
pub use parser::{Attributes, XmlEvent, XmlEventReader, XmlRecord};
pub use property_unit::{parse_property_unit_document, PropertyUnitDocument, PropertyUnitService};
pub use terminology::{parse_terminology_document, TerminologyService};
pub use types::{
    DocumentSource, LoadOutcome, LoadStats, PropertyUnitConfig, RefDataConfig, RefDataError,
    RefDataResult, SourceFailure, TerminologyConfig, TerminologyLoadReport, DEFAULT_DATA_DIR,
    EXTERNAL_TERMINOLOGY_FILE, PROPERTY_UNIT_FILE,
};

// Re-export openehr-refdata-types for convenience
pub use openehr_refdata_types;
