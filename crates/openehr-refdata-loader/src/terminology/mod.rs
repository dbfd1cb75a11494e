//! openEHR terminology reference data.
//!
//! Loads one `openehr_terminology_<lang>.xml` document per language and the
//! language-independent `openehr_external_terminologies.xml`:
//!
//! - **Code set**: a closed list of literal codes (e.g. ISO 639-1 languages).
//! - **Group**: a set of numeric concepts, each with a language-specific rubric.
//!
//! Code set lookups for a language fall back to the external terminology.
//! Group lookups do not.
//!
//! # Document Format
//!
//! ```text
//! <terminology name="openehr" language="en" version="2.4.0" date="2019-04-08">
//!   <codeset issuer="openehr" openehr_id="compression_algorithms" name="..." external_id="...">
//!     <code value="compress"/>
//!   </codeset>
//!   <group openehr_id="setting" name="setting">
//!     <concept id="225" rubric="home"/>
//!   </group>
//! </terminology>
//! ```

mod parser;
mod service;

pub use parser::parse_terminology_document;
pub use service::TerminologyService;
