//! openEHR property/unit reference data.
//!
//! Loads `PropertyUnitData.xml` and answers property/unit lookups:
//!
//! - **Property**: a quantity kind such as Mass or Length, with an internal
//!   id and an openEHR terminology id.
//! - **Unit**: a unit of measure owned by one property, keyed by its UCUM code.
//!
//! # Usage
//!
//! ```ignore
//! use openehr_refdata_loader::PropertyUnitService;
//!
//! let mut service = PropertyUnitService::default();
//! service.load_from_document(&xml)?;
//!
//! assert!(service.units_same_property("m", "cm"));
//! let metre = service.primary_unit_for_property(0);
//! ```
//!
//! # Document Format
//!
//! ```text
//! <PropertyUnits>
//!   <Property id="1" Text="Mass" openEHR="124"/>
//!   <Unit property_id="1" Text="kg" name="kilogram" conversion="1" primary="true" UCUM="kg"/>
//! </PropertyUnits>
//! ```

mod parser;
mod service;

pub use parser::{parse_property_unit_document, PropertyUnitDocument};
pub use service::PropertyUnitService;
