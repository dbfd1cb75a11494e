//! Identifier types used by the property/unit reference data.

/// Internal identifier of a property inside `PropertyUnitData.xml`.
///
/// Only unique within one loaded document.
pub type PropertyId = u32;

/// openEHR terminology identifier of a property.
///
/// A value of `0` means the property has no openEHR code.
///
/// ```
/// use openehr_refdata_types::OpenEhrId;
///
/// let mass: OpenEhrId = 124;
/// assert_ne!(mass, 0);
/// ```
pub type OpenEhrId = u32;
