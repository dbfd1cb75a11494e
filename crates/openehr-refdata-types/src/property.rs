//! Property and unit types.
//!
//! This module provides the `Property` and `Unit` structs representing the
//! entries of the openEHR `PropertyUnitData.xml` document.
//!
//! Conversion factors present in the source document are deliberately not
//! modelled: they are known to be imprecise.

use crate::{OpenEhrId, PropertyId};

/// A measurable quantity kind (e.g. Mass, Length).
///
/// Represents a `<Property id=".." Text=".." openEHR=".."/>` element.
///
/// # Examples
///
/// ```
/// use openehr_refdata_types::Property;
///
/// let mass = Property {
///     id: 1,
///     text: "Mass".to_string(),
///     openehr_id: 124,
/// };
///
/// assert!(mass.has_openehr_id());
/// assert_eq!(mass.openehr_code(), Some(124));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    /// Internal identifier in the document.
    pub id: PropertyId,
    /// Display name (e.g. "Mass").
    pub text: String,
    /// openEHR terminology identifier (`0` when absent).
    pub openehr_id: OpenEhrId,
}

impl Property {
    /// Returns true if this property carries an openEHR terminology code.
    pub fn has_openehr_id(&self) -> bool {
        self.openehr_id > 0
    }

    /// Returns the openEHR terminology code, or `None` when it is zero.
    pub fn openehr_code(&self) -> Option<OpenEhrId> {
        self.has_openehr_id().then_some(self.openehr_id)
    }
}

/// A unit of measure belonging to one [`Property`].
///
/// Represents a `<Unit property_id=".." Text=".." name=".." UCUM=".." primary=".."/>`
/// element. The owning property is not validated: a unit may reference a
/// property id that the document never declares.
///
/// # Examples
///
/// ```
/// use openehr_refdata_types::Unit;
///
/// let kg = Unit {
///     property_id: 1,
///     text: "kg".to_string(),
///     name: "kilogram".to_string(),
///     ucum: "kg".to_string(),
///     primary: true,
/// };
///
/// assert_eq!(kg.code(), "kg");
/// assert!(kg.primary);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    /// Internal id of the owning property.
    pub property_id: PropertyId,
    /// Short display text (e.g. "°C").
    pub text: String,
    /// Long name (e.g. "degrees Celsius").
    pub name: String,
    /// UCUM code, the primary lookup key.
    pub ucum: String,
    /// Whether this unit claims to be the default unit of its property.
    pub primary: bool,
}

impl Unit {
    /// Returns the lookup code of this unit.
    pub fn code(&self) -> &str {
        &self.ucum
    }
}
