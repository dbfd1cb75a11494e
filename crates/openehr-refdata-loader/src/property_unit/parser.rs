//! `PropertyUnitData.xml` parser.
//!
//! Reads `Property` and `Unit` elements. The `conversion` and `coefficient`
//! attributes are never read.

use openehr_refdata_types::well_known::{PROPERTY_ELEMENT, UNIT_ELEMENT};
use openehr_refdata_types::{Property, Unit};

use crate::parser::{Attributes, XmlEvent, XmlEventReader, XmlRecord};
use crate::types::{RefDataError, RefDataResult};

impl XmlRecord for Property {
    const ELEMENT: &'static str = PROPERTY_ELEMENT;

    fn from_attributes(attributes: &Attributes) -> Self {
        Property {
            id: attributes.integer("id"),
            text: attributes.text("Text"),
            openehr_id: attributes.integer("openEHR"),
        }
    }
}

impl XmlRecord for Unit {
    const ELEMENT: &'static str = UNIT_ELEMENT;

    fn from_attributes(attributes: &Attributes) -> Self {
        let text = attributes.text("Text");
        let ucum = match attributes.get("UCUM") {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => text.clone(),
        };

        Unit {
            property_id: attributes.integer("property_id"),
            text,
            name: attributes.text("name"),
            ucum,
            primary: attributes.flag("primary"),
        }
    }
}

/// Records read from one property/unit document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyUnitDocument {
    /// Every `Property` element.
    pub properties: Vec<Property>,
    /// Every `Unit` element.
    pub units: Vec<Unit>,
    /// Total elements read, including the root and unknown elements.
    pub elements_read: usize,
}

/// Parses a property/unit document.
///
/// # Errors
/// Returns an error on malformed XML or when the document has no root element.
pub fn parse_property_unit_document(content: &str) -> RefDataResult<PropertyUnitDocument> {
    let mut reader = XmlEventReader::new(content);
    let mut document = PropertyUnitDocument::default();

    for event in reader.by_ref() {
        if let XmlEvent::Open {
            name, attributes, ..
        } = event?
        {
            if name == Property::ELEMENT {
                document.properties.push(Property::from_attributes(&attributes));
            } else if name == Unit::ELEMENT {
                document.units.push(Unit::from_attributes(&attributes));
            }
        }
    }

    document.elements_read = reader.elements_read();
    if document.elements_read == 0 {
        return Err(RefDataError::MissingRoot);
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_property_from_attributes() {
        let property = Property::from_attributes(&attributes(&[
            ("id", "1"),
            ("Text", "Mass"),
            ("openEHR", "124"),
        ]));

        assert_eq!(property.id, 1);
        assert_eq!(property.text, "Mass");
        assert_eq!(property.openehr_id, 124);
    }

    #[test]
    fn test_property_malformed_numbers_are_zero() {
        let property = Property::from_attributes(&attributes(&[
            ("id", "x1"),
            ("Text", "Broken"),
            ("openEHR", ""),
        ]));

        assert_eq!(property.id, 0);
        assert_eq!(property.openehr_id, 0);
    }

    #[test]
    fn test_unit_from_attributes() {
        let unit = Unit::from_attributes(&attributes(&[
            ("property_id", "3"),
            ("Text", "°F"),
            ("name", "degrees Fahrenheit"),
            ("conversion", "0.555556"),
            ("coefficient", "0"),
            ("primary", "false"),
            ("UCUM", "[degF]"),
        ]));

        assert_eq!(unit.property_id, 3);
        assert_eq!(unit.text, "°F");
        assert_eq!(unit.name, "degrees Fahrenheit");
        assert_eq!(unit.ucum, "[degF]");
        assert!(!unit.primary);
    }

    #[test]
    fn test_unit_code_defaults_to_text() {
        let missing = Unit::from_attributes(&attributes(&[("property_id", "0"), ("Text", "ft")]));
        assert_eq!(missing.ucum, "ft");
        assert_eq!(missing.name, "");
        assert!(!missing.primary);

        let empty = Unit::from_attributes(&attributes(&[("Text", "in"), ("UCUM", "")]));
        assert_eq!(empty.ucum, "in");
    }

    #[test]
    fn test_parse_document_with_namespace() {
        let document = parse_property_unit_document(
            r#"<?xml version="1.0" standalone="yes"?>
<PropertyUnits xmlns="http://tempuri.org/PropertyUnits.xsd">
  <Property id="0" Text="Length" openEHR="122" />
  <Unit property_id="0" Text="m" name="meter" conversion="1" primary="true" UCUM="m"/>
  <Property id="1" Text="Mass" openEHR="124" />
</PropertyUnits>"#,
        )
        .unwrap();

        assert_eq!(document.properties.len(), 2);
        assert_eq!(document.units.len(), 1);
        assert_eq!(document.elements_read, 4);
        assert_eq!(document.properties[1].text, "Mass");
        assert!(document.units[0].primary);
    }

    #[test]
    fn test_parse_empty_document_fails() {
        let error = parse_property_unit_document("").unwrap_err();
        assert!(matches!(error, RefDataError::MissingRoot));

        let error = parse_property_unit_document("<?xml version=\"1.0\"?>").unwrap_err();
        assert!(matches!(error, RefDataError::MissingRoot));
    }

    #[test]
    fn test_parse_unclosed_document_fails() {
        let error = parse_property_unit_document(
            r#"<PropertyUnits><Property id="0" Text="Length" openEHR="122"/>"#,
        )
        .unwrap_err();

        match error {
            RefDataError::Truncated { element, .. } => assert_eq!(element, "PropertyUnits"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed_document_fails() {
        let error =
            parse_property_unit_document("<PropertyUnits><Property id=\"1\"></PropertyUnits>")
                .unwrap_err();
        assert!(matches!(error, RefDataError::Xml { .. }));
    }
}
