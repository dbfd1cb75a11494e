//! openEHR terminology document parser.
//!
//! Parses `openehr_terminology_<lang>.xml` and
//! `openehr_external_terminologies.xml`.

use openehr_refdata_types::well_known::{
    CODESET_ELEMENT, CODE_ELEMENT, CONCEPT_ELEMENT, GROUP_ELEMENT, TERMINOLOGY_ELEMENT,
};
use openehr_refdata_types::{CodeSet, TermCode, Terminology, TerminologyGroup};

use crate::parser::{Attributes, XmlEvent, XmlEventReader, XmlRecord};
use crate::types::{RefDataError, RefDataResult};

impl XmlRecord for TermCode {
    const ELEMENT: &'static str = CODE_ELEMENT;

    fn from_attributes(attributes: &Attributes) -> Self {
        TermCode::new(attributes.text("value")).with_description(attributes.text("description"))
    }
}

impl XmlRecord for CodeSet {
    const ELEMENT: &'static str = CODESET_ELEMENT;

    fn from_attributes(attributes: &Attributes) -> Self {
        CodeSet {
            issuer: attributes.text("issuer"),
            openehr_id: attributes.text("openehr_id"),
            name: attributes.text("name"),
            external_id: attributes.text("external_id"),
            codes: Vec::new(),
        }
    }
}

impl XmlRecord for TerminologyGroup {
    const ELEMENT: &'static str = GROUP_ELEMENT;

    fn from_attributes(attributes: &Attributes) -> Self {
        TerminologyGroup {
            openehr_id: attributes.text("openehr_id"),
            name: attributes.text("name"),
            concepts: Default::default(),
        }
    }
}

impl XmlRecord for Terminology {
    const ELEMENT: &'static str = TERMINOLOGY_ELEMENT;

    fn from_attributes(attributes: &Attributes) -> Self {
        Terminology {
            name: attributes.text("name"),
            language: attributes.text("language"),
            version: attributes.text("version"),
            date: attributes.text("date"),
            ..Default::default()
        }
    }
}

/// Parses a terminology document.
///
/// Code sets and groups are registered by `openehr_id`; a later element
/// with the same id replaces the earlier one. Codes keep document order,
/// concepts are keyed by id (later duplicates win).
///
/// # Errors
/// Returns an error on malformed XML, or when the root element is missing
/// or is not `terminology`.
pub fn parse_terminology_document(content: &str) -> RefDataResult<Terminology> {
    let mut reader = XmlEventReader::new(content);

    let (root, attributes, self_closing) = match reader.next().transpose()? {
        Some(XmlEvent::Open {
            name,
            attributes,
            self_closing,
        }) => (name, attributes, self_closing),
        // A close event first means the reader has already rejected the markup
        Some(XmlEvent::Close { .. }) | None => return Err(RefDataError::MissingRoot),
    };

    if root != Terminology::ELEMENT {
        return Err(RefDataError::UnexpectedRoot {
            expected: Terminology::ELEMENT.to_string(),
            found: root,
        });
    }

    let mut terminology = Terminology::from_attributes(&attributes);
    if self_closing {
        return Ok(terminology);
    }

    let mut code_set: Option<CodeSet> = None;
    let mut group: Option<TerminologyGroup> = None;

    for event in reader {
        match event? {
            XmlEvent::Open {
                name,
                attributes,
                self_closing,
            } => match name.as_str() {
                CODESET_ELEMENT => {
                    let set = CodeSet::from_attributes(&attributes);
                    if self_closing {
                        terminology.code_sets.insert(set.openehr_id.clone(), set);
                    } else {
                        code_set = Some(set);
                    }
                }
                CODE_ELEMENT => {
                    if let Some(set) = code_set.as_mut() {
                        set.codes.push(TermCode::from_attributes(&attributes));
                    }
                }
                GROUP_ELEMENT => {
                    let g = TerminologyGroup::from_attributes(&attributes);
                    if self_closing {
                        terminology.groups.insert(g.openehr_id.clone(), g);
                    } else {
                        group = Some(g);
                    }
                }
                CONCEPT_ELEMENT => {
                    if let Some(g) = group.as_mut() {
                        g.concepts
                            .insert(attributes.text("id"), attributes.text("rubric"));
                    }
                }
                _ => {}
            },
            XmlEvent::Close { name } => match name.as_str() {
                CODESET_ELEMENT => {
                    if let Some(set) = code_set.take() {
                        terminology.code_sets.insert(set.openehr_id.clone(), set);
                    }
                }
                GROUP_ELEMENT => {
                    if let Some(g) = group.take() {
                        terminology.groups.insert(g.openehr_id.clone(), g);
                    }
                }
                _ => {}
            },
        }
    }

    Ok(terminology)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<terminology name="openehr" language="en" version="2.4.0" date="2019-04-08">
  <codeset issuer="openehr" openehr_id="compression_algorithms" name="compression algorithms" external_id="openehr_compression_algorithms">
    <code value="compress" description="Unix compress"/>
    <code value="deflate"/>
    <code value="gzip" description=""/>
    <code value="deflate"/>
  </codeset>
  <codeset issuer="ISO" openehr_id="languages" name="languages" external_id="ISO_639-1"/>
  <group openehr_id="setting" name="setting">
    <concept id="225" rubric="home"/>
    <concept id="227" rubric="emergency care"/>
    <concept id="225" rubric="home (updated)"/>
  </group>
  <group openehr_id="null_flavours" name="null flavours">
    <concept id="271" rubric="no information"/>
  </group>
</terminology>"#;

    #[test]
    fn test_parse_root_attributes() {
        let terminology = parse_terminology_document(SAMPLE).unwrap();
        assert_eq!(terminology.name, "openehr");
        assert_eq!(terminology.language, "en");
        assert_eq!(terminology.version, "2.4.0");
        assert_eq!(terminology.date, "2019-04-08");
    }

    #[test]
    fn test_parse_code_sets() {
        let terminology = parse_terminology_document(SAMPLE).unwrap();
        assert_eq!(terminology.code_sets.len(), 2);

        let set = terminology.code_set("compression_algorithms").unwrap();
        assert_eq!(set.issuer, "openehr");
        assert_eq!(set.external_id, "openehr_compression_algorithms");
        assert_eq!(
            set.code_values().collect::<Vec<_>>(),
            vec!["compress", "deflate", "gzip", "deflate"]
        );
        assert_eq!(set.codes[0].description.as_deref(), Some("Unix compress"));
        assert_eq!(set.codes[1].description, None);
        assert_eq!(set.codes[2].description, None);

        let languages = terminology.code_set("languages").unwrap();
        assert!(languages.codes.is_empty());
        assert_eq!(languages.external_id, "ISO_639-1");
    }

    #[test]
    fn test_parse_groups_last_concept_wins() {
        let terminology = parse_terminology_document(SAMPLE).unwrap();
        assert_eq!(terminology.groups.len(), 2);

        let setting = terminology.group("setting").unwrap();
        assert_eq!(setting.concepts.len(), 2);
        assert_eq!(setting.rubric("225"), Some("home (updated)"));
        assert_eq!(setting.rubric("227"), Some("emergency care"));
        assert_eq!(terminology.concept_count(), 3);
    }

    #[test]
    fn test_codes_outside_code_set_are_ignored() {
        let terminology = parse_terminology_document(
            r#"<terminology name="openehr"><code value="stray"/><concept id="1" rubric="stray"/></terminology>"#,
        )
        .unwrap();

        assert!(terminology.code_sets.is_empty());
        assert!(terminology.groups.is_empty());
    }

    #[test]
    fn test_self_closing_root() {
        let terminology =
            parse_terminology_document(r#"<terminology name="openehr" language="pt"/>"#).unwrap();
        assert_eq!(terminology.language, "pt");
        assert!(terminology.code_sets.is_empty());
    }

    #[test]
    fn test_missing_root_fails() {
        let error = parse_terminology_document("  ").unwrap_err();
        assert!(matches!(error, RefDataError::MissingRoot));
    }

    #[test]
    fn test_unexpected_root_fails() {
        let error = parse_terminology_document(r#"<PropertyUnits/>"#).unwrap_err();
        match error {
            RefDataError::UnexpectedRoot { expected, found } => {
                assert_eq!(expected, "terminology");
                assert_eq!(found, "PropertyUnits");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_malformed_document_fails() {
        let error = parse_terminology_document(
            r#"<terminology name="openehr"><codeset openehr_id="x"></terminology>"#,
        )
        .unwrap_err();
        assert!(matches!(error, RefDataError::Xml { .. }));
    }

    #[test]
    fn test_unclosed_group_fails() {
        let error = parse_terminology_document(
            r#"<terminology name="openehr"><group openehr_id="setting"><concept id="225" rubric="home"/>"#,
        )
        .unwrap_err();

        match error {
            RefDataError::Truncated { element, .. } => assert_eq!(element, "group"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_root_fails() {
        let error = parse_terminology_document(
            r#"<terminology name="openehr"><codeset openehr_id="x"><code value="a"/></codeset>"#,
        )
        .unwrap_err();
        assert!(matches!(error, RefDataError::Truncated { .. }));
    }

    #[test]
    fn test_code_set_serializes() {
        let terminology = parse_terminology_document(SAMPLE).unwrap();
        let set = terminology.code_set("compression_algorithms").unwrap();

        let json = serde_json::to_value(set).unwrap();
        assert_eq!(json["openehr_id"], "compression_algorithms");
        assert_eq!(json["codes"][0]["code"], "compress");
    }
}
