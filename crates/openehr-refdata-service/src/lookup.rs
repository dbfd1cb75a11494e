//! Command-line lookups rendered as JSON.

use openehr_refdata_types::well_known::DEFAULT_LANGUAGE;
use openehr_refdata_types::PropertyId;
use serde_json::{json, Value};
use thiserror::Error;

use crate::RefDataServer;

/// Errors parsing a lookup from command-line arguments.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// The command word is not recognised.
    #[error("Unknown lookup '{0}'")]
    UnknownCommand(String),

    /// A required argument was not given.
    #[error("Lookup '{command}' requires <{argument}>")]
    MissingArgument {
        /// The command word.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// A property id was not a number.
    #[error("Invalid property id '{0}'")]
    InvalidPropertyId(String),
}

/// A single reference data query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// `summary`
    Summary,
    /// `unit <code>`
    Unit {
        /// UCUM code.
        code: String,
    },
    /// `property <id>`
    Property {
        /// Internal property id.
        property_id: PropertyId,
    },
    /// `same-property <code> <code>`
    SameProperty {
        /// First UCUM code.
        first: String,
        /// Second UCUM code.
        second: String,
    },
    /// `codeset <id> [language]`
    CodeSet {
        /// Code set openEHR id.
        id: String,
        /// Terminology language.
        language: String,
    },
    /// `group <id> [language]`
    Group {
        /// Group openEHR id.
        id: String,
        /// Terminology language.
        language: String,
    },
    /// `rubric <group> <concept> [language]`
    Rubric {
        /// Group openEHR id.
        group_id: String,
        /// Concept id within the group.
        concept_id: String,
        /// Terminology language.
        language: String,
    },
}

impl Lookup {
    /// Parses a lookup from arguments (program name excluded).
    ///
    /// No arguments means [`Lookup::Summary`]. The language argument
    /// defaults to `en`.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, LookupError> {
        let mut args = args.iter().map(|arg| arg.as_ref());
        let Some(command) = args.next() else {
            return Ok(Lookup::Summary);
        };

        let lookup = match command {
            "summary" => Lookup::Summary,
            "unit" => Lookup::Unit {
                code: required(&mut args, "unit", "code")?,
            },
            "property" => {
                let id = required(&mut args, "property", "id")?;
                let property_id = id
                    .parse()
                    .map_err(|_| LookupError::InvalidPropertyId(id.clone()))?;
                Lookup::Property { property_id }
            }
            "same-property" => Lookup::SameProperty {
                first: required(&mut args, "same-property", "code")?,
                second: required(&mut args, "same-property", "code")?,
            },
            "codeset" => Lookup::CodeSet {
                id: required(&mut args, "codeset", "id")?,
                language: optional_language(&mut args),
            },
            "group" => Lookup::Group {
                id: required(&mut args, "group", "id")?,
                language: optional_language(&mut args),
            },
            "rubric" => Lookup::Rubric {
                group_id: required(&mut args, "rubric", "group")?,
                concept_id: required(&mut args, "rubric", "concept")?,
                language: optional_language(&mut args),
            },
            other => return Err(LookupError::UnknownCommand(other.to_string())),
        };

        Ok(lookup)
    }

    /// Answers the lookup against a server. Unresolved lookups yield `null`.
    pub fn run(&self, server: &RefDataServer) -> serde_json::Result<Value> {
        let units = server.units();
        let terminology = server.terminology();

        match self {
            Lookup::Summary => serde_json::to_value(server.summary()),
            Lookup::Unit { code } => Ok(match units.unit_by_code(code) {
                Some(unit) => json!({
                    "unit": serde_json::to_value(unit)?,
                    "property": serde_json::to_value(units.property(unit.property_id))?,
                }),
                None => Value::Null,
            }),
            Lookup::Property { property_id } => Ok(match units.property(*property_id) {
                Some(property) => json!({
                    "property": serde_json::to_value(property)?,
                    "primary_unit": serde_json::to_value(units.primary_unit_for_property(*property_id))?,
                    "units": serde_json::to_value(units.units_for_property(*property_id))?,
                }),
                None => Value::Null,
            }),
            Lookup::SameProperty { first, second } => {
                Ok(json!(units.units_same_property(first, second)))
            }
            Lookup::CodeSet { id, language } => {
                serde_json::to_value(terminology.code_set(id, language))
            }
            Lookup::Group { id, language } => serde_json::to_value(terminology.group(id, language)),
            Lookup::Rubric {
                group_id,
                concept_id,
                language,
            } => Ok(json!(terminology.concept_rubric(group_id, concept_id, language))),
        }
    }
}

fn required<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<String, LookupError> {
    args.next()
        .map(str::to_string)
        .ok_or(LookupError::MissingArgument { command, argument })
}

fn optional_language<'a>(args: &mut impl Iterator<Item = &'a str>) -> String {
    args.next().unwrap_or(DEFAULT_LANGUAGE).to_string()
}
