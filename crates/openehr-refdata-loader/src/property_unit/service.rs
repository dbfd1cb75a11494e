//! Property/unit lookup service.

use std::collections::HashMap;
use std::time::Instant;

use openehr_refdata_types::{OpenEhrId, Property, PropertyId, Unit};
use tracing::{debug, info, warn};

use super::parser::{parse_property_unit_document, PropertyUnitDocument};
use crate::types::{
    DocumentSource, LoadOutcome, LoadStats, PropertyUnitConfig, RefDataError, RefDataResult,
    SourceFailure, PROPERTY_UNIT_FILE,
};

/// Lookup service over `PropertyUnitData.xml`.
///
/// Answers which property a unit code belongs to and which units exist for
/// a property. Unit conversion factors are not loaded.
///
/// Every query is a pure lookup: a miss is `None` or an empty slice, and an
/// uninitialized service behaves like one holding an empty document.
///
/// # Example
///
/// ```ignore
/// use openehr_refdata_loader::{PropertyUnitService, PropertyUnitConfig};
///
/// let mut service = PropertyUnitService::new(PropertyUnitConfig::default());
/// service.initialize().await?;
///
/// assert_eq!(service.property_id_for_unit("kg"), Some(1));
/// let mass_units = service.units_for_openehr_property(124);
/// ```
#[derive(Default)]
pub struct PropertyUnitService {
    config: PropertyUnitConfig,
    initialized: bool,
    /// Properties indexed by internal id.
    properties: HashMap<PropertyId, Property>,
    /// Properties indexed by openEHR id (only ids > 0).
    properties_by_openehr_id: HashMap<OpenEhrId, Property>,
    /// Every unit in document order.
    units: Vec<Unit>,
    /// Units grouped by owning property id, in document order.
    units_by_property: HashMap<PropertyId, Vec<Unit>>,
    /// Units indexed by UCUM code; later duplicates replace earlier ones.
    units_by_code: HashMap<String, Unit>,
}

impl std::fmt::Debug for PropertyUnitService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyUnitService")
            .field("config", &self.config)
            .field("initialized", &self.initialized)
            .field("properties", &self.properties.len())
            .field("properties_by_openehr_id", &self.properties_by_openehr_id.len())
            .field("units", &self.units.len())
            .field("units_by_property", &self.units_by_property.len())
            .field("units_by_code", &self.units_by_code.len())
            .finish()
    }
}

impl PropertyUnitService {
    /// Creates an uninitialized service.
    pub fn new(config: PropertyUnitConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Returns the service configuration.
    pub fn config(&self) -> &PropertyUnitConfig {
        &self.config
    }

    /// Returns true once a document has been loaded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Loads the property/unit document unless already loaded.
    ///
    /// Tries the configured local file first, then the remote URL. When every
    /// source fails a warning is logged, the service stays uninitialized and
    /// the returned error lists each failed attempt. Queries keep working and
    /// return empty results.
    pub async fn initialize(&mut self) -> RefDataResult<LoadOutcome> {
        if self.initialized {
            return Ok(LoadOutcome::AlreadyInitialized);
        }

        let mut sources = vec![DocumentSource::LocalFile(self.config.file_path.clone())];
        if let Some(url) = &self.config.remote_url {
            sources.push(DocumentSource::Remote(url.clone()));
        }

        let mut failures = Vec::new();
        for source in sources {
            debug!("Loading property/unit data from {}", source);
            match self.load_from_source(&source).await {
                Ok(stats) => {
                    info!(
                        "Loaded {} properties and {} units from {}",
                        self.properties.len(),
                        self.units.len(),
                        source
                    );
                    return Ok(LoadOutcome::Loaded { source, stats });
                }
                Err(error) => {
                    debug!("Could not load property/unit data from {}: {}", source, error);
                    failures.push(SourceFailure { source, error });
                }
            }
        }

        let error = RefDataError::Unavailable {
            document: PROPERTY_UNIT_FILE.to_string(),
            failures,
        };
        warn!("Failed to load {}: {}", PROPERTY_UNIT_FILE, error);
        Err(error)
    }

    async fn load_from_source(&mut self, source: &DocumentSource) -> RefDataResult<LoadStats> {
        let content = source.read().await?;
        self.load_from_document(&content)
    }

    /// Loads already-fetched document content, replacing every index.
    ///
    /// Always rebuilds and marks the service initialized. On a parse error
    /// the previous indices are kept unchanged.
    pub fn load_from_document(&mut self, content: &str) -> RefDataResult<LoadStats> {
        let start = Instant::now();
        let document = parse_property_unit_document(content)?;
        let elements_read = document.elements_read;
        let records_indexed = self.rebuild(document);
        self.initialized = true;

        Ok(LoadStats {
            elements_read,
            records_indexed,
            parse_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn rebuild(&mut self, document: PropertyUnitDocument) -> usize {
        self.properties.clear();
        self.properties_by_openehr_id.clear();
        self.units.clear();
        self.units_by_property.clear();
        self.units_by_code.clear();

        let count = document.properties.len() + document.units.len();

        for property in document.properties {
            if property.has_openehr_id() {
                self.properties_by_openehr_id
                    .insert(property.openehr_id, property.clone());
            }
            self.units_by_property.entry(property.id).or_default();
            self.properties.insert(property.id, property);
        }

        for unit in document.units {
            self.units_by_property
                .entry(unit.property_id)
                .or_default()
                .push(unit.clone());
            if !unit.code().is_empty() {
                self.units_by_code.insert(unit.code().to_string(), unit.clone());
            }
            self.units.push(unit);
        }

        count
    }

    // Query methods

    /// Gets the internal property id of a unit code.
    pub fn property_id_for_unit(&self, ucum: &str) -> Option<PropertyId> {
        self.units_by_code.get(ucum).map(|u| u.property_id)
    }

    /// Gets the openEHR property id of a unit code.
    ///
    /// `None` when the code or its property is unknown, or the property has
    /// no openEHR id.
    pub fn openehr_property_id_for_unit(&self, ucum: &str) -> Option<OpenEhrId> {
        let unit = self.units_by_code.get(ucum)?;
        self.properties
            .get(&unit.property_id)
            .and_then(Property::openehr_code)
    }

    /// Gets all units of a property (by internal id), in document order.
    pub fn units_for_property(&self, property_id: PropertyId) -> &[Unit] {
        self.units_by_property
            .get(&property_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Gets all units of a property (by openEHR id), in document order.
    pub fn units_for_openehr_property(&self, openehr_id: OpenEhrId) -> &[Unit] {
        match self.properties_by_openehr_id.get(&openehr_id) {
            Some(property) => self.units_for_property(property.id),
            None => &[],
        }
    }

    /// Gets a property by internal id.
    pub fn property(&self, property_id: PropertyId) -> Option<&Property> {
        self.properties.get(&property_id)
    }

    /// Gets a property by openEHR id.
    pub fn property_by_openehr_id(&self, openehr_id: OpenEhrId) -> Option<&Property> {
        self.properties_by_openehr_id.get(&openehr_id)
    }

    /// Gets a unit by UCUM code.
    pub fn unit_by_code(&self, ucum: &str) -> Option<&Unit> {
        self.units_by_code.get(ucum)
    }

    /// Gets the primary unit of a property.
    ///
    /// The first unit flagged primary wins; without one, the first unit of the
    /// property is used.
    pub fn primary_unit_for_property(&self, property_id: PropertyId) -> Option<&Unit> {
        let units = self.units_by_property.get(&property_id)?;
        units.iter().find(|u| u.primary).or_else(|| units.first())
    }

    /// Returns true if both unit codes resolve to the same property.
    pub fn units_same_property(&self, first: &str, second: &str) -> bool {
        match (
            self.property_id_for_unit(first),
            self.property_id_for_unit(second),
        ) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Gets the display name of a property.
    pub fn property_name(&self, property_id: PropertyId) -> Option<&str> {
        self.properties.get(&property_id).map(|p| p.text.as_str())
    }

    /// Gets the openEHR id of a property, `None` when unknown or zero.
    pub fn openehr_id_for_property(&self, property_id: PropertyId) -> Option<OpenEhrId> {
        self.properties.get(&property_id)?.openehr_code()
    }

    /// Returns every property, ordered by internal id.
    pub fn all_properties(&self) -> Vec<&Property> {
        let mut properties: Vec<&Property> = self.properties.values().collect();
        properties.sort_by_key(|p| p.id);
        properties
    }

    /// Returns every unit in document order, duplicates included.
    pub fn all_units(&self) -> &[Unit] {
        &self.units
    }

    /// Returns the number of properties.
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Returns the number of units.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}
