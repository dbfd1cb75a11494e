//! Shared reference data handle.

use std::sync::Arc;

use openehr_refdata_loader::{
    LoadOutcome, PropertyUnitService, RefDataConfig, TerminologyService,
};
use serde::Serialize;
use tracing::{info, warn};

/// Reference data server.
///
/// Cheap to clone: both services are shared read-only.
#[derive(Clone, Debug, Default)]
pub struct RefDataServer {
    units: Arc<PropertyUnitService>,
    terminology: Arc<TerminologyService>,
}

/// Counts describing what the server has loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Whether property/unit data is available.
    pub property_units_loaded: bool,
    /// Number of properties.
    pub property_count: usize,
    /// Number of units.
    pub unit_count: usize,
    /// Loaded terminology languages, sorted.
    pub languages: Vec<String>,
    /// Whether the external terminologies loaded.
    pub external_loaded: bool,
    /// Distinct code set ids across all terminologies.
    pub code_set_count: usize,
    /// Distinct group ids across the language terminologies.
    pub group_count: usize,
}

impl RefDataServer {
    /// Creates a server over already-built services.
    pub fn new(units: PropertyUnitService, terminology: TerminologyService) -> Self {
        Self {
            units: Arc::new(units),
            terminology: Arc::new(terminology),
        }
    }

    /// Builds and initializes both services.
    ///
    /// Never fails: a service that cannot load is logged and kept empty,
    /// and its queries return empty results.
    pub async fn initialize(config: RefDataConfig) -> Self {
        let mut units = PropertyUnitService::new(config.property_units);
        match units.initialize().await {
            Ok(LoadOutcome::Loaded { source, stats }) => info!(
                "Property/unit data ready from {} ({} records in {}ms)",
                source, stats.records_indexed, stats.parse_time_ms
            ),
            Ok(LoadOutcome::AlreadyInitialized) => {}
            Err(e) => warn!("Property/unit lookups disabled: {}", e),
        }

        let mut terminology = TerminologyService::new(config.terminology);
        let report = terminology.initialize().await;
        if report.loaded_any() {
            info!(
                "Terminology ready: languages {:?}, external {}",
                report.loaded_languages, report.external_loaded
            );
        } else {
            warn!("Terminology lookups disabled: no terminology document loaded");
        }
        if !report.is_complete() {
            for failure in &report.failures {
                warn!("Skipped terminology source {}", failure);
            }
        }

        Self::new(units, terminology)
    }

    /// Returns the property/unit service.
    pub fn units(&self) -> &PropertyUnitService {
        &self.units
    }

    /// Returns the terminology service.
    pub fn terminology(&self) -> &TerminologyService {
        &self.terminology
    }

    /// Summarizes what has been loaded.
    pub fn summary(&self) -> Summary {
        Summary {
            property_units_loaded: self.units.is_initialized(),
            property_count: self.units.property_count(),
            unit_count: self.units.unit_count(),
            languages: self
                .terminology
                .loaded_languages()
                .into_iter()
                .map(String::from)
                .collect(),
            external_loaded: self.terminology.external_terminology().is_some(),
            code_set_count: self.terminology.code_set_identifiers().len(),
            group_count: self.terminology.group_identifiers().len(),
        }
    }
}
