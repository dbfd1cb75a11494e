//! openEHR terminology lookup service.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use openehr_refdata_types::well_known::OPENEHR_TERMINOLOGY;
use openehr_refdata_types::{CodeSet, Terminology, TerminologyGroup};
use tracing::{debug, info, warn};

use super::parser::parse_terminology_document;
use crate::types::{
    DocumentSource, LoadStats, RefDataResult, SourceFailure, TerminologyConfig,
    TerminologyLoadReport,
};

/// Which slot of the service a document fills.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Language(String),
    External,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Language(language) => write!(f, "language '{}'", language),
            Slot::External => f.write_str("external terminologies"),
        }
    }
}

/// A document read from disk, waiting to be parsed.
struct PendingDocument {
    slot: Slot,
    source: DocumentSource,
    content: String,
}

impl PendingDocument {
    fn parse(self) -> (Slot, DocumentSource, RefDataResult<Terminology>) {
        let result = parse_terminology_document(&self.content);
        (self.slot, self.source, result)
    }
}

/// Lookup service over the openEHR terminology documents.
///
/// Holds one [`Terminology`] per loaded language plus the external
/// terminologies document. Code set lookups fall back to the external
/// terminology; group lookups never do.
///
/// # Example
///
/// ```ignore
/// use openehr_refdata_loader::{TerminologyService, TerminologyConfig};
/// use openehr_refdata_types::well_known::DEFAULT_LANGUAGE;
///
/// let mut service = TerminologyService::new(TerminologyConfig::default());
/// let report = service.initialize().await;
///
/// let codes = service.all_codes("compression_algorithms", DEFAULT_LANGUAGE);
/// let rubric = service.concept_rubric("setting", "225", DEFAULT_LANGUAGE);
/// ```
#[derive(Default)]
pub struct TerminologyService {
    config: TerminologyConfig,
    initialized: bool,
    /// Terminologies indexed by language tag.
    terminologies: HashMap<String, Terminology>,
    /// The external terminologies document (code set fallback).
    external: Option<Terminology>,
}

impl std::fmt::Debug for TerminologyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminologyService")
            .field("config", &self.config)
            .field("initialized", &self.initialized)
            .field("languages", &self.loaded_languages())
            .field("external", &self.external.is_some())
            .finish()
    }
}

impl TerminologyService {
    /// Creates an uninitialized service.
    pub fn new(config: TerminologyConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Returns the service configuration.
    pub fn config(&self) -> &TerminologyConfig {
        &self.config
    }

    /// Returns true once at least one document has been loaded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Loads every configured language and the external terminologies.
    ///
    /// A language whose document cannot be read or parsed is logged and
    /// skipped; the others still load. There is no remote fallback. Once a
    /// call has loaded anything, later calls return immediately with
    /// `already_initialized` set.
    pub async fn initialize(&mut self) -> TerminologyLoadReport {
        if self.initialized {
            return TerminologyLoadReport::already_initialized();
        }

        let mut report = TerminologyLoadReport::default();
        let mut pending = Vec::new();

        let mut slots: Vec<(Slot, DocumentSource)> = self
            .config
            .languages
            .iter()
            .map(|language| {
                (
                    Slot::Language(language.clone()),
                    DocumentSource::LocalFile(self.config.language_file(language)),
                )
            })
            .collect();
        slots.push((
            Slot::External,
            DocumentSource::LocalFile(self.config.external_file()),
        ));

        for (slot, source) in slots {
            debug!("Reading terminology document {}", source);
            match source.read().await {
                Ok(content) => pending.push(PendingDocument {
                    slot,
                    source,
                    content,
                }),
                Err(error) => {
                    warn!("Failed to load {} from {}: {}", slot, source, error);
                    report.failures.push(SourceFailure { source, error });
                }
            }
        }

        let start = Instant::now();
        for (slot, source, result) in parse_pending(pending) {
            match result {
                Ok(terminology) => {
                    info!(
                        "Loaded {} from {}: {} code sets, {} groups",
                        slot,
                        source,
                        terminology.code_sets.len(),
                        terminology.groups.len()
                    );
                    match slot {
                        Slot::Language(language) => {
                            report.loaded_languages.push(language.clone());
                            self.terminologies.insert(language, terminology);
                        }
                        Slot::External => {
                            report.external_loaded = true;
                            self.external = Some(terminology);
                        }
                    }
                }
                Err(error) => {
                    warn!("Failed to parse {} from {}: {}", slot, source, error);
                    report.failures.push(SourceFailure { source, error });
                }
            }
        }
        debug!("Parsed terminology documents in {:?}", start.elapsed());

        self.initialized = report.loaded_any();
        report
    }

    /// Loads (or replaces) the terminology of one language from content.
    pub fn load_language_document(
        &mut self,
        language: &str,
        content: &str,
    ) -> RefDataResult<LoadStats> {
        let start = Instant::now();
        let terminology = parse_terminology_document(content)?;
        let stats = Self::stats(&terminology, start);
        self.terminologies.insert(language.to_string(), terminology);
        self.initialized = true;
        Ok(stats)
    }

    /// Loads (or replaces) the external terminologies from content.
    pub fn load_external_document(&mut self, content: &str) -> RefDataResult<LoadStats> {
        let start = Instant::now();
        let terminology = parse_terminology_document(content)?;
        let stats = Self::stats(&terminology, start);
        self.external = Some(terminology);
        self.initialized = true;
        Ok(stats)
    }

    fn stats(terminology: &Terminology, start: Instant) -> LoadStats {
        let codes: usize = terminology.code_sets.values().map(|s| s.codes.len()).sum();
        let records_indexed = terminology.code_sets.len()
            + codes
            + terminology.groups.len()
            + terminology.concept_count();
        LoadStats {
            elements_read: records_indexed + 1,
            records_indexed,
            parse_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    // Query methods

    /// Returns true only for the openEHR terminology (case-insensitive).
    pub fn has_terminology(&self, name: &str) -> bool {
        name.to_lowercase() == OPENEHR_TERMINOLOGY
    }

    /// Gets a code set by id for a language.
    ///
    /// Falls back to the external terminology when the language is not
    /// loaded or does not define the code set.
    pub fn code_set(&self, id: &str, language: &str) -> Option<&CodeSet> {
        self.terminologies
            .get(language)
            .and_then(|t| t.code_set(id))
            .or_else(|| self.external.as_ref()?.code_set(id))
    }

    /// Returns true if any loaded language or the external terminology
    /// defines the code set.
    pub fn has_code_set(&self, id: &str) -> bool {
        self.terminologies
            .values()
            .chain(self.external.iter())
            .any(|t| t.code_sets.contains_key(id))
    }

    /// Gets a group by id for a language. No external fallback.
    pub fn group(&self, id: &str, language: &str) -> Option<&TerminologyGroup> {
        self.terminologies.get(language)?.group(id)
    }

    /// Returns true if any loaded language defines the group.
    ///
    /// The external terminology is not consulted.
    pub fn has_group(&self, id: &str) -> bool {
        self.terminologies
            .values()
            .any(|t| t.groups.contains_key(id))
    }

    /// Returns the ids of every code set of every loaded language and the
    /// external terminology, deduplicated, in no particular order.
    pub fn code_set_identifiers(&self) -> Vec<&str> {
        let ids: HashSet<&str> = self
            .terminologies
            .values()
            .chain(self.external.iter())
            .flat_map(|t| t.code_sets.keys().map(String::as_str))
            .collect();
        ids.into_iter().collect()
    }

    /// Returns the ids of every group of every loaded language,
    /// deduplicated, in no particular order. External groups are excluded.
    pub fn group_identifiers(&self) -> Vec<&str> {
        let ids: HashSet<&str> = self
            .terminologies
            .values()
            .flat_map(|t| t.groups.keys().map(String::as_str))
            .collect();
        ids.into_iter().collect()
    }

    /// Gets the literal code values of a code set, empty when unresolved.
    pub fn all_codes(&self, code_set_id: &str, language: &str) -> Vec<&str> {
        self.code_set(code_set_id, language)
            .map(|set| set.code_values().collect())
            .unwrap_or_default()
    }

    /// Gets the rubric of a concept in a group.
    pub fn concept_rubric(&self, group_id: &str, concept_id: &str, language: &str) -> Option<&str> {
        self.group(group_id, language)?.rubric(concept_id)
    }

    /// Gets the concept ids of a group, empty when unresolved.
    pub fn codes_for_group(&self, group_id: &str, language: &str) -> Vec<&str> {
        self.group(group_id, language)
            .map(|g| g.concepts.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Finds the rubric of a concept id in any group of a language.
    ///
    /// Groups are searched in id order so the answer is stable when several
    /// groups define the same concept id.
    pub fn rubric_for_code(&self, concept_id: &str, language: &str) -> Option<&str> {
        let terminology = self.terminologies.get(language)?;
        let mut groups: Vec<&TerminologyGroup> = terminology.groups.values().collect();
        groups.sort_by(|a, b| a.openehr_id.cmp(&b.openehr_id));
        groups.into_iter().find_map(|g| g.rubric(concept_id))
    }

    /// Gets the terminology loaded for a language.
    pub fn terminology(&self, language: &str) -> Option<&Terminology> {
        self.terminologies.get(language)
    }

    /// Gets the external terminology.
    pub fn external_terminology(&self) -> Option<&Terminology> {
        self.external.as_ref()
    }

    /// Returns the loaded language tags, sorted.
    pub fn loaded_languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.terminologies.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }
}

/// Parses read documents, in parallel when the `parallel` feature is on.
///
/// Results keep the order of `pending`.
#[cfg(feature = "parallel")]
fn parse_pending(
    pending: Vec<PendingDocument>,
) -> Vec<(Slot, DocumentSource, RefDataResult<Terminology>)> {
    pending.into_par_iter().map(PendingDocument::parse).collect()
}

#[cfg(not(feature = "parallel"))]
fn parse_pending(
    pending: Vec<PendingDocument>,
) -> Vec<(Slot, DocumentSource, RefDataResult<Terminology>)> {
    pending.into_iter().map(PendingDocument::parse).collect()
}
