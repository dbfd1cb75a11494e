//! Loader-specific types: errors, configuration and load reports.

use std::fmt;
use std::path::{Path, PathBuf};

use openehr_refdata_types::well_known;
use thiserror::Error;

/// Directory the reference documents are read from by default.
pub const DEFAULT_DATA_DIR: &str = "terminology_data";

/// File name of the property/unit document.
pub const PROPERTY_UNIT_FILE: &str = "PropertyUnitData.xml";

/// File name of the external terminologies document.
pub const EXTERNAL_TERMINOLOGY_FILE: &str = "openehr_external_terminologies.xml";

/// Errors that can occur while loading reference data.
#[derive(Error, Debug)]
pub enum RefDataError {
    /// I/O error reading a reference document.
    #[error("IO error reading reference document: {0}")]
    Io(#[from] std::io::Error),

    /// XML syntax error.
    #[error("XML error at byte {position}: {source}")]
    Xml {
        /// Byte offset of the error in the document.
        position: u64,
        /// Underlying parser error.
        source: quick_xml::Error,
    },

    /// HTTP transport error fetching a remote document.
    #[cfg(feature = "remote")]
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        /// The requested URL.
        url: String,
        /// Underlying client error.
        source: reqwest::Error,
    },

    /// Remote server answered with a non-success status.
    #[error("Unexpected HTTP status {status} fetching {url}")]
    HttpStatus {
        /// The requested URL.
        url: String,
        /// The returned status code.
        status: u16,
    },

    /// Remote fetching was compiled out.
    #[error("Remote fetch disabled, cannot load {url}")]
    RemoteDisabled {
        /// The URL that would have been fetched.
        url: String,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// The document ended while an element was still open.
    #[error("Document ends at byte {position} with element '{element}' unclosed")]
    Truncated {
        /// Innermost element left open.
        element: String,
        /// Byte offset where the input ended.
        position: u64,
    },

    /// The document contains no element at all.
    #[error("Document has no root element")]
    MissingRoot,

    /// The root element is not the expected one.
    #[error("Unexpected root element '{found}', expected '{expected}'")]
    UnexpectedRoot {
        /// Expected element name.
        expected: String,
        /// Found element name.
        found: String,
    },

    /// Every configured source failed.
    #[error("{document} could not be loaded from any source ({} attempts)", .failures.len())]
    Unavailable {
        /// Name of the document.
        document: String,
        /// Individual failures, in attempt order.
        failures: Vec<SourceFailure>,
    },
}

/// Result type for reference data operations.
pub type RefDataResult<T> = Result<T, RefDataError>;

/// Where a reference document was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// A file on local disk.
    LocalFile(PathBuf),
    /// A remote URL.
    Remote(String),
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::LocalFile(path) => write!(f, "{}", path.display()),
            DocumentSource::Remote(url) => f.write_str(url),
        }
    }
}

/// A failed attempt to load one source.
#[derive(Debug)]
pub struct SourceFailure {
    /// The source that was attempted.
    pub source: DocumentSource,
    /// Why it failed.
    pub error: RefDataError,
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}

/// Statistics from parsing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Elements read from the document.
    pub elements_read: usize,
    /// Records placed in the index.
    pub records_indexed: usize,
    /// Time taken to parse and index in milliseconds.
    pub parse_time_ms: u64,
}

/// Result of a successful property/unit initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The document was loaded and indexed.
    Loaded {
        /// Where the document came from.
        source: DocumentSource,
        /// Parse statistics.
        stats: LoadStats,
    },
    /// The service was already initialized; nothing changed.
    AlreadyInitialized,
}

/// Report of a terminology initialization.
///
/// Partial success is normal: a language whose document is missing is
/// skipped and listed in `failures`.
#[derive(Debug, Default)]
pub struct TerminologyLoadReport {
    /// The service was already initialized; nothing changed.
    pub already_initialized: bool,
    /// Languages loaded by this call, in configuration order.
    pub loaded_languages: Vec<String>,
    /// Whether the external terminologies document loaded.
    pub external_loaded: bool,
    /// Sources that failed.
    pub failures: Vec<SourceFailure>,
}

impl TerminologyLoadReport {
    pub(crate) fn already_initialized() -> Self {
        Self {
            already_initialized: true,
            ..Default::default()
        }
    }

    /// Returns true if no source failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns true if at least one document was loaded by this call.
    pub fn loaded_any(&self) -> bool {
        !self.loaded_languages.is_empty() || self.external_loaded
    }
}

/// Configuration for the property/unit service.
#[derive(Debug, Clone)]
pub struct PropertyUnitConfig {
    /// Local path tried first.
    pub file_path: PathBuf,
    /// Remote URL tried when the local file fails (`None` disables it).
    pub remote_url: Option<String>,
}

impl Default for PropertyUnitConfig {
    fn default() -> Self {
        Self {
            file_path: Path::new(DEFAULT_DATA_DIR).join(PROPERTY_UNIT_FILE),
            remote_url: Some(well_known::PROPERTY_UNIT_DATA_URL.to_string()),
        }
    }
}

impl PropertyUnitConfig {
    /// Creates a config that only reads the given local file.
    pub fn local_only<P: Into<PathBuf>>(file_path: P) -> Self {
        Self {
            file_path: file_path.into(),
            remote_url: None,
        }
    }

    /// Replaces the local file path.
    pub fn with_file_path<P: Into<PathBuf>>(mut self, file_path: P) -> Self {
        self.file_path = file_path.into();
        self
    }

    /// Replaces the remote URL.
    pub fn with_remote_url(mut self, url: Option<String>) -> Self {
        self.remote_url = url;
        self
    }
}

/// Configuration for the terminology service.
#[derive(Debug, Clone)]
pub struct TerminologyConfig {
    /// Directory holding the terminology documents.
    pub data_dir: PathBuf,
    /// Languages to load, in order.
    pub languages: Vec<String>,
}

impl Default for TerminologyConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            languages: well_known::SUPPORTED_LANGUAGES
                .iter()
                .map(|l| l.to_string())
                .collect(),
        }
    }
}

impl TerminologyConfig {
    /// Creates a config reading the default languages from `data_dir`.
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Path of the terminology document for a language.
    pub fn language_file(&self, language: &str) -> PathBuf {
        self.data_dir
            .join(format!("openehr_terminology_{}.xml", language))
    }

    /// Path of the external terminologies document.
    pub fn external_file(&self) -> PathBuf {
        self.data_dir.join(EXTERNAL_TERMINOLOGY_FILE)
    }
}

/// Configuration for both services.
#[derive(Debug, Clone, Default)]
pub struct RefDataConfig {
    /// Property/unit service configuration.
    pub property_units: PropertyUnitConfig,
    /// Terminology service configuration.
    pub terminology: TerminologyConfig,
}

impl RefDataConfig {
    /// Creates a config reading every document from `data_dir`.
    ///
    /// The property/unit remote fallback keeps its default URL.
    pub fn from_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            property_units: PropertyUnitConfig::default()
                .with_file_path(data_dir.join(PROPERTY_UNIT_FILE)),
            terminology: TerminologyConfig::with_data_dir(data_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_unit_config_default() {
        let config = PropertyUnitConfig::default();
        assert_eq!(
            config.file_path,
            PathBuf::from("terminology_data/PropertyUnitData.xml")
        );
        assert_eq!(
            config.remote_url.as_deref(),
            Some(well_known::PROPERTY_UNIT_DATA_URL)
        );
    }

    #[test]
    fn test_terminology_config_paths() {
        let config = TerminologyConfig::with_data_dir("/data");
        assert_eq!(config.languages, vec!["en", "es", "pt"]);
        assert_eq!(
            config.language_file("es"),
            PathBuf::from("/data/openehr_terminology_es.xml")
        );
        assert_eq!(
            config.external_file(),
            PathBuf::from("/data/openehr_external_terminologies.xml")
        );
    }

    #[test]
    fn test_refdata_config_from_data_dir() {
        let config = RefDataConfig::from_data_dir("/srv/refdata");
        assert_eq!(
            config.property_units.file_path,
            PathBuf::from("/srv/refdata/PropertyUnitData.xml")
        );
        assert!(config.property_units.remote_url.is_some());
        assert_eq!(config.terminology.data_dir, PathBuf::from("/srv/refdata"));
    }

    #[test]
    fn test_unavailable_error_message() {
        let error = RefDataError::Unavailable {
            document: PROPERTY_UNIT_FILE.to_string(),
            failures: vec![SourceFailure {
                source: DocumentSource::LocalFile(PathBuf::from("missing.xml")),
                error: RefDataError::FileNotFound {
                    path: "missing.xml".to_string(),
                },
            }],
        };

        assert_eq!(
            error.to_string(),
            "PropertyUnitData.xml could not be loaded from any source (1 attempts)"
        );
    }

    #[test]
    fn test_report_flags() {
        let report = TerminologyLoadReport::already_initialized();
        assert!(report.already_initialized);
        assert!(report.is_complete());
        assert!(!report.loaded_any());
    }
}
