//! # openehr-refdata-service
//!
//! Shared handle over the openEHR reference data services.
//!
//! [`RefDataServer`] owns an initialized [`PropertyUnitService`] and
//! [`TerminologyService`] behind `Arc`s, so it can be cloned into every
//! component that needs lookups. [`Lookup`] describes a single query and
//! renders its answer as JSON; the `refdata-server` binary is a thin wrapper
//! around both.
//!
//! [`PropertyUnitService`]: openehr_refdata_loader::PropertyUnitService
//! [`TerminologyService`]: openehr_refdata_loader::TerminologyService

#![warn(missing_docs)]

mod lookup;
mod server;

pub use lookup::{Lookup, LookupError};
pub use server::{RefDataServer, Summary};

// Re-export the loader for convenience
pub use openehr_refdata_loader;
