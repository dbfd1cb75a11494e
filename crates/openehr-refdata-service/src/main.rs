//! openEHR reference data server binary.
//!
//! Loads the reference documents, logs what was loaded and answers the
//! lookup given on the command line:
//!
//! ```text
//! refdata-server [summary]
//! refdata-server unit <code>
//! refdata-server property <id>
//! refdata-server same-property <code> <code>
//! refdata-server codeset <id> [language]
//! refdata-server group <id> [language]
//! refdata-server rubric <group> <concept> [language]
//! ```

use openehr_refdata_loader::{RefDataConfig, DEFAULT_DATA_DIR};
use openehr_refdata_service::{Lookup, RefDataServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let lookup = Lookup::parse(&args)?;

    // Get data directory from env or use default
    let data_dir =
        std::env::var("OPENEHR_REFDATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let mut config = RefDataConfig::from_data_dir(&data_dir);

    // An empty URL disables the remote fallback
    if let Ok(url) = std::env::var("OPENEHR_PROPERTY_UNIT_URL") {
        config.property_units = config
            .property_units
            .with_remote_url((!url.is_empty()).then_some(url));
    }

    tracing::info!("Loading openEHR reference data from: {}", data_dir);
    let server = RefDataServer::initialize(config).await;

    let summary = server.summary();
    tracing::info!(
        "Loaded {} properties, {} units, languages {:?}, {} code sets, {} groups",
        summary.property_count,
        summary.unit_count,
        summary.languages,
        summary.code_set_count,
        summary.group_count
    );

    let answer = lookup.run(&server)?;
    println!("{}", serde_json::to_string_pretty(&answer)?);

    Ok(())
}
