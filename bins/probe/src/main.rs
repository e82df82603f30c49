//! Cloud Files connectivity probe.
//!
//! Authenticates with the configured account, then writes, inspects, reads
//! back and deletes a small object in the configured container.

use anyhow::{Context, bail};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rackfs_cloudfiles::CloudFilesAdapter;
use rackfs_core::{StorageAdapter, WriteConfig};
use rackfs_shared::AppConfig;

const PROBE_PATH: &str = ".rackfs-probe/probe.txt";
const PROBE_CONTENTS: &[u8] = b"rackfs probe";

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rackfs=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    info!(
        region = %config.storage.region,
        container = %config.storage.container,
        "Configuration loaded"
    );

    let adapter = CloudFilesAdapter::from_config(&config)?;

    let written = adapter.write(PROBE_PATH, PROBE_CONTENTS, &WriteConfig::new())?;
    info!(path = %written.path, size = ?written.size, "Probe object written");

    let metadata = adapter.get_metadata(PROBE_PATH)?;
    info!(
        mimetype = ?metadata.mimetype,
        timestamp = ?metadata.timestamp,
        "Probe object stat"
    );

    let contents = adapter.read(PROBE_PATH)?;
    if contents.as_ref() != PROBE_CONTENTS {
        bail!("probe object read back {} bytes that do not match", contents.len());
    }

    if !adapter.delete(PROBE_PATH) {
        bail!("failed to delete probe object {PROBE_PATH}");
    }
    info!("Probe completed");

    Ok(())
}
