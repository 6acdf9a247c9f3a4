//! Generate static files

use anyhow::Result;
use std::time::Instant;

use crate::cache::ContentStore;
use crate::generator::Generator;
use crate::Site;

/// Load and validate content, then write the generated outputs
pub fn run(site: &Site) -> Result<()> {
    let start = Instant::now();

    let collections = site.load_collections()?;
    Generator::new(site).generate(&collections)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate
pub async fn watch(site: &Site) -> Result<()> {
    let store = ContentStore::new(site.clone());
    tokio::task::spawn_blocking(move || {
        crate::watch::watch_content(store, |site, collections| {
            tracing::info!("Regenerating...");
            if let Err(e) = Generator::new(site).generate(&collections) {
                tracing::error!("Generation failed: {}", e);
            }
        })
    })
    .await?
}
