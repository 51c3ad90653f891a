use super::runtime;
use anyhow::Result;
use wayfare_core::{RetryPolicy, Settings, init_db};
use wayfare_store::PgStore;

pub fn execute(settings: &Settings) -> Result<()> {
    tracing::info!(
        "Initializing database at {}",
        settings.database.redacted_url()
    );

    runtime()?.block_on(async {
        let store = PgStore::new(&settings.database.database_url())?;
        init_db(&store, &RetryPolicy::database_startup()).await?;
        Ok::<_, anyhow::Error>(())
    })?;

    println!("{}", console::style("Database initialized").green());
    Ok(())
}
