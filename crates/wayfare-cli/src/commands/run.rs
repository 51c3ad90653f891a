use super::{book, open_store, read_passenger, runtime, search};
use crate::OutputFormat;
use anyhow::Result;
use serde_json::json;
use std::path::Path;
use wayfare_core::Settings;
use wayfare_core::workflow::{BookingRequest, book_flight, search_flights_safe};

/// Full pipeline: database, search, then booking on the same route
pub fn execute(
    settings: &Settings,
    from: &str,
    to: &str,
    passenger: &Path,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    let request = BookingRequest {
        from: from.to_string(),
        to: to.to_string(),
        passenger: read_passenger(passenger)?,
    };

    let (results, booking) = runtime()?.block_on(async {
        let store = open_store(settings, dry_run).await?;

        with_factory!(settings, |factory| {
            let results =
                search_flights_safe(&factory, store.as_ref(), &settings.workflow, from, to)
                    .await?;
            let booking =
                book_flight(&factory, store.as_ref(), &settings.workflow, &request).await?;
            Ok::<_, anyhow::Error>((results, booking))
        })
    })?;

    match format {
        OutputFormat::Json => {
            let report = json!({ "search": results, "booking": booking });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Pretty => {
            search::output_pretty(&results, from, to);
            book::output_pretty(&booking);
        }
    }

    Ok(())
}
