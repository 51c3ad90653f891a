use super::{open_store, print_steps, read_passenger, runtime};
use crate::OutputFormat;
use anyhow::Result;
use std::path::Path;
use wayfare_core::Settings;
use wayfare_core::workflow::{BookingRequest, BookingResult, book_flight};

/// Book the first flight on a route and save the confirmation
pub async fn book(
    settings: &Settings,
    request: &BookingRequest,
    dry_run: bool,
) -> Result<BookingResult> {
    let store = open_store(settings, dry_run).await?;
    let result = with_factory!(settings, |factory| {
        book_flight(&factory, store.as_ref(), &settings.workflow, request).await?
    });
    Ok(result)
}

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
    tracing::info!("Booking a flight from {} to {}", from, to);

    let result = runtime()?.block_on(book(settings, &request, dry_run))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Pretty => output_pretty(&result),
    }

    Ok(())
}

pub(crate) fn output_pretty(result: &BookingResult) {
    use console::style;

    let confirmation = &result.confirmation;
    println!("\n{}", style(&confirmation.status).bold().green());
    println!("  Booking Id: {}", confirmation.id);
    println!("  Price:      {}", confirmation.price);

    print_steps(&result.steps);
}
