use super::{open_store, print_steps, runtime};
use crate::OutputFormat;
use anyhow::Result;
use wayfare_core::Settings;
use wayfare_core::workflow::{SearchResults, search_flights_safe};

/// Search a route and save what was found
pub async fn search(
    settings: &Settings,
    from: &str,
    to: &str,
    dry_run: bool,
) -> Result<SearchResults> {
    let store = open_store(settings, dry_run).await?;
    let results = with_factory!(settings, |factory| {
        search_flights_safe(&factory, store.as_ref(), &settings.workflow, from, to).await?
    });
    Ok(results)
}

pub fn execute(
    settings: &Settings,
    from: &str,
    to: &str,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Searching flights from {} to {}", from, to);

    let results = runtime()?.block_on(search(settings, from, to, dry_run))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Pretty => output_pretty(&results, from, to),
    }

    Ok(())
}

pub(crate) fn output_pretty(results: &SearchResults, from: &str, to: &str) {
    use console::style;

    println!(
        "\n{}",
        style(format!("Flights from {} to {}", from, to)).bold().cyan()
    );

    if results.flights.is_empty() {
        println!("  {}", style("No flights found").yellow());
    }
    for flight in &results.flights {
        println!(
            "  {:<8} {:<20} {}",
            flight.flight,
            flight.airline,
            style(&flight.price).green()
        );
    }

    print_steps(&results.steps);
}
