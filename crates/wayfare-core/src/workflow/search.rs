use super::selectors;
use crate::config::WorkflowSettings;
use crate::driver::{DriverFactory, UiDriver};
use crate::record::FlightRow;
use crate::retry::retry;
use crate::session::with_driver;
use crate::steps::StepReport;
use crate::store::Store;
use crate::{Page, Result};
use serde::Serialize;

const NOT_FOUND: &str = "element not found";

/// Rows scraped from the results page plus the steps taken to get there
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub flights: Vec<FlightRow>,
    pub steps: StepReport,
}

/// Flight search against one driver session
pub struct FlightSearch<'d, D: UiDriver> {
    page: Page<'d, D>,
    settings: &'d WorkflowSettings,
}

impl<'d, D: UiDriver> FlightSearch<'d, D> {
    pub fn new(driver: &'d D, settings: &'d WorkflowSettings) -> Self {
        Self {
            page: Page::new(driver).with_timeout(settings.lookup_timeout),
            settings,
        }
    }

    pub async fn search(&self, departure: &str, destination: &str) -> Result<SearchResults> {
        tracing::info!("Searching flights {} -> {}", departure, destination);
        let mut steps = StepReport::new(self.settings.step_policy);

        let opened = self.page.open_site(&self.settings.site_url).await?;
        steps.check("open site", opened, "captcha detected")?;

        let selected = self
            .page
            .select_option(&selectors::departure(), departure)
            .await?;
        steps.check("select departure", selected, NOT_FOUND)?;

        let selected = self
            .page
            .select_option(&selectors::destination(), destination)
            .await?;
        steps.check("select destination", selected, NOT_FOUND)?;

        let submitted = self.page.click(&selectors::submit()).await?;
        steps.check("submit search", submitted, NOT_FOUND)?;

        let flights = self.extract_results().await?;
        tracing::info!("Found {} flights", flights.len());

        Ok(SearchResults { flights, steps })
    }

    /// Read every data row of the results table, skipping the header.
    pub async fn extract_results(&self) -> Result<Vec<FlightRow>> {
        let driver = self.page.driver();
        if self.page.safe_find(&selectors::result_rows()).await.is_none() {
            return Ok(Vec::new());
        }
        let rows = driver.find_all(&selectors::result_rows()).await?;

        let mut results = Vec::new();
        for row in rows.iter().skip(1) {
            let cols = driver.find_within(row, &selectors::cell()).await?;
            if cols.len() < 2 {
                tracing::debug!("Skipping row with {} cells", cols.len());
                continue;
            }

            let mut text = Vec::with_capacity(cols.len());
            for col in &cols {
                text.push(driver.read_text(col).await?.trim().to_string());
            }

            results.push(FlightRow {
                flight: text[0].clone(),
                airline: text[1].clone(),
                price: text[text.len() - 1].clone(),
            });
        }

        Ok(results)
    }
}

/// Parse and persist search results as one batch.
///
/// Nothing is staged unless every row parses.
pub async fn save_flights<S: Store + ?Sized>(store: &S, flights: &[FlightRow]) -> Result<usize> {
    let parsed = flights
        .iter()
        .map(FlightRow::to_flight)
        .collect::<Result<Vec<_>>>()?;

    for flight in parsed {
        store.add(flight.into()).await?;
    }
    let written = store.commit().await?;
    tracing::info!("Saved {} flights", written);
    Ok(written)
}

/// Search inside a fresh driver session, retried as a whole, then save once.
///
/// Only the browser work is retried; a store failure surfaces as `Error::Store`.
pub async fn search_flights_safe<F, S>(
    factory: &F,
    store: &S,
    settings: &WorkflowSettings,
    departure: &str,
    destination: &str,
) -> Result<SearchResults>
where
    F: DriverFactory + ?Sized,
    S: Store + ?Sized,
{
    let results = retry(&settings.retry, || {
        with_driver(factory, async move |driver| {
            FlightSearch::new(driver, settings)
                .search(departure, destination)
                .await
        })
    })
    .await?;

    save_flights(store, &results.flights).await?;
    Ok(results)
}
