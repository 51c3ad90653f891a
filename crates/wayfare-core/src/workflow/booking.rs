use super::selectors;
use crate::config::WorkflowSettings;
use crate::driver::{DriverFactory, UiDriver};
use crate::record::BookingConfirmation;
use crate::session::with_driver;
use crate::steps::StepReport;
use crate::store::Store;
use crate::{Locator, Page, Result};
use serde::{Deserialize, Serialize};

const NOT_FOUND: &str = "element not found";

/// Passenger and payment details typed into the purchase form
///
/// Field names match the element ids of the form inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub input_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub credit_card_number: String,
    pub name_on_card: String,
}

impl Passenger {
    /// `(element id, value)` pairs in form order
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("inputName", self.input_name.as_str()),
            ("address", self.address.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("zipCode", self.zip_code.as_str()),
            ("creditCardNumber", self.credit_card_number.as_str()),
            ("nameOnCard", self.name_on_card.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub from: String,
    pub to: String,
    pub passenger: Passenger,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingResult {
    pub confirmation: BookingConfirmation,
    pub steps: StepReport,
}

/// Booking flow against one driver session
pub struct FlightBooking<'d, D: UiDriver> {
    page: Page<'d, D>,
    settings: &'d WorkflowSettings,
}

impl<'d, D: UiDriver> FlightBooking<'d, D> {
    pub fn new(driver: &'d D, settings: &'d WorkflowSettings) -> Self {
        Self {
            page: Page::new(driver).with_timeout(settings.lookup_timeout),
            settings,
        }
    }

    /// Search, choose the first flight, fill the purchase form and read
    /// back the confirmation.
    pub async fn book(&self, request: &BookingRequest) -> Result<BookingResult> {
        tracing::info!("Booking flight {} -> {}", request.from, request.to);
        let mut steps = StepReport::new(self.settings.step_policy);

        let opened = self.page.open_site(&self.settings.site_url).await?;
        steps.check("open site", opened, "captcha detected")?;

        let done = self
            .page
            .select_option(&selectors::departure(), &request.from)
            .await?;
        steps.check("select departure", done, NOT_FOUND)?;

        let done = self
            .page
            .select_option(&selectors::destination(), &request.to)
            .await?;
        steps.check("select destination", done, NOT_FOUND)?;

        let done = self.page.click(&selectors::submit()).await?;
        steps.check("submit search", done, NOT_FOUND)?;

        let done = self.page.click(&selectors::first_flight()).await?;
        steps.check("choose flight", done, NOT_FOUND)?;

        for (field, value) in request.passenger.fields() {
            let done = self.page.fill_input(&Locator::id(field), value).await?;
            steps.check(format!("fill {}", field), done, NOT_FOUND)?;
        }

        let done = self.page.click(&selectors::submit()).await?;
        steps.check("purchase", done, NOT_FOUND)?;

        // The id cell only exists on the confirmation page, unlike the heading
        let id = self
            .page
            .read_field("id", &selectors::confirmation_id())
            .await?;
        let status = self
            .page
            .read_field("status", &selectors::confirmation_status())
            .await?;
        let price = self
            .page
            .read_field("price", &selectors::confirmation_price())
            .await?;
        let confirmation = BookingConfirmation { status, id, price };
        tracing::info!("Booking completed: {}", confirmation.id);

        Ok(BookingResult {
            confirmation,
            steps,
        })
    }
}

/// Parse and persist one booking.
pub async fn save_booking<S: Store + ?Sized>(
    store: &S,
    confirmation: &BookingConfirmation,
) -> Result<()> {
    let booking = confirmation.to_booking()?;
    store.add(booking.into()).await?;
    store.commit().await?;
    tracing::info!("Booking saved");
    Ok(())
}

/// Book inside a fresh driver session, then save the confirmation.
///
/// Not retried: a repeated purchase would book twice.
pub async fn book_flight<F, S>(
    factory: &F,
    store: &S,
    settings: &WorkflowSettings,
    request: &BookingRequest,
) -> Result<BookingResult>
where
    F: DriverFactory + ?Sized,
    S: Store + ?Sized,
{
    let result = with_driver(factory, async |driver| {
        FlightBooking::new(driver, settings).book(request).await
    })
    .await?;

    save_booking(store, &result.confirmation).await?;
    Ok(result)
}
