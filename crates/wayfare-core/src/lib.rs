pub mod config;
pub mod driver;
pub mod error;
pub mod locator;
pub mod page;
pub mod record;
pub mod retry;
pub mod session;
pub mod steps;
pub mod store;
pub mod workflow;

pub use config::Settings;
pub use driver::{DriverFactory, UiDriver};
pub use error::{DriverError, Error, ParseError, Result, StoreError};
pub use locator::{Locator, LocatorKind};
pub use page::Page;
pub use record::{Booking, BookingConfirmation, Flight, FlightRow, Record};
pub use retry::{Exhausted, RetryPolicy, retry};
pub use session::with_driver;
pub use steps::{StepOutcome, StepPolicy, StepReport};
pub use store::{Store, init_db};
