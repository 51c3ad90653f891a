//! Browser backends implementing the `wayfare-core` driver traits

mod cdp;
mod error;
mod webdriver;

pub use cdp::{CdpFactory, CdpSession};
pub use error::{Error, Result};
pub use webdriver::{WebDriverFactory, WebDriverSession};
