//! Element locators for the demo travel site.

use crate::Locator;

pub fn departure() -> Locator {
    Locator::name("fromPort")
}

pub fn destination() -> Locator {
    Locator::name("toPort")
}

/// Submit button of whichever form is on the page
pub fn submit() -> Locator {
    Locator::css("input[type='submit']")
}

/// "Choose this flight" button of the first result row
pub fn first_flight() -> Locator {
    Locator::css("table tr:nth-child(2) input")
}

pub fn result_rows() -> Locator {
    Locator::css("table tr")
}

pub fn cell() -> Locator {
    Locator::tag("td")
}

pub fn confirmation_status() -> Locator {
    Locator::tag("h1")
}

pub fn confirmation_id() -> Locator {
    Locator::css("table tr:nth-child(1) td:nth-child(2)")
}

pub fn confirmation_price() -> Locator {
    Locator::css("table tr:nth-child(3) td:nth-child(2)")
}
