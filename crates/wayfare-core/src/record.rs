use crate::error::ParseError;
use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One row of the search results table, as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRow {
    pub flight: String,
    pub airline: String,
    pub price: String,
}

impl FlightRow {
    pub fn to_flight(&self) -> Result<Flight> {
        Ok(Flight {
            flight_number: self.flight.clone(),
            airline: self.airline.clone(),
            price: parse_field("price", &self.price)?,
        })
    }
}

/// Text read from the booking confirmation page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub status: String,
    pub id: String,
    pub price: String,
}

impl BookingConfirmation {
    pub fn to_booking(&self) -> Result<Booking> {
        Ok(Booking {
            booking_id: self.id.clone(),
            status: self.status.clone(),
            price: parse_field("price", &self.price)?,
        })
    }
}

/// Row of the `flights` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flight {
    pub flight_number: String,
    pub airline: String,
    pub price: f64,
}

/// Row of the `bookings` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub booking_id: String,
    pub status: String,
    pub price: f64,
}

/// Anything the store knows how to persist
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Flight(Flight),
    Booking(Booking),
}

impl From<Flight> for Record {
    fn from(flight: Flight) -> Self {
        Record::Flight(flight)
    }
}

impl From<Booking> for Record {
    fn from(booking: Booking) -> Self {
        Record::Booking(booking)
    }
}

lazy_static! {
    static ref PRICE_PATTERN: Regex = Regex::new(r"-?\d[\d,]*(?:\.\d+)?|-?\.\d+").unwrap();
}

/// Parse a displayed price such as `$250.00` or `USD 1,200.50`.
///
/// Currency symbols, currency codes and thousands separators are ignored;
/// the first numeric token wins.
pub fn parse_price(text: &str) -> std::result::Result<f64, ParseError> {
    let token = PRICE_PATTERN
        .find(text)
        .ok_or_else(|| ParseError::NoDigits(text.to_string()))?;

    let cleaned = token.as_str().replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(price),
        _ => Err(ParseError::InvalidNumber(text.to_string())),
    }
}

fn parse_field(field: &'static str, text: &str) -> Result<f64> {
    parse_price(text).map_err(|source| Error::Parse { field, source })
}
