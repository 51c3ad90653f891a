mod booking;
mod search;
pub mod selectors;

pub use booking::{
    BookingRequest, BookingResult, FlightBooking, Passenger, book_flight, save_booking,
};
pub use search::{FlightSearch, SearchResults, save_flights, search_flights_safe};
