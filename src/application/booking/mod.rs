pub mod access;
mod booking_service;
mod errors;

#[allow(unused_imports)]
pub use booking_service::{
    add_booking, booking_by_id, bookings_by_booker, bookings_by_owner, decide_booking,
};
#[allow(unused_imports)]
pub use errors::{BookingApplicationError, Result};
