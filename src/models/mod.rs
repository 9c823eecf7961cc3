pub mod booking;
pub mod seat;
pub mod show;

pub use booking::{Booking, NewBooking};
pub use seat::SeatSet;
pub use show::Show;
