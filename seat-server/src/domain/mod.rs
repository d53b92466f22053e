//! Domain types for the seat exchange.
//!
//! Types here enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod error;
mod journey;
mod pnr;
mod status;

pub use error::DomainError;
pub use journey::{BerthAllocation, PassengerStatus, PnrStatus, ScheduleEntry};
pub use pnr::{InvalidPnr, PnrNumber};
pub use status::{ListingStatus, PaymentStatus, SeatType};
