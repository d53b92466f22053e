//! The seat exchange itself: PNR cache, route matching and marketplace
//! operations.

pub mod marketplace;
pub mod matcher;
pub mod pnr_cache;

pub use marketplace::{
    Dashboard, MarketError, NewListing, NewUser, VERIFICATION_FAILED, VerifiedJourney,
};
pub use matcher::{RouteQuery, RouteSearch, find_matching_listings};
pub use pnr_cache::{DEFAULT_TTL_HOURS, PnrCache};
