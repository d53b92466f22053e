//! Railway seat exchange server.
//!
//! Passengers with a confirmed berth list it for sale; other passengers
//! on the same route find and book it. Every journey claim is checked
//! against the railway's PNR records.

pub mod auth;
pub mod config;
pub mod domain;
pub mod exchange;
pub mod railway;
pub mod stations;
pub mod store;
pub mod web;

#[cfg(test)]
mod testing;
