//! Bus ticket browsing and mock booking server.
//!
//! Lets a traveller pick a state and a route, narrow that route's buses by
//! rating and bus type, and get a price for a number of seats. Bookings are
//! acknowledged but never recorded.

pub mod config;
pub mod domain;
pub mod pipeline;
pub mod store;
pub mod web;
