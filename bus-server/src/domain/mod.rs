//! Domain types for the bus booking service.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity. Values read from the store or
//! submitted by the user pass through these constructors first.

mod offering;
mod route;
mod state;

pub use offering::{BusType, InvalidBusType, InvalidRating, Offering, Rating};
pub use route::RouteName;
pub use state::{InvalidState, State};
