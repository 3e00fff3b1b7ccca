//! Route query and filter pipeline.
//!
//! Each user interaction flows through the same stages:
//!
//! 1. resolve route names for a state and prefix
//! 2. load the offerings of the chosen route
//! 3. filter offerings by rating and bus type
//! 4. summarise availability and price a seat count
//!
//! [`run_interaction`] recomputes every stage from an explicit
//! [`Selection`], stopping at the first stage whose input is missing.

mod error;
mod filter;
mod interaction;
mod lookup;
mod pricing;

pub use error::PipelineError;
pub use filter::{FilterSelection, distinct_bus_types, distinct_ratings, filter_offerings};
pub use interaction::{BookingView, DEFAULT_PREFIX, Notice, Selection, run_interaction};
pub use lookup::{load_offerings, normalize_prefix, resolve_routes};
pub use pricing::{
    Availability, BookingQuote, QuoteError, compute_quote, format_rupees, round_to_paise,
};
