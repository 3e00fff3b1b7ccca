//! Data transfer objects for web requests and responses.

use serde::Serialize;

use crate::domain::{
    BusType, InvalidBusType, InvalidRating, InvalidState, Offering, Rating, RouteName, State,
};
use crate::pipeline::{Availability, BookingQuote, FilterSelection, Selection};

/// Why request parameters could not be turned into a [`Selection`].
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error(transparent)]
    State(#[from] InvalidState),

    #[error("invalid rating {value:?}: {source}")]
    Rating {
        value: String,
        #[source]
        source: InvalidRating,
    },

    #[error(transparent)]
    BusType(#[from] InvalidBusType),

    #[error("invalid seat count {value:?}: expected a whole number")]
    Seats { value: String },
}

/// Build a [`Selection`] from raw form or query pairs.
///
/// Recognised keys are `state`, `prefix`, `route`, `seats` and the repeatable
/// `rating` and `bus_type`. Unknown keys are ignored. Blank values count as
/// absent, except `prefix`, which is kept exactly as typed.
///
/// `route` and `bus_type` are matched against stored labels byte for byte, so
/// they are not trimmed.
pub fn parse_selection(pairs: &[(String, String)]) -> Result<Selection, SelectionError> {
    let mut selection = Selection::default();
    let mut ratings = Vec::new();
    let mut bus_types = Vec::new();

    for (key, value) in pairs {
        let trimmed = value.trim();
        match key.as_str() {
            "prefix" => selection.prefix = value.clone(),
            _ if trimmed.is_empty() => {}
            "state" => selection.state = State::parse(trimmed)?,
            "route" => selection.route = Some(RouteName::new(value.as_str())),
            "rating" => ratings.push(trimmed.parse::<Rating>().map_err(|source| {
                SelectionError::Rating {
                    value: value.clone(),
                    source,
                }
            })?),
            "bus_type" => bus_types.push(BusType::new(value.as_str())?),
            "seats" => {
                let seats = trimmed.parse().map_err(|_| SelectionError::Seats {
                    value: value.clone(),
                })?;
                selection.seats = Some(seats);
            }
            _ => {}
        }
    }

    selection.filter = FilterSelection::new(ratings, bus_types);
    Ok(selection)
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A state in `/api/states`.
#[derive(Debug, Serialize)]
pub struct StateResult {
    /// Identifier used in requests (e.g. "kerala")
    pub id: &'static str,

    /// Human-readable name
    pub name: &'static str,
}

impl From<State> for StateResult {
    fn from(state: State) -> Self {
        Self {
            id: state.as_str(),
            name: state.display_name(),
        }
    }
}

/// Response for `/api/states`.
#[derive(Debug, Serialize)]
pub struct StatesResponse {
    pub states: Vec<StateResult>,
}

/// Response for `/api/routes`.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub state: State,

    /// Normalised prefix; `None` when the prefix was blank
    pub prefix: Option<String>,

    pub routes: Vec<RouteName>,
}

/// Response for `/api/offerings`.
#[derive(Debug, Serialize)]
pub struct OfferingsResponse {
    pub route: RouteName,
    pub offerings: Vec<Offering>,

    /// Distinct ratings, in order of first appearance
    pub ratings: Vec<Rating>,

    /// Distinct bus types, in order of first appearance
    pub bus_types: Vec<BusType>,
}

/// Response for `/api/quote`.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub route: RouteName,
    pub filtered: Vec<Offering>,
    pub availability: Availability,
    pub quote: BookingQuote,
}

/// Acknowledgment of a booking request. Nothing is recorded.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub message: String,
    pub route: RouteName,
    pub seats: u32,
    pub price_per_seat: f64,
    pub total_price: f64,

    /// Local time the booking was acknowledged, RFC 3339
    pub booked_at: String,
}
